use thiserror::Error;

/// Value every integer-valued table reserves for "no entry".
///
/// Integer tables never store it: inserting it fails with
/// [`InsertError::ReservedValue`], and `find` returns it for absent keys.
pub const EMPTY: u32 = 0;

/// Reasons an insert is refused.
///
/// Plain duplicates are not errors: tables report them through their
/// `bool` return value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InsertError {
    #[error("value 0 is reserved as the empty slot marker")]
    ReservedValue,
    #[error("key {key} is already mapped to a different value")]
    ConflictingValue { key: u32 },
    #[error("interner key space exhausted")]
    KeySpaceExhausted,
}
