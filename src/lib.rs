//! probe-tables: open-addressing hash tables keyed by `u32`, built for
//! interning and caching metadata entities by integer key.
//!
//! Internal Design:
//!
//! Summary
//! - Every table is a flat power-of-two array of optional entries probed
//!   with double hashing: start slot `mix1(key) & mask`, step `mix2(key)`.
//!   The step is always odd, so a probe sequence reaches every slot.
//! - Layers:
//!   - `mix`: the mixing functions and the `Probe` sequence.
//!   - `sizing`: size/threshold arithmetic and the shared slot array.
//!   - Tables: `KeyTable`/`IntTable` (one value per key), `MultiTable`
//!     (a set of values per key), `DoubleKeyTable`/`IntDoubleKeyTable`
//!     (one value per key pair).
//!   - Collaborators: `Interner` hands out the dense non-zero keys the
//!     tables expect; `PairCache` memoizes per-pair results behind a lock.
//!
//! Constraints
//! - No deletion. Slots go from empty to occupied and stay that way, so a
//!   lookup may stop at the first empty slot of its probe sequence.
//! - Growth doubles the array and rehashes every entry; it happens when an
//!   insert finds the table holding 60% of its slots. At least one slot is
//!   therefore always empty and every probe terminates.
//! - Tables never shrink. `with_capacity` presizes to avoid rehashing.
//!
//! Sentinel contract
//! - Integer-valued tables reserve the value `0` ([`EMPTY`]): `find` returns
//!   it for missing keys and `insert` refuses it with
//!   [`InsertError::ReservedValue`]. Values are stored as `NonZeroU32`, so a
//!   stored zero cannot exist. Keys have no reserved value.
//!
//! Duplicate policy
//! - `KeyTable`/`IntTable`: same key and equal value is a no-op
//!   (`Ok(false)`); same key and different value is refused with
//!   [`InsertError::ConflictingValue`], stored value kept.
//! - `MultiTable`: an exact `(key, value)` duplicate is a no-op (`false`).
//! - `DoubleKeyTable`: any second insert under a pair is refused (`false`).
//!
//! Threading
//! - Tables hold no locks. Mutation needs `&mut`, so a growth can never
//!   race a read within safe code; sharing a table between threads means
//!   wrapping it in a lock, as `PairCache` does.
//! - `Interner` is `Send` but not `Sync`: it runs user `Hash`/`Eq` and
//!   carries a debug-only reentrancy guard.

mod double_key;
mod error;
mod interner;
mod memo;
pub mod mix;
mod multi_key;
mod reentrancy;
mod single_key;
pub mod sizing;

#[cfg(test)]
mod tables_proptest;

pub use double_key::{DoubleKeyTable, IntDoubleKeyTable};
pub use error::{InsertError, EMPTY};
pub use interner::Interner;
pub use memo::PairCache;
pub use mix::{mix1, mix2, mix_double1, mix_double2};
pub use multi_key::{MultiTable, ValuesFor};
pub use single_key::{IntTable, KeyTable};

/// Iterator types, grouped by table.
pub mod iter {
    pub use crate::double_key::Values as DoubleKeyValues;
    pub use crate::multi_key::Values as MultiValues;
    pub use crate::single_key::{Iter as KeyTableIter, Values as KeyTableValues};
}
