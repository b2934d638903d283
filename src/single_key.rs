//! Single-key tables: one `u32` key maps to at most one value.
//!
//! `KeyTable<V>` stores any owned value; `IntTable` stores `u32` values
//! with `0` reserved as "no entry" (see [`EMPTY`](crate::EMPTY)).
//!
//! Re-inserting a key with an equal value is a no-op. Re-inserting it with a
//! different value is refused with [`InsertError::ConflictingValue`] and the
//! stored value is kept, in debug and release builds alike.

use crate::error::InsertError;
use crate::mix::Probe;
use crate::sizing::{Occupied, Slots};
use core::fmt;
use core::iter::FusedIterator;
use core::num::NonZeroU32;

#[derive(Clone, Debug)]
struct Entry<V> {
    key: u32,
    value: V,
}

/// Open-addressing map from `u32` keys to owned values.
///
/// Not internally synchronized: share it across threads only behind a lock.
#[derive(Clone)]
pub struct KeyTable<V> {
    slots: Slots<Entry<V>>,
}

impl<V> KeyTable<V> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Presizes the table so `expected` entries fit without growing.
    pub fn with_capacity(expected: usize) -> Self {
        Self {
            slots: Slots::with_capacity(expected),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.len() == 0
    }

    /// Number of slots; always a power of two.
    pub fn capacity(&self) -> usize {
        self.slots.size()
    }

    /// Entry count at which the next insert doubles the table.
    pub fn resize_threshold(&self) -> usize {
        self.slots.threshold()
    }

    #[inline]
    fn search(&self, key: u32) -> Result<usize, usize> {
        self.slots
            .search(Probe::for_key(key, self.slots.mask()), |e| e.key == key)
    }

    fn grow(&mut self) {
        let old = self.slots.double();
        self.slots.rebuild(old, |e, mask| Probe::for_key(e.key, mask));
    }

    pub fn find(&self, key: u32) -> Option<&V> {
        match self.search(key) {
            Ok(index) => Some(&self.slots.occupied(index).value),
            Err(_) => None,
        }
    }

    pub fn contains_key(&self, key: u32) -> bool {
        self.search(key).is_ok()
    }

    /// Inserts `key -> value`.
    ///
    /// Returns `Ok(true)` for a new entry, `Ok(false)` if the key already
    /// holds an equal value, and `Err(ConflictingValue)` if it holds a
    /// different one.
    pub fn insert(&mut self, key: u32, value: V) -> Result<bool, InsertError>
    where
        V: PartialEq,
    {
        if self.slots.needs_grow() {
            self.grow();
        }
        match self.search(key) {
            Ok(index) if self.slots.occupied(index).value == value => Ok(false),
            Ok(_) => Err(InsertError::ConflictingValue { key }),
            Err(index) => {
                self.slots.fill(index, Entry { key, value });
                Ok(true)
            }
        }
    }

    /// Returns the value for `key`, inserting `make()` first if absent.
    /// `make` runs only on a miss, and only a miss can grow the table.
    pub fn get_or_insert_with<F>(&mut self, key: u32, make: F) -> &V
    where
        F: FnOnce() -> V,
    {
        let mut index = match self.search(key) {
            Ok(index) => return &self.slots.occupied(index).value,
            Err(vacant) => vacant,
        };
        if self.slots.needs_grow() {
            self.grow();
            // Still absent; growth only moves existing entries.
            index = self.search(key).unwrap_or_else(|vacant| vacant);
        }
        self.slots.fill(index, Entry { key, value: make() });
        &self.slots.occupied(index).value
    }

    /// All values in slot order (not insertion order).
    pub fn values(&self) -> Values<'_, V> {
        Values {
            it: self.slots.iter(),
        }
    }

    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            it: self.slots.iter(),
        }
    }
}

impl<V> Default for KeyTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for KeyTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyTable")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("resize_threshold", &self.resize_threshold())
            .field("entries", &DebugEntries(self))
            .finish()
    }
}

struct DebugEntries<'a, V>(&'a KeyTable<V>);

impl<V: fmt::Debug> fmt::Debug for DebugEntries<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}

impl<'a, V> IntoIterator for &'a KeyTable<V> {
    type Item = (u32, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Iter<'a, V> {
        self.iter()
    }
}

/// Iterator over the values of a [`KeyTable`].
pub struct Values<'a, V> {
    it: Occupied<'a, Entry<V>>,
}

impl<V> Clone for Values<'_, V> {
    fn clone(&self) -> Self {
        Self {
            it: self.it.clone(),
        }
    }
}

impl<'a, V> Iterator for Values<'a, V> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<&'a V> {
        self.it.next().map(|e| &e.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<V> ExactSizeIterator for Values<'_, V> {}
impl<V> FusedIterator for Values<'_, V> {}

/// Iterator over the `(key, value)` pairs of a [`KeyTable`].
pub struct Iter<'a, V> {
    it: Occupied<'a, Entry<V>>,
}

impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Self {
            it: self.it.clone(),
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (u32, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|e| (e.key, &e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}
impl<V> FusedIterator for Iter<'_, V> {}

/// `u32 -> u32` table. The value `0` is reserved and reported for misses.
#[derive(Clone, Default)]
pub struct IntTable {
    inner: KeyTable<NonZeroU32>,
}

impl IntTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(expected: usize) -> Self {
        Self {
            inner: KeyTable::with_capacity(expected),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    pub fn resize_threshold(&self) -> usize {
        self.inner.resize_threshold()
    }

    /// Inserts `key -> value`; `value` must be non-zero.
    pub fn insert(&mut self, key: u32, value: u32) -> Result<bool, InsertError> {
        let value = NonZeroU32::new(value).ok_or(InsertError::ReservedValue)?;
        self.inner.insert(key, value)
    }

    /// Value for `key`, or `0` if absent.
    pub fn find(&self, key: u32) -> u32 {
        self.get(key).map_or(crate::EMPTY, NonZeroU32::get)
    }

    pub fn get(&self, key: u32) -> Option<NonZeroU32> {
        self.inner.find(key).copied()
    }

    pub fn contains_key(&self, key: u32) -> bool {
        self.inner.contains_key(key)
    }

    pub fn values(&self) -> impl ExactSizeIterator<Item = u32> + Clone + '_ {
        self.inner.values().map(|v| v.get())
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (u32, u32)> + Clone + '_ {
        self.inner.iter().map(|(k, v)| (k, v.get()))
    }
}

impl fmt::Debug for IntTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntTable")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("resize_threshold", &self.resize_threshold())
            .finish()
    }
}
