//! Double-key tables: a `(u32, u32)` pair maps to at most one value.
//!
//! Unlike the single-key tables, a second insert under an existing pair is
//! simply refused (`false`), whatever its value; the first value stays.

use crate::error::InsertError;
use crate::mix::Probe;
use crate::sizing::{Occupied, Slots};
use core::fmt;
use core::iter::FusedIterator;
use core::num::NonZeroU32;

#[derive(Clone, Debug)]
struct Entry<V> {
    key1: u32,
    key2: u32,
    value: V,
}

/// Open-addressing map from `(u32, u32)` keys to owned values.
///
/// Not internally synchronized: share it across threads only behind a lock.
#[derive(Clone)]
pub struct DoubleKeyTable<V> {
    slots: Slots<Entry<V>>,
}

impl<V> DoubleKeyTable<V> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

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

    pub fn capacity(&self) -> usize {
        self.slots.size()
    }

    pub fn resize_threshold(&self) -> usize {
        self.slots.threshold()
    }

    #[inline]
    fn search(&self, key1: u32, key2: u32) -> Result<usize, usize> {
        let probe = Probe::for_pair(key1, key2, self.slots.mask());
        self.slots
            .search(probe, |e| e.key1 == key1 && e.key2 == key2)
    }

    fn grow(&mut self) {
        let old = self.slots.double();
        self.slots
            .rebuild(old, |e, mask| Probe::for_pair(e.key1, e.key2, mask));
    }

    pub fn find(&self, key1: u32, key2: u32) -> Option<&V> {
        match self.search(key1, key2) {
            Ok(index) => Some(&self.slots.occupied(index).value),
            Err(_) => None,
        }
    }

    pub fn contains_key(&self, key1: u32, key2: u32) -> bool {
        self.search(key1, key2).is_ok()
    }

    /// Inserts `(key1, key2) -> value`. Returns `false`, dropping `value`,
    /// if the pair already has an entry.
    pub fn insert(&mut self, key1: u32, key2: u32, value: V) -> bool {
        if self.slots.needs_grow() {
            self.grow();
        }
        match self.search(key1, key2) {
            Ok(_) => false,
            Err(index) => {
                self.slots.fill(index, Entry { key1, key2, value });
                true
            }
        }
    }

    /// Returns the value for the pair, inserting `make()` first if absent.
    /// A hit never grows the table.
    pub fn get_or_insert_with<F>(&mut self, key1: u32, key2: u32, make: F) -> &V
    where
        F: FnOnce() -> V,
    {
        let mut index = match self.search(key1, key2) {
            Ok(index) => return &self.slots.occupied(index).value,
            Err(vacant) => vacant,
        };
        if self.slots.needs_grow() {
            self.grow();
            index = self.search(key1, key2).unwrap_or_else(|vacant| vacant);
        }
        let value = make();
        self.slots.fill(index, Entry { key1, key2, value });
        &self.slots.occupied(index).value
    }

    pub fn values(&self) -> Values<'_, V> {
        Values {
            it: self.slots.iter(),
        }
    }

    /// Every `((key1, key2), value)` entry, in slot order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = ((u32, u32), &V)> + Clone + '_ {
        self.slots.iter().map(|e| ((e.key1, e.key2), &e.value))
    }
}

impl<V> Default for DoubleKeyTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for DoubleKeyTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DoubleKeyTable")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("resize_threshold", &self.resize_threshold())
            .finish()
    }
}

/// Iterator over the values of a [`DoubleKeyTable`].
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

/// `(u32, u32) -> u32` table. The value `0` is reserved and reported for misses.
#[derive(Clone, Default)]
pub struct IntDoubleKeyTable {
    inner: DoubleKeyTable<NonZeroU32>,
}

impl IntDoubleKeyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(expected: usize) -> Self {
        Self {
            inner: DoubleKeyTable::with_capacity(expected),
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

    /// Inserts `(key1, key2) -> value`; `value` must be non-zero. `Ok(false)`
    /// means the pair was already present.
    pub fn insert(&mut self, key1: u32, key2: u32, value: u32) -> Result<bool, InsertError> {
        let value = NonZeroU32::new(value).ok_or(InsertError::ReservedValue)?;
        Ok(self.inner.insert(key1, key2, value))
    }

    /// Value for the pair, or `0` if absent.
    pub fn find(&self, key1: u32, key2: u32) -> u32 {
        self.get(key1, key2).map_or(crate::EMPTY, NonZeroU32::get)
    }

    pub fn get(&self, key1: u32, key2: u32) -> Option<NonZeroU32> {
        self.inner.find(key1, key2).copied()
    }

    pub fn contains_key(&self, key1: u32, key2: u32) -> bool {
        self.inner.contains_key(key1, key2)
    }

    /// Value for the pair, inserting `make()` first if absent.
    pub fn get_or_insert_with<F>(&mut self, key1: u32, key2: u32, make: F) -> u32
    where
        F: FnOnce() -> NonZeroU32,
    {
        self.inner.get_or_insert_with(key1, key2, make).get()
    }

    pub fn values(&self) -> impl ExactSizeIterator<Item = u32> + Clone + '_ {
        self.inner.values().map(|v| v.get())
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = ((u32, u32), u32)> + Clone + '_ {
        self.inner.iter().map(|(k, v)| (k, v.get()))
    }
}

impl fmt::Debug for IntDoubleKeyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntDoubleKeyTable")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("resize_threshold", &self.resize_threshold())
            .finish()
    }
}
