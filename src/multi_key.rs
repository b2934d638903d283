//! MultiTable: one `u32` key maps to a set of values.
//!
//! Every `(key, value)` pair takes its own slot; there are no per-key
//! chains. The values of a key are found by replaying the key's probe
//! sequence up to the first empty slot. Slots never empty out and growth
//! always rehashes the whole table, so every pair stored under a key lies
//! before that first empty slot.

use crate::mix::Probe;
use crate::sizing::{Occupied, Slots};
use core::fmt;
use core::iter::FusedIterator;

#[derive(Clone, Debug)]
struct Entry<V> {
    key: u32,
    value: V,
}

/// Open-addressing multimap from `u32` keys to sets of values.
///
/// Not internally synchronized: share it across threads only behind a lock.
#[derive(Clone)]
pub struct MultiTable<V> {
    slots: Slots<Entry<V>>,
}

impl<V> MultiTable<V> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Presizes for `expected` `(key, value)` pairs.
    pub fn with_capacity(expected: usize) -> Self {
        Self {
            slots: Slots::with_capacity(expected),
        }
    }

    /// Number of stored `(key, value)` pairs.
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

    fn grow(&mut self) {
        let old = self.slots.double();
        self.slots.rebuild(old, |e, mask| Probe::for_key(e.key, mask));
    }

    /// Adds `value` under `key`. Returns `false` if that exact pair was
    /// already present.
    pub fn insert(&mut self, key: u32, value: V) -> bool
    where
        V: PartialEq,
    {
        if self.slots.needs_grow() {
            self.grow();
        }
        let probe = Probe::for_key(key, self.slots.mask());
        match self.slots.search(probe, |e| e.key == key && e.value == value) {
            Ok(_) => false,
            Err(index) => {
                self.slots.fill(index, Entry { key, value });
                true
            }
        }
    }

    pub fn contains(&self, key: u32, value: &V) -> bool
    where
        V: PartialEq,
    {
        let probe = Probe::for_key(key, self.slots.mask());
        self.slots
            .search(probe, |e| e.key == key && e.value == *value)
            .is_ok()
    }

    /// Values stored under `key`, in probe order.
    pub fn values_for(&self, key: u32) -> ValuesFor<'_, V> {
        ValuesFor {
            slots: &self.slots,
            probe: Probe::for_key(key, self.slots.mask()),
            key,
            done: false,
        }
    }

    /// Every stored value, in slot order.
    pub fn values(&self) -> Values<'_, V> {
        Values {
            it: self.slots.iter(),
        }
    }

    /// Every stored `(key, value)` pair, in slot order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (u32, &V)> + Clone + '_ {
        self.slots.iter().map(|e| (e.key, &e.value))
    }
}

impl<V> Default for MultiTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for MultiTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiTable")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("resize_threshold", &self.resize_threshold())
            .finish()
    }
}

/// Walks one key's probe sequence, yielding its values until an empty slot.
pub struct ValuesFor<'a, V> {
    slots: &'a Slots<Entry<V>>,
    probe: Probe,
    key: u32,
    done: bool,
}

impl<V> Clone for ValuesFor<'_, V> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots,
            probe: self.probe.clone(),
            key: self.key,
            done: self.done,
        }
    }
}

impl<'a, V> Iterator for ValuesFor<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        if self.done {
            return None;
        }
        let slots = self.slots;
        loop {
            match slots.get(self.probe.advance()) {
                None => {
                    self.done = true;
                    return None;
                }
                Some(e) if e.key == self.key => return Some(&e.value),
                Some(_) => {}
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            (0, Some(0))
        } else {
            (0, Some(self.slots.len()))
        }
    }
}

impl<V> FusedIterator for ValuesFor<'_, V> {}

/// Iterator over every value of a [`MultiTable`].
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
