//! Interner: maps structurally equal values to one canonical `u32` key.
//!
//! Keys are handed out densely as `1, 2, 3, ...` in first-seen order, so
//! they are never `0` and work directly as keys (or values) of the integer
//! tables. Each entry keeps its precomputed hash; growing the index never
//! calls back into `T: Hash`.

use crate::error::InsertError;
use crate::reentrancy::DebugReentrancy;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::num::NonZeroU32;
use hashbrown::hash_table::Entry;
use hashbrown::HashTable;
use std::collections::hash_map::RandomState;

struct Interned<T> {
    value: T,
    hash: u64,
}

pub struct Interner<T, S = RandomState> {
    hasher: S,
    // Holds keys; `key - 1` indexes `entries`.
    index: HashTable<NonZeroU32>,
    entries: Vec<Interned<T>>,
    reentrancy: DebugReentrancy,
}

#[inline]
fn position(key: NonZeroU32) -> usize {
    key.get() as usize - 1
}

impl<T> Interner<T>
where
    T: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }

    pub fn with_capacity(expected: usize) -> Self {
        Self::with_capacity_and_hasher(expected, RandomState::new())
    }
}

impl<T> Default for Interner<T>
where
    T: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S> Interner<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_capacity_and_hasher(0, hasher)
    }

    pub fn with_capacity_and_hasher(expected: usize, hasher: S) -> Self {
        Self {
            hasher,
            index: HashTable::with_capacity(expected),
            entries: Vec::with_capacity(expected),
            reentrancy: DebugReentrancy::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the canonical key for `value`, assigning the next key if no
    /// equal value was interned before.
    pub fn try_intern(&mut self, value: T) -> Result<NonZeroU32, InsertError> {
        let _busy = self.reentrancy.enter();
        let hash = self.hasher.hash_one(&value);
        let entries = &self.entries;
        match self.index.entry(
            hash,
            |&key| entries[position(key)].value == value,
            |&key| entries[position(key)].hash,
        ) {
            Entry::Occupied(o) => Ok(*o.get()),
            Entry::Vacant(v) => {
                let key = u32::try_from(self.entries.len() + 1)
                    .ok()
                    .and_then(NonZeroU32::new)
                    .ok_or(InsertError::KeySpaceExhausted)?;
                self.entries.push(Interned { value, hash });
                v.insert(key);
                Ok(key)
            }
        }
    }

    /// Like [`try_intern`](Self::try_intern), panicking once `u32::MAX`
    /// distinct values have been interned.
    pub fn intern(&mut self, value: T) -> NonZeroU32 {
        match self.try_intern(value) {
            Ok(key) => key,
            Err(e) => panic!("{e}"),
        }
    }

    /// Key of a previously interned value equal to `q`.
    pub fn get<Q>(&self, q: &Q) -> Option<NonZeroU32>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _busy = self.reentrancy.enter();
        let hash = self.hasher.hash_one(q);
        self.index
            .find(hash, |&key| self.entries[position(key)].value.borrow() == q)
            .copied()
    }

    pub fn contains<Q>(&self, q: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(q).is_some()
    }
}

impl<T, S> Interner<T, S> {
    /// Value interned under `key`, if that key was handed out.
    pub fn resolve(&self, key: NonZeroU32) -> Option<&T> {
        self.entries.get(position(key)).map(|e| &e.value)
    }

    /// `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (NonZeroU32, &T)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| (NonZeroU32::MIN.saturating_add(i as u32), &e.value))
    }
}

impl<T: fmt::Debug, S> fmt::Debug for Interner<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
