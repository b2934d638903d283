//! PairCache: a lock-guarded memo table keyed by `(u32, u32)`.
//!
//! Meant to live inside the container whose results it caches (one lock per
//! cache, never a process-wide one). Lookups take the lock briefly; the
//! initializer runs with the lock released, so it may itself consult the
//! cache. When two threads race on the same pair, both may build a value
//! but only the first one stored is ever returned.

use crate::double_key::DoubleKeyTable;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub struct PairCache<V> {
    table: Mutex<DoubleKeyTable<Arc<V>>>,
}

impl<V> PairCache<V> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(expected: usize) -> Self {
        Self {
            table: Mutex::new(DoubleKeyTable::with_capacity(expected)),
        }
    }

    // The table is only mutated by a single `get_or_insert_with` call after
    // the user initializer has returned, so a poisoned lock still guards a
    // consistent table.
    fn lock(&self) -> MutexGuard<'_, DoubleKeyTable<Arc<V>>> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn get(&self, key1: u32, key2: u32) -> Option<Arc<V>> {
        self.lock().find(key1, key2).cloned()
    }

    /// Returns the cached value for the pair, building it with `init` on a
    /// miss.
    pub fn get_or_insert_with<F>(&self, key1: u32, key2: u32, init: F) -> Arc<V>
    where
        F: FnOnce() -> V,
    {
        if let Some(hit) = self.get(key1, key2) {
            return hit;
        }
        let built = Arc::new(init());
        let mut table = self.lock();
        Arc::clone(table.get_or_insert_with(key1, key2, || built))
    }
}

impl<V> Default for PairCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for PairCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PairCache").field("len", &self.len()).finish()
    }
}
