//! Table sizing and the flat slot array shared by every table.
//!
//! A table of `size` slots (always a power of two, at least [`MIN_SIZE`])
//! holds at most [`resize_threshold`]`(size)` entries, 60% of `size`
//! rounded down. The insert that finds the table at its threshold doubles
//! it first, so at least one slot is always empty and probing terminates.

use crate::mix::Probe;
use core::iter::FusedIterator;
use core::mem;

/// Smallest slot array any table allocates.
pub const MIN_SIZE: usize = 16;

/// Load factor numerator; the threshold is `size * 3 / 5`.
pub const LOAD_NUMERATOR: usize = 3;
pub const LOAD_DENOMINATOR: usize = 5;

/// Number of entries a table of `size` slots accepts before doubling.
#[inline]
pub const fn resize_threshold(size: usize) -> usize {
    size / LOAD_DENOMINATOR * LOAD_NUMERATOR + size % LOAD_DENOMINATOR * LOAD_NUMERATOR / LOAD_DENOMINATOR
}

/// Smallest power-of-two size, at least [`MIN_SIZE`], whose threshold
/// admits `expected` entries without growing.
pub fn initial_size(expected: usize) -> usize {
    let needed = expected
        .saturating_mul(LOAD_DENOMINATOR)
        .div_ceil(LOAD_NUMERATOR);
    needed.max(MIN_SIZE).next_power_of_two()
}

/// Power-of-two array of optional entries with occupancy bookkeeping.
///
/// Slots only ever go from empty to occupied; growth rebuilds a fresh array.
#[derive(Clone)]
pub(crate) struct Slots<E> {
    slots: Box<[Option<E>]>,
    count: usize,
    threshold: usize,
}

impl<E> Slots<E> {
    pub(crate) fn with_capacity(expected: usize) -> Self {
        Self::with_size(initial_size(expected))
    }

    fn with_size(size: usize) -> Self {
        debug_assert!(size.is_power_of_two() && size >= MIN_SIZE);
        Self {
            slots: (0..size).map(|_| None).collect(),
            count: 0,
            threshold: resize_threshold(size),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub(crate) fn size(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub(crate) fn threshold(&self) -> usize {
        self.threshold
    }

    #[inline]
    pub(crate) fn mask(&self) -> usize {
        self.slots.len() - 1
    }

    #[inline]
    pub(crate) fn needs_grow(&self) -> bool {
        self.count >= self.threshold
    }

    #[inline]
    pub(crate) fn get(&self, index: usize) -> Option<&E> {
        self.slots[index].as_ref()
    }

    /// Entry at an index a probe just reported as occupied.
    #[inline]
    pub(crate) fn occupied(&self, index: usize) -> &E {
        self.slots[index]
            .as_ref()
            .expect("probe reported an empty slot as occupied")
    }

    /// Walks `probe` until `is_match` accepts an entry (`Ok(index)`) or an
    /// empty slot is reached (`Err(index)` of that slot).
    pub(crate) fn search<F>(&self, mut probe: Probe, mut is_match: F) -> Result<usize, usize>
    where
        F: FnMut(&E) -> bool,
    {
        loop {
            let index = probe.advance();
            match &self.slots[index] {
                None => return Err(index),
                Some(e) if is_match(e) => return Ok(index),
                Some(_) => {}
            }
        }
    }

    /// Stores `entry` in the empty slot at `index`.
    #[inline]
    pub(crate) fn fill(&mut self, index: usize, entry: E) -> &mut E {
        debug_assert!(self.slots[index].is_none(), "filling an occupied slot");
        debug_assert!(self.count < self.threshold, "filling past the threshold");
        self.count += 1;
        self.slots[index].insert(entry)
    }

    /// Swaps in an empty array of twice the size and hands back the old
    /// entries for the caller to re-probe into it.
    pub(crate) fn double(&mut self) -> impl Iterator<Item = E> {
        let bigger = Self::with_size(self.size() * 2);
        let old = mem::replace(self, bigger);
        old.slots.into_vec().into_iter().flatten()
    }

    /// Re-inserts entries during growth; entries are known to be distinct,
    /// so each one takes the first empty slot of its probe sequence.
    pub(crate) fn rebuild<I, P>(&mut self, entries: I, mut probe_of: P)
    where
        I: IntoIterator<Item = E>,
        P: FnMut(&E, usize) -> Probe,
    {
        for entry in entries {
            let probe = probe_of(&entry, self.mask());
            let index = match self.search(probe, |_| false) {
                Ok(index) | Err(index) => index,
            };
            self.fill(index, entry);
        }
        self.debug_check();
    }

    pub(crate) fn iter(&self) -> Occupied<'_, E> {
        Occupied {
            it: self.slots.iter(),
            remaining: self.count,
        }
    }

    #[inline]
    fn debug_check(&self) {
        debug_assert!(self.size().is_power_of_two());
        debug_assert!(self.count <= self.threshold && self.threshold < self.size());
    }
}

/// Occupied entries in slot order.
pub(crate) struct Occupied<'a, E> {
    it: core::slice::Iter<'a, Option<E>>,
    remaining: usize,
}

impl<E> Clone for Occupied<'_, E> {
    fn clone(&self) -> Self {
        Self {
            it: self.it.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, E> Iterator for Occupied<'a, E> {
    type Item = &'a E;

    #[inline]
    fn next(&mut self) -> Option<&'a E> {
        if self.remaining == 0 {
            return None;
        }
        let found = self.it.by_ref().find_map(Option::as_ref);
        if found.is_some() {
            self.remaining -= 1;
        }
        found
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<E> ExactSizeIterator for Occupied<'_, E> {}
impl<E> FusedIterator for Occupied<'_, E> {}
