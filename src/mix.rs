//! Integer mixing functions and the double-hashing probe sequence.
//!
//! Every table derives two hashes per key: the first picks the starting
//! slot, the second is the probe step. The step is always odd, hence
//! coprime with any power-of-two table size, so a probe sequence visits
//! every slot before repeating.
//!
//! The start and step mixers use different primitives: a murmur3 finalizer
//! and a multiply/xorshift chain with unrelated constants. Keys sharing a
//! start slot should not also share a step.
//!
//! Hash values are stable for the lifetime of the process only.

const SEED_START: u32 = 0x9E37_79B9;
const SEED_STEP: u32 = 0x7F4A_7C15;
const SEED_DOUBLE_START: u32 = 0x2545_F491;
const SEED_DOUBLE_STEP: u32 = 0xD6E8_FEB8;

#[inline]
const fn fmix32(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85EB_CA6B);
    h ^= h >> 13;
    h = h.wrapping_mul(0xC2B2_AE35);
    h ^= h >> 16;
    h
}

#[inline]
const fn lowbias32(mut h: u32) -> u32 {
    h ^= h >> 15;
    h = h.wrapping_mul(0x2C1B_3C6D);
    h ^= h >> 12;
    h = h.wrapping_mul(0x297A_2D39);
    h ^= h >> 15;
    h
}

/// One murmur3 block round folding `k` into the running hash `h`.
#[inline]
const fn fold(h: u32, k: u32) -> u32 {
    let k = k.wrapping_mul(0xCC9E_2D51).rotate_left(15).wrapping_mul(0x1B87_3593);
    (h ^ k).rotate_left(13).wrapping_mul(5).wrapping_add(0xE654_6B64)
}

/// Start-slot hash for a single key.
#[inline]
pub const fn mix1(key: u32) -> u32 {
    fmix32(key ^ SEED_START)
}

/// Probe-step hash for a single key. Always odd.
#[inline]
pub const fn mix2(key: u32) -> u32 {
    lowbias32(key.wrapping_add(SEED_STEP)) | 1
}

/// Start-slot hash for a key pair. Order matters: `(a, b)` and `(b, a)`
/// hash differently.
#[inline]
pub const fn mix_double1(key1: u32, key2: u32) -> u32 {
    fmix32(fold(fold(SEED_DOUBLE_START, key1), key2) ^ 8)
}

/// Probe-step hash for a key pair. Always odd.
#[inline]
pub const fn mix_double2(key1: u32, key2: u32) -> u32 {
    let h = SEED_DOUBLE_STEP ^ key2.wrapping_mul(0x9E37_79B1);
    lowbias32(h.rotate_left(11) ^ key1.wrapping_mul(0x85EB_CA77)) | 1
}

/// Double-hashing probe sequence over a power-of-two slot array.
///
/// The sequence is infinite; callers stop at the first empty slot, which
/// always exists because tables never fill past their resize threshold.
#[derive(Clone, Debug)]
pub struct Probe {
    index: usize,
    step: usize,
    mask: usize,
}

impl Probe {
    /// `mask` must be `size - 1` for a power-of-two `size`, and `step` odd.
    #[inline]
    pub fn new(start: u32, step: u32, mask: usize) -> Self {
        debug_assert!(mask.wrapping_add(1).is_power_of_two());
        debug_assert!(step & 1 == 1, "probe step must be odd");
        Self {
            index: start as usize & mask,
            step: step as usize,
            mask,
        }
    }

    #[inline]
    pub fn for_key(key: u32, mask: usize) -> Self {
        Self::new(mix1(key), mix2(key), mask)
    }

    #[inline]
    pub fn for_pair(key1: u32, key2: u32, mask: usize) -> Self {
        Self::new(mix_double1(key1, key2), mix_double2(key1, key2), mask)
    }

    /// Returns the current slot and moves to the next one.
    #[inline]
    pub fn advance(&mut self) -> usize {
        let current = self.index;
        self.index = self.index.wrapping_add(self.step) & self.mask;
        current
    }
}

impl Iterator for Probe {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        Some(self.advance())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// Invariant: step hashes are odd for every key, including the extremes.
    #[test]
    fn step_hashes_are_odd() {
        for key in (0..10_000u32).chain([u32::MAX, u32::MAX - 1, SEED_STEP.wrapping_neg()]) {
            assert_eq!(mix2(key) & 1, 1, "mix2({key}) must be odd");
            assert_eq!(mix_double2(key, key ^ 0x55) & 1, 1);
            assert_eq!(mix_double2(0, key) & 1, 1);
        }
    }

    /// Invariant: mixing is a pure function of its inputs.
    #[test]
    fn mixing_is_deterministic() {
        for key in [0u32, 1, 2, 17, 0xFFFF_FFFF] {
            assert_eq!(mix1(key), mix1(key));
            assert_eq!(mix2(key), mix2(key));
            assert_eq!(mix_double1(key, 3), mix_double1(key, 3));
            assert_eq!(mix_double2(key, 3), mix_double2(key, 3));
        }
    }

    /// Invariant: pair hashes depend on argument order.
    #[test]
    fn pair_hashes_are_order_sensitive() {
        let swapped = (1..200u32)
            .filter(|&k| mix_double1(k, k + 1) == mix_double1(k + 1, k))
            .count();
        assert!(swapped < 3, "{swapped} symmetric collisions");
    }

    /// Sequential keys should spread over the low bits used for slot selection.
    #[test]
    fn sequential_keys_spread_over_low_bits() {
        let buckets: HashSet<u32> = (1..=64u32).map(|k| mix1(k) & 63).collect();
        assert!(buckets.len() > 24, "only {} of 64 buckets hit", buckets.len());
        let pair_buckets: HashSet<u32> = (1..=64u32).map(|k| mix_double1(k, 7) & 63).collect();
        assert!(pair_buckets.len() > 24);
    }

    /// Invariant: a probe sequence visits every slot exactly once per cycle.
    #[test]
    fn probe_covers_every_slot() {
        for size in [16usize, 32, 1024] {
            for key in [0u32, 1, 99, 123_456] {
                let seen: HashSet<usize> = Probe::for_key(key, size - 1).take(size).collect();
                assert_eq!(seen.len(), size);
            }
            let seen: HashSet<usize> = Probe::for_pair(4, 9, size - 1).take(size).collect();
            assert_eq!(seen.len(), size);
        }
    }

    #[test]
    fn probe_starts_at_masked_first_hash() {
        let mut p = Probe::for_key(42, 15);
        assert_eq!(p.advance(), (mix1(42) & 15) as usize);
        assert_eq!(p.advance(), (mix1(42).wrapping_add(mix2(42)) & 15) as usize);
    }
}
