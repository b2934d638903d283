#![cfg(test)]

// Property tests for the tables, kept inside the crate so they can check
// sizing invariants that are not part of the public surface.

use crate::sizing::{resize_threshold, MIN_SIZE};
use crate::{DoubleKeyTable, InsertError, IntTable, KeyTable, MultiTable, EMPTY};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap, HashSet};

// Keys are drawn from a small pool (plus the odd wide key) so duplicates
// and probe-sequence overlap are common.
fn arb_key() -> impl Strategy<Value = u32> {
    prop_oneof![
        8 => 0u32..48,
        1 => any::<u32>(),
    ]
}

#[derive(Clone, Debug)]
enum SingleOp {
    Insert(u32, u32),
    Find(u32),
    GetOrInsert(u32, u32),
    Values,
}

fn arb_single_op() -> impl Strategy<Value = SingleOp> {
    prop_oneof![
        4 => (arb_key(), 0u32..6).prop_map(|(k, v)| SingleOp::Insert(k, v)),
        2 => arb_key().prop_map(SingleOp::Find),
        1 => (arb_key(), 1u32..6).prop_map(|(k, v)| SingleOp::GetOrInsert(k, v)),
        1 => Just(SingleOp::Values),
    ]
}

fn check_sizing(len: usize, capacity: usize, threshold: usize) -> Result<(), TestCaseError> {
    prop_assert!(capacity.is_power_of_two() && capacity >= MIN_SIZE);
    prop_assert_eq!(threshold, resize_threshold(capacity));
    prop_assert!(len <= threshold && threshold < capacity);
    Ok(())
}

// Property: KeyTable/IntTable behave like a HashMap that keeps the first
// value per key and refuses conflicting re-inserts.
// - `Ok(true)` only for absent keys; `Ok(false)` for an equal value;
//   `ConflictingValue` otherwise, with the stored value untouched.
// - `IntTable` refuses 0 and reports misses as 0.
// - `values` matches the model's multiset of values.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_single_key_state_machine(ops in proptest::collection::vec(arb_single_op(), 1..200)) {
        let mut sut: KeyTable<u32> = KeyTable::new();
        let mut ints = IntTable::new();
        let mut model: HashMap<u32, u32> = HashMap::new();
        let mut int_model: HashMap<u32, u32> = HashMap::new();

        for op in ops {
            match op {
                SingleOp::Insert(k, v) => {
                    let expected = match model.get(&k) {
                        None => Ok(true),
                        Some(&old) if old == v => Ok(false),
                        Some(_) => Err(InsertError::ConflictingValue { key: k }),
                    };
                    prop_assert_eq!(sut.insert(k, v), expected);
                    model.entry(k).or_insert(v);

                    let int_expected = match int_model.get(&k) {
                        _ if v == 0 => Err(InsertError::ReservedValue),
                        None => Ok(true),
                        Some(&old) if old == v => Ok(false),
                        Some(_) => Err(InsertError::ConflictingValue { key: k }),
                    };
                    prop_assert_eq!(ints.insert(k, v), int_expected);
                    if v != 0 {
                        int_model.entry(k).or_insert(v);
                    }
                }
                SingleOp::Find(k) => {
                    prop_assert_eq!(sut.find(k), model.get(&k));
                    prop_assert_eq!(sut.contains_key(k), model.contains_key(&k));
                    prop_assert_eq!(ints.find(k), int_model.get(&k).copied().unwrap_or(EMPTY));
                    prop_assert_eq!(ints.contains_key(k), int_model.contains_key(&k));
                }
                SingleOp::GetOrInsert(k, v) => {
                    let want = *model.entry(k).or_insert(v);
                    prop_assert_eq!(*sut.get_or_insert_with(k, || v), want);
                }
                SingleOp::Values => {
                    let mut got: Vec<u32> = sut.values().copied().collect();
                    let mut want: Vec<u32> = model.values().copied().collect();
                    got.sort_unstable();
                    want.sort_unstable();
                    prop_assert_eq!(got, want);
                    let got: BTreeSet<(u32, u32)> = ints.iter().collect();
                    let want: BTreeSet<(u32, u32)> = int_model.iter().map(|(&k, &v)| (k, v)).collect();
                    prop_assert_eq!(got, want);
                }
            }
            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(ints.len(), int_model.len());
            check_sizing(sut.len(), sut.capacity(), sut.resize_threshold())?;
            check_sizing(ints.len(), ints.capacity(), ints.resize_threshold())?;
        }
    }
}

// Property: MultiTable behaves like a HashMap<key, HashSet<value>>.
// - `insert` returns true exactly when the pair is new.
// - `values_for` yields exactly the model's set for every key, with no
//   repeats, after any interleaving of inserts and growths.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_multi_key_matches_model(pairs in proptest::collection::vec((arb_key(), 0u16..8), 1..300)) {
        let mut sut: MultiTable<u16> = MultiTable::new();
        let mut model: HashMap<u32, HashSet<u16>> = HashMap::new();

        for (k, v) in pairs {
            let fresh = model.entry(k).or_default().insert(v);
            prop_assert_eq!(sut.insert(k, v), fresh);
            prop_assert!(sut.contains(k, &v));
            check_sizing(sut.len(), sut.capacity(), sut.resize_threshold())?;
        }

        for (k, values) in &model {
            let got: Vec<u16> = sut.values_for(*k).copied().collect();
            let unique: HashSet<u16> = got.iter().copied().collect();
            prop_assert_eq!(got.len(), unique.len(), "values_for({}) repeated a value", k);
            prop_assert_eq!(&unique, values);
        }
        let total: usize = model.values().map(HashSet::len).sum();
        prop_assert_eq!(sut.len(), total);
        prop_assert_eq!(sut.values().count(), total);
        prop_assert_eq!(sut.values_for(u32::MAX).count(), model.get(&u32::MAX).map_or(0, HashSet::len));
    }
}

// Property: DoubleKeyTable keeps the first value per ordered pair.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_double_key_first_write_wins(
        entries in proptest::collection::vec((0u32..12, 0u32..12, any::<u64>()), 1..250),
        probes in proptest::collection::vec((0u32..14, 0u32..14), 0..40),
    ) {
        let mut sut: DoubleKeyTable<u64> = DoubleKeyTable::new();
        let mut model: HashMap<(u32, u32), u64> = HashMap::new();

        for (a, b, v) in entries {
            let fresh = !model.contains_key(&(a, b));
            prop_assert_eq!(sut.insert(a, b, v), fresh);
            model.entry((a, b)).or_insert(v);
            check_sizing(sut.len(), sut.capacity(), sut.resize_threshold())?;
        }
        for (a, b) in probes {
            prop_assert_eq!(sut.find(a, b), model.get(&(a, b)));
        }
        let keys: BTreeSet<(u32, u32)> = sut.iter().map(|(k, _)| k).collect();
        let model_keys: BTreeSet<(u32, u32)> = model.keys().copied().collect();
        prop_assert_eq!(keys, model_keys);
    }
}
