#![cfg(test)]

// Property tests for WordMultiset kept inside the crate so they can inspect
// the slot table directly.

use crate::error::{CursorError, MultisetError};
use crate::table::Slot;
use crate::WordMultiset;
use core::hash::BuildHasher;
use proptest::prelude::*;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hasher;
use std::rc::Rc;

// Pool-indexed operations so failing cases shrink toward earlier keys and
// shorter op lists.
#[derive(Clone, Debug)]
enum Op {
    Add(usize),
    SetCount(usize, usize),
    RemoveOne(usize),
    RemoveAll(usize),
    RemoveEntry(usize, usize),
    Get(usize),
    Contains(String),
    Iterate,
    Clear,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{0,4}", 1..=24).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            6 => idx.clone().prop_map(Op::Add),
            2 => (idx.clone(), 0usize..5).prop_map(|(i, c)| Op::SetCount(i, c)),
            3 => idx.clone().prop_map(Op::RemoveOne),
            2 => idx.clone().prop_map(Op::RemoveAll),
            1 => (idx.clone(), 1usize..4).prop_map(|(i, c)| Op::RemoveEntry(i, c)),
            2 => idx.clone().prop_map(Op::Get),
            1 => "[a-z]{0,4}".prop_map(Op::Contains),
            1 => Just(Op::Iterate),
            1 => Just(Op::Clear),
        ];
        proptest::collection::vec(op, 1..120).prop_map(move |ops| (pool.clone(), ops))
    })
}

#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

// Few distinct hash values: long shared probe chains with varied steps.
#[derive(Clone, Default)]
struct LowEntropyBuildHasher;
struct LowEntropyHasher(u64);
impl BuildHasher for LowEntropyBuildHasher {
    type Hasher = LowEntropyHasher;
    fn build_hasher(&self) -> Self::Hasher {
        LowEntropyHasher(0)
    }
}
impl Hasher for LowEntropyHasher {
    fn write(&mut self, bytes: &[u8]) {
        for b in bytes {
            self.0 = self.0.wrapping_add(*b as u64);
        }
    }
    fn finish(&self) -> u64 {
        self.0 % 5
    }
}

/// Drive `sut` and a `HashMap` model through the same ops, checking after
/// every step that:
/// - results match the model (counts, presence, return values);
/// - table invariants hold (twin-prime length, used/live counters, count
///   positivity, reachability, load factor) with nothing reported;
/// - the structural version moves exactly when the key set changes;
/// - every occupied slot's count is positive.
fn run_state_machine<S: BuildHasher>(
    mut sut: WordMultiset<S>,
    pool: &[String],
    ops: Vec<Op>,
    reports: &RefCell<Vec<String>>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<String, usize> = HashMap::new();
    for op in ops {
        let version = sut.structural_version();
        let keys_before = model.len();
        let mut structural = false;
        match op {
            Op::Add(i) => {
                let k = &pool[i];
                let was_new = !model.contains_key(k);
                prop_assert_eq!(sut.add(k), was_new);
                *model.entry(k.clone()).or_insert(0) += 1;
                structural = was_new;
            }
            Op::SetCount(i, c) => {
                let k = &pool[i];
                let res = sut.set_count(k, c);
                if c == 0 {
                    prop_assert_eq!(res, Err(MultisetError::InvalidCount));
                } else {
                    let prev = model.insert(k.clone(), c);
                    prop_assert_eq!(res, Ok(prev));
                    structural = prev.is_none();
                }
            }
            Op::RemoveOne(i) => {
                let k = &pool[i];
                let present = model.contains_key(k);
                prop_assert_eq!(sut.remove_one(k), present);
                if let Some(c) = model.get_mut(k) {
                    *c -= 1;
                    if *c == 0 {
                        model.remove(k);
                        structural = true;
                    }
                }
            }
            Op::RemoveAll(i) => {
                let k = &pool[i];
                let prev = model.remove(k);
                prop_assert_eq!(sut.remove_all(k), prev);
                structural = prev.is_some();
            }
            Op::RemoveEntry(i, c) => {
                let k = &pool[i];
                let matches = model.get(k) == Some(&c);
                prop_assert_eq!(sut.remove_entry(k, c), matches);
                if matches {
                    model.remove(k);
                    structural = true;
                }
            }
            Op::Get(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.get(k), model.get(k).copied());
            }
            Op::Contains(s) => {
                prop_assert_eq!(sut.contains_key(&s), model.contains_key(&s));
            }
            Op::Iterate => {
                let seen: BTreeMap<String, usize> =
                    sut.iter().map(|(k, c)| (k.to_string(), c)).collect();
                let expected: BTreeMap<String, usize> =
                    model.iter().map(|(k, c)| (k.clone(), *c)).collect();
                prop_assert_eq!(seen, expected);
            }
            Op::Clear => {
                sut.clear();
                model.clear();
                structural = keys_before > 0;
            }
        }

        prop_assert!(sut.check_invariants(), "reports: {:?}", reports.borrow());
        prop_assert!(reports.borrow().is_empty());
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert!(sut.table().used() * 2 <= sut.capacity());
        prop_assert!(sut.capacity() >= 7);
        let expected_version = if structural { version + 1 } else { version };
        prop_assert_eq!(sut.structural_version(), expected_version);
        for slot in sut.table().slots() {
            if let Slot::Occupied { count, .. } = slot {
                prop_assert!(*count >= 1);
            }
        }
    }
    Ok(())
}

fn recording<S: BuildHasher>(hasher: S) -> (WordMultiset<S>, Rc<RefCell<Vec<String>>>) {
    let reports = Rc::new(RefCell::new(Vec::new()));
    let sink = reports.clone();
    let set = WordMultiset::builder()
        .hasher(hasher)
        .reporter(move |m| sink.borrow_mut().push(m.to_string()))
        .build();
    (set, reports)
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let (sut, reports) = recording(hashbrown::hash_map::DefaultHashBuilder::default());
        run_state_machine(sut, &pool, ops, &reports)?;
    }

    // Every key hashes to zero: the probe degenerates to linear scanning and
    // tombstone reuse happens constantly.
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        let (sut, reports) = recording(ConstBuildHasher);
        run_state_machine(sut, &pool, ops, &reports)?;
    }

    #[test]
    fn prop_state_machine_low_entropy((pool, ops) in arb_scenario()) {
        let (sut, reports) = recording(LowEntropyBuildHasher);
        run_state_machine(sut, &pool, ops, &reports)?;
    }
}

// Property: a cursor interleaved with count-only updates visits every key
// exactly once and ends exhausted; removing through it leaves precisely the
// skipped keys behind.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_cursor_survives_count_updates(
        words in proptest::collection::vec("[a-f]{1,3}", 0..40),
        bumps in proptest::collection::vec(any::<bool>(), 0..40),
        removals in proptest::collection::vec(any::<bool>(), 0..40),
    ) {
        let mut sut: WordMultiset = words.iter().map(String::as_str).collect();
        let expected: BTreeMap<String, usize> =
            sut.iter().map(|(k, c)| (k.to_string(), c)).collect();
        let mut visited = BTreeMap::new();
        let mut kept = BTreeMap::new();
        let mut cursor = sut.cursor();
        let mut step = 0;
        while cursor.has_next(&sut)? {
            let (k, c) = cursor.next(&sut)?;
            let k = k.to_string();
            prop_assert!(visited.insert(k.clone(), c).is_none(), "visited {} twice", k);
            if bumps.get(step).copied().unwrap_or(false) {
                // Touch a visited key: count-only, cursor unaffected.
                sut.add(&k);
                prop_assert!(sut.remove_one(&k));
            }
            if removals.get(step).copied().unwrap_or(false) {
                prop_assert_eq!(cursor.remove_current(&mut sut)?, (k.clone(), c));
            } else {
                kept.insert(k, c);
            }
            step += 1;
        }
        prop_assert_eq!(cursor.next(&sut), Err(CursorError::Exhausted));
        prop_assert_eq!(visited, expected);
        let left: BTreeMap<String, usize> =
            sut.iter().map(|(k, c)| (k.to_string(), c)).collect();
        prop_assert_eq!(left, kept);
        prop_assert!(sut.check_invariants());
    }
}
