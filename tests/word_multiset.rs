// WordMultiset public API test suite.
//
// Each test documents what behavior is being verified and which
// invariants are assumed or asserted. The core invariants exercised:
// - Counts: every present key has count >= 1; dropping to zero removes it.
// - Capacity: always the larger of a twin-prime pair, at least 7, and at
//   least twice the number of used slots.
// - Structural version: moves on key insertion/removal only.
// - Layout independence: lookups, equality and iteration do not depend on
//   insertion history or tombstones.
use std::collections::BTreeMap;
use std::hash::{BuildHasher, Hasher};
use std::time::{Duration, Instant};
use word_multiset::{MultisetError, WordMultiset};

fn is_prime(n: usize) -> bool {
    n >= 2 && (2..).take_while(|d| d * d <= n).all(|d| n % d != 0)
}

fn assert_twin_prime_capacity(m: &WordMultiset<impl BuildHasher>) {
    let n = m.capacity();
    assert!(n >= 7, "capacity {n} below minimum");
    assert!(is_prime(n) && is_prime(n - 2), "capacity {n} is not a twin prime");
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

// Test: the documented walkthrough.
// Assumes: a fresh multiset has 7 slots.
// Verifies: the 4th distinct add pushes used*2 past 7 and grows the table to
// 19 (smallest twin prime >= 16); all counts survive.
#[test]
fn four_adds_trigger_first_resize() {
    let mut m = WordMultiset::new();
    assert_eq!(m.capacity(), 7);
    for k in ["a", "b", "c", "d"] {
        assert!(m.add(k));
    }
    assert_eq!(m.len(), 4);
    assert_eq!(m.capacity(), 19);
    for k in ["a", "b", "c", "d"] {
        assert_eq!(m.get(k), Some(1));
    }
    assert!(m.check_invariants());
}

// Test: round trips through set_count and add.
// Verifies: set_count returns the previous count; add reports novelty.
#[test]
fn round_trips() {
    let mut m = WordMultiset::new();
    assert_eq!(m.set_count("x", 5), Ok(None));
    assert_eq!(m.get("x"), Some(5));

    assert!(m.add("y"));
    assert_eq!(m.get("y"), Some(1));
    assert!(!m.add("y"));
    assert_eq!(m.get("y"), Some(2));

    assert_eq!(m.set_count("y", 1), Ok(Some(2)));
    assert_eq!(m.set_count("y", 0), Err(MultisetError::InvalidCount));
    assert_eq!(m.get("y"), Some(1));
}

// Test: growth across many resizes.
// Assumes: keys are distinct.
// Verifies: every resize lands on a twin prime; no key or count is lost;
// the load factor bound holds after each insert.
#[test]
fn resize_preserves_every_pair() {
    let mut m = WordMultiset::new();
    let mut capacities = vec![m.capacity()];
    for i in 0..2_000usize {
        m.set_count(&format!("key-{i}"), i % 17 + 1).unwrap();
        assert_twin_prime_capacity(&m);
        assert!(m.len() * 2 <= m.capacity());
        if *capacities.last().unwrap() != m.capacity() {
            capacities.push(m.capacity());
        }
    }
    assert!(capacities.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(&capacities[..4], &[7, 19, 43, 103]);
    for i in 0..2_000usize {
        assert_eq!(m.get(&format!("key-{i}")), Some(i % 17 + 1));
    }
    assert!(!m.contains_key("key-2000"));
}

// Test: tombstones under total collision.
// Assumes: a constant hasher puts every key on one probe chain.
// Verifies: removing from the middle of a chain keeps later keys reachable;
// a fresh key reuses the first tombstone without resurrecting the old key;
// re-adding a removed key creates a fresh count of 1.
#[test]
fn tombstones_under_collisions() {
    let mut m = WordMultiset::with_hasher(ConstBuildHasher);
    for k in ["a", "b", "c"] {
        m.add(k);
    }
    assert_eq!(m.remove_all("b"), Some(1));
    assert_eq!(m.get("c"), Some(1));
    assert!(!m.contains_key("b"));

    assert!(m.add("d"));
    assert!(!m.contains_key("b"));
    assert_eq!(m.get("d"), Some(1));

    assert!(m.add("b"));
    assert_eq!(m.get("b"), Some(1));
    assert_eq!(m.len(), 4);
    assert!(m.check_invariants());
}

// Test: churn with one long-lived key.
// Assumes: repeated insert/remove cycles leave tombstones behind.
// Verifies: tombstones count toward load, so the table rebuilds before the
// probe can run out of empty slots; the long-lived key stays reachable.
#[test]
fn churn_never_fills_the_table() {
    let mut m = WordMultiset::new();
    for round in 0..200 {
        let k = format!("churn-{round}");
        m.add(&k);
        m.add("anchor");
        assert_eq!(m.remove_all(&k), Some(1));
        assert!(m.check_invariants());
        assert!(m.len() * 2 <= m.capacity());
    }
    assert_eq!(m.len(), 1);
    assert_eq!(m.get("anchor"), Some(200));
}

// Test: remove_one semantics.
// Verifies: decrements until one copy remains, then removes; absent keys
// return false; only the final removal is structural.
#[test]
fn remove_one_walks_down_to_removal() {
    let mut m = WordMultiset::new();
    m.set_count("w", 3).unwrap();
    let v = m.structural_version();
    assert!(m.remove_one("w"));
    assert!(m.remove_one("w"));
    assert_eq!(m.get("w"), Some(1));
    assert_eq!(m.structural_version(), v);
    assert!(m.remove_one("w"));
    assert_eq!(m.get("w"), None);
    assert_eq!(m.structural_version(), v + 1);
    assert!(!m.remove_one("w"));
    assert!(!m.remove_one("never"));
}

// Test: structural version bookkeeping.
// Verifies: increments exactly on insert of a new key and removal of a key.
#[test]
fn structural_version_counts_key_set_changes() {
    let mut m = WordMultiset::new();
    let v0 = m.structural_version();
    m.add("a");
    m.add("b");
    m.add("a");
    m.set_count("b", 9).unwrap();
    assert_eq!(m.structural_version(), v0 + 2);
    assert_eq!(m.remove_all("zzz"), None);
    assert_eq!(m.structural_version(), v0 + 2);
    m.remove_all("a");
    assert_eq!(m.structural_version(), v0 + 3);
}

// Test: word counting through FromIterator / Extend.
// Verifies: duplicates accumulate; iteration yields each key once.
#[test]
fn counts_words() {
    let text = "the quick brown fox jumps over the lazy dog the end";
    let mut m: WordMultiset = text.split_whitespace().collect();
    assert_eq!(m.get("the"), Some(3));
    assert_eq!(m.len(), 9);
    m.extend(["fox".to_string(), "den".to_string()]);
    assert_eq!(m.get("fox"), Some(2));

    let entries: BTreeMap<&str, usize> = m.iter().collect();
    assert_eq!(entries.len(), m.len());
    assert_eq!(entries.values().sum::<usize>(), 13);
    assert_eq!(m.counts().sum::<usize>(), 13);
}

// Test: equality is by contents.
// Verifies: different hashers, capacities and histories compare equal when
// the key -> count pairs agree.
#[test]
fn equality_is_by_contents() {
    let mut a = WordMultiset::with_capacity(64);
    let mut b = WordMultiset::new();
    for k in ["x", "y", "junk", "x"] {
        a.add(k);
    }
    a.remove_all("junk");
    b.set_count("y", 1).unwrap();
    b.set_count("x", 2).unwrap();
    assert_eq!(a, b);
    assert_ne!(a.capacity(), b.capacity());
}

// Test: clear.
// Verifies: all keys vanish, the table shrinks back, and the multiset is
// reusable.
#[test]
fn clear_then_reuse() {
    let mut m: WordMultiset = (0..100).map(|i| i.to_string()).collect();
    m.clear();
    assert!(m.is_empty());
    assert_eq!(m.capacity(), 7);
    assert_eq!(m.iter().count(), 0);
    m.add("again");
    assert_eq!(m.get("again"), Some(1));
    assert!(m.check_invariants());
}

// Test: errors are displayable.
#[test]
fn error_messages() {
    assert_eq!(MultisetError::InvalidCount.to_string(), "count must be positive");
}

// Test: per-operation cost outside the crate's own test build.
// Assumes: the `invariant-checks` feature is off, so mutations and cursor
// steps do not rescan the table.
// Verifies: building 20k keys and walking them with a cursor stays far below
// the seconds a whole-table check per step would take at this size.
#[cfg(not(feature = "invariant-checks"))]
#[test]
fn bulk_adds_and_walk_stay_linear() {
    const N: usize = 20_000;
    let keys: Vec<String> = (0..N).map(|i| format!("word-{i}")).collect();
    let start = Instant::now();
    let mut m = WordMultiset::new();
    for k in &keys {
        m.add(k);
    }
    let mut cursor = m.cursor();
    let mut walked = 0;
    while let Ok((_, n)) = cursor.next(&m) {
        walked += n;
    }
    let elapsed = start.elapsed();
    assert_eq!(walked, N);
    assert!(
        elapsed < Duration::from_secs(3),
        "{N} adds and a cursor walk took {elapsed:?}"
    );
}
