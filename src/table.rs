//! SlotTable: structural layer holding slots, the double-hashing probe and
//! twin-prime resizing.

use crate::primes;
use core::hash::BuildHasher;
use core::mem;

/// One position of the table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum Slot {
    #[default]
    Empty,
    /// A removed entry. Probes walk past it; fresh keys may reuse it.
    Tombstone,
    Occupied { key: String, count: usize },
}

impl Slot {
    #[inline]
    pub(crate) fn is_occupied(&self) -> bool {
        matches!(self, Slot::Occupied { .. })
    }
}

#[derive(Clone)]
pub(crate) struct SlotTable<S> {
    hasher: S,
    slots: Box<[Slot]>,
    // Occupied + Tombstone.
    used: usize,
    // Occupied only.
    live: usize,
    // Bumped when the key set changes; count updates and resizes leave it alone.
    version: u64,
    // Length chosen at construction; `clear` returns to it.
    initial_len: usize,
}

fn empty_slots(len: usize) -> Box<[Slot]> {
    std::iter::repeat_with(Slot::default).take(len).collect()
}

/// Walk `h1, h1 + h2, h1 + 2*h2, ...` and return the slot holding `key`, or
/// the terminating `Empty` slot. With `reuse_tombstone`, the first tombstone
/// passed on the way is returned in place of that `Empty` slot.
///
/// Terminates only if some slot is `Empty`; the load-factor invariant keeps
/// at least half the table empty.
fn probe(slots: &[Slot], hash: u64, key: &str, reuse_tombstone: bool) -> usize {
    let len = slots.len();
    let mut index = (hash % len as u64) as usize;
    let step = (1 + hash % (len as u64 - 2)) as usize;
    let mut first_tombstone = None;
    loop {
        match &slots[index] {
            Slot::Empty => {
                return match first_tombstone {
                    Some(t) if reuse_tombstone => t,
                    _ => index,
                };
            }
            Slot::Tombstone => {
                first_tombstone.get_or_insert(index);
            }
            Slot::Occupied { key: k, .. } if k == key => return index,
            Slot::Occupied { .. } => {}
        }
        index += step;
        if index >= len {
            index -= len;
        }
    }
}

impl<S> SlotTable<S>
where
    S: BuildHasher,
{
    /// A table able to hold `keys` distinct keys before its first resize.
    pub(crate) fn with_capacity_and_hasher(keys: usize, hasher: S) -> Self {
        let len = primes::twin_prime_at_least(keys.saturating_mul(2));
        Self {
            hasher,
            slots: empty_slots(len),
            used: 0,
            live: 0,
            version: 0,
            initial_len: len,
        }
    }

    #[inline]
    fn make_hash(&self, key: &str) -> u64 {
        self.hasher.hash_one(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.live
    }
    pub(crate) fn used(&self) -> usize {
        self.used
    }
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }
    pub(crate) fn version(&self) -> u64 {
        self.version
    }
    pub(crate) fn hasher(&self) -> &S {
        &self.hasher
    }
    pub(crate) fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub(crate) fn locate(&self, key: &str, reuse_tombstone: bool) -> usize {
        probe(&self.slots, self.make_hash(key), key, reuse_tombstone)
    }

    /// Index of the occupied slot holding `key`.
    pub(crate) fn find(&self, key: &str) -> Option<usize> {
        let index = self.locate(key, false);
        self.slots[index].is_occupied().then_some(index)
    }

    pub(crate) fn count_at(&self, index: usize) -> Option<usize> {
        match &self.slots[index] {
            Slot::Occupied { count, .. } => Some(*count),
            _ => None,
        }
    }

    /// Store `count` for `key`. A new key is structural and may resize the
    /// table; an existing key only has its count replaced.
    /// Returns the previous count, if any.
    pub(crate) fn set_count(&mut self, key: &str, count: usize) -> Option<usize> {
        debug_assert!(count > 0);
        let index = self.locate(key, true);
        match &mut self.slots[index] {
            Slot::Occupied { count: c, .. } => Some(mem::replace(c, count)),
            slot => {
                if matches!(slot, Slot::Empty) {
                    self.used += 1;
                }
                *slot = Slot::Occupied {
                    key: key.to_owned(),
                    count,
                };
                self.live += 1;
                self.version += 1;
                if self.used * 2 > self.slots.len() {
                    self.resize();
                }
                None
            }
        }
    }

    /// Overwrite the count of the occupied slot at `index`. Not structural.
    pub(crate) fn set_count_at(&mut self, index: usize, count: usize) -> Option<usize> {
        debug_assert!(count > 0);
        match &mut self.slots[index] {
            Slot::Occupied { count: c, .. } => Some(mem::replace(c, count)),
            _ => None,
        }
    }

    /// Turn the occupied slot at `index` into a tombstone and return its
    /// entry. `used` is unchanged; the tombstone still occupies the slot.
    pub(crate) fn remove_at(&mut self, index: usize) -> Option<(String, usize)> {
        if !self.slots[index].is_occupied() {
            return None;
        }
        match mem::replace(&mut self.slots[index], Slot::Tombstone) {
            Slot::Occupied { key, count } => {
                self.live -= 1;
                self.version += 1;
                Some((key, count))
            }
            _ => unreachable!("slot checked occupied above"),
        }
    }

    /// Drop every entry and start over at the length the table was built
    /// with. A table without entries is left as is, so cursor positions stay
    /// in bounds.
    pub(crate) fn clear(&mut self) {
        if self.live == 0 {
            return;
        }
        self.version += 1;
        self.slots = empty_slots(self.initial_len);
        self.used = 0;
        self.live = 0;
    }

    /// Rebuild into the smallest twin-prime length >= 4 * live. Entries move
    /// over in slot order; tombstones are dropped.
    fn resize(&mut self) {
        let new_len = primes::twin_prime_at_least(self.live.saturating_mul(4));
        let old = mem::replace(&mut self.slots, empty_slots(new_len));
        #[cfg(feature = "logging")]
        log::trace!(
            "resizing slot table {} -> {} ({} live, {} tombstones dropped)",
            old.len(),
            new_len,
            self.live,
            self.used - self.live
        );
        let mut moved = 0;
        for slot in old.into_vec() {
            if let Slot::Occupied { key, count } = slot {
                let hash = self.make_hash(&key);
                let index = probe(&self.slots, hash, &key, false);
                self.slots[index] = Slot::Occupied { key, count };
                moved += 1;
                if moved == self.live {
                    break;
                }
            }
        }
        self.used = self.live;
    }
}

#[cfg(test)]
impl<S> SlotTable<S> {
    pub(crate) fn corrupt_count(&mut self, index: usize) {
        if let Slot::Occupied { count, .. } = &mut self.slots[index] {
            *count = 0;
        }
    }
}
