//! Cursor: a detached, fail-fast walk over a `WordMultiset`.
//!
//! A cursor stores only a slot position, the number of entries still ahead,
//! and the structural version it was created at. Every step takes the owning
//! multiset as an argument, so the multiset can be modified between steps:
//! - count-only changes (`add` on an existing key, `remove_one` above one,
//!   `set_count` on an existing key) are tolerated and visible to later
//!   steps;
//! - adding or removing a key by any other path makes the cursor stale, and
//!   every later call reports [`CursorError::Stale`];
//! - `remove_current` removes through the cursor and keeps it valid.

use crate::error::CursorError;
#[cfg(any(test, feature = "invariant-checks"))]
use crate::invariants;
use crate::table::Slot;
#[cfg(any(test, feature = "invariant-checks"))]
use crate::table::SlotTable;
use crate::word_multiset::WordMultiset;
use core::hash::BuildHasher;

#[derive(Debug)]
pub struct Cursor {
    owner: u64,
    // Slot of the entry last returned (when `can_remove`) or about to be
    // returned (otherwise); the table length once nothing remains.
    position: usize,
    remaining: usize,
    can_remove: bool,
    version: u64,
}

/// First occupied slot at or after `from`, or the table length when no
/// entries remain.
fn seek(slots: &[Slot], from: usize, remaining: usize) -> usize {
    if remaining == 0 {
        return slots.len();
    }
    (from..slots.len())
        .find(|&i| slots[i].is_occupied())
        .unwrap_or(slots.len())
}

impl Cursor {
    pub(crate) fn new<S>(set: &WordMultiset<S>) -> Self
    where
        S: BuildHasher,
    {
        let table = set.table();
        let remaining = table.len();
        let cursor = Self {
            owner: set.id(),
            position: seek(table.slots(), 0, remaining),
            remaining,
            can_remove: false,
            version: table.version(),
        };
        cursor.debug_check(set, "new");
        cursor
    }

    fn validate<S>(&self, set: &WordMultiset<S>) -> Result<(), CursorError>
    where
        S: BuildHasher,
    {
        if set.id() != self.owner {
            return Err(CursorError::WrongMultiset);
        }
        if set.structural_version() != self.version {
            return Err(CursorError::Stale);
        }
        Ok(())
    }

    #[cfg(any(test, feature = "invariant-checks"))]
    fn debug_check<S>(&self, set: &WordMultiset<S>, when: &str)
    where
        S: BuildHasher,
    {
        assert!(
            self.well_formed(set.table(), set.reporter()),
            "cursor invariant false at end of {when}"
        );
    }
    #[cfg(not(any(test, feature = "invariant-checks")))]
    #[inline(always)]
    fn debug_check<S>(&self, _set: &WordMultiset<S>, _when: &str) {}

    #[cfg(any(test, feature = "invariant-checks"))]
    fn well_formed<S>(&self, table: &SlotTable<S>, reporter: &dyn Fn(&str)) -> bool
    where
        S: BuildHasher,
    {
        // A stale cursor has no position to vouch for.
        if table.version() != self.version {
            return true;
        }
        invariants::check_cursor(
            table,
            self.position,
            self.remaining,
            self.can_remove,
            reporter,
        )
    }

    /// Whether another entry remains.
    pub fn has_next<S>(&self, set: &WordMultiset<S>) -> Result<bool, CursorError>
    where
        S: BuildHasher,
    {
        self.validate(set)?;
        Ok(self.remaining > 0)
    }

    /// Advance to the next entry and return its key and current count.
    pub fn next<'m, S>(&mut self, set: &'m WordMultiset<S>) -> Result<(&'m str, usize), CursorError>
    where
        S: BuildHasher,
    {
        if !self.has_next(set)? {
            return Err(CursorError::Exhausted);
        }
        let slots = set.table().slots();
        if self.can_remove {
            self.position = seek(slots, self.position + 1, self.remaining);
        } else {
            self.can_remove = true;
        }
        self.remaining -= 1;
        self.debug_check(set, "next");
        match &slots[self.position] {
            Slot::Occupied { key, count } => Ok((key.as_str(), *count)),
            _ => unreachable!("cursor advanced onto a vacant slot"),
        }
    }

    /// Remove the entry last returned by [`next`](Cursor::next). The cursor
    /// stays valid and continues with the following entry.
    pub fn remove_current<S>(
        &mut self,
        set: &mut WordMultiset<S>,
    ) -> Result<(String, usize), CursorError>
    where
        S: BuildHasher,
    {
        self.validate(set)?;
        if !self.can_remove {
            return Err(CursorError::NoCurrentEntry);
        }
        let removed = set
            .table_mut()
            .remove_at(self.position)
            .ok_or(CursorError::NoCurrentEntry)?;
        self.version = set.structural_version();
        self.can_remove = false;
        self.position = seek(set.table().slots(), self.position + 1, self.remaining);
        set.debug_check("remove_current");
        self.debug_check(set, "remove_current");
        Ok(removed)
    }
}
