//! Well-formedness checks for the slot table and for cursors.
//!
//! Each check stops at the first problem, hands one human-readable message
//! to the reporter and returns `false`. Test builds, and builds with the
//! `invariant-checks` feature, assert these at the end of every public
//! mutation and cursor step. Otherwise they only run on request through
//! `WordMultiset::check_invariants`.

use crate::primes;
use crate::table::{Slot, SlotTable};
use core::hash::BuildHasher;
use std::rc::Rc;

/// Diagnostic hook receiving invariant-violation messages.
pub(crate) type Reporter = Rc<dyn Fn(&str)>;

pub(crate) fn default_reporter() -> Reporter {
    Rc::new(|_msg: &str| {
        #[cfg(feature = "logging")]
        log::error!("invariant error: {_msg}");
    })
}

fn report(reporter: &dyn Fn(&str), msg: &str) -> bool {
    reporter(msg);
    false
}

pub(crate) fn check_table<S: BuildHasher>(table: &SlotTable<S>, reporter: &dyn Fn(&str)) -> bool {
    let slots = table.slots();
    if slots.len() < primes::MIN_TABLE_LEN {
        return report(reporter, &format!("table length {} is too small", slots.len()));
    }
    if !primes::is_twin_prime(slots.len()) {
        return report(
            reporter,
            &format!("table length {} is not the larger of twin primes", slots.len()),
        );
    }

    let mut used = 0;
    let mut live = 0;
    for (i, slot) in slots.iter().enumerate() {
        match slot {
            Slot::Empty => {}
            Slot::Tombstone => used += 1,
            Slot::Occupied { key, count } => {
                used += 1;
                live += 1;
                if *count == 0 {
                    return report(reporter, &format!("entry {key:?} has count 0"));
                }
                let found = table.locate(key, false);
                if found != i {
                    return report(
                        reporter,
                        &format!("entry {key:?} at slot {i} can't be found (probe ends at {found})"),
                    );
                }
            }
        }
    }
    if used != table.used() {
        return report(
            reporter,
            &format!("used count claims {}, but {used} slots are used", table.used()),
        );
    }
    if live != table.len() {
        return report(
            reporter,
            &format!("live count claims {}, but {live} entries are live", table.len()),
        );
    }
    if used * 2 > slots.len() {
        return report(
            reporter,
            &format!("table is too full: {used} of {} slots used", slots.len()),
        );
    }
    true
}

/// `position` is the slot the cursor stands on; `can_remove` says whether
/// that slot was already handed out by `next`.
#[cfg(any(test, feature = "invariant-checks"))]
pub(crate) fn check_cursor<S: BuildHasher>(
    table: &SlotTable<S>,
    position: usize,
    remaining: usize,
    can_remove: bool,
    reporter: &dyn Fn(&str),
) -> bool {
    let slots = table.slots();
    let mut expected = 0;
    if position == slots.len() {
        if can_remove {
            return report(reporter, "cursor can remove past the end");
        }
    } else {
        match slots.get(position) {
            None => {
                return report(reporter, &format!("cursor position {position} is out of bounds"))
            }
            Some(Slot::Empty) => {
                return report(reporter, &format!("cursor position {position} is empty"))
            }
            Some(Slot::Tombstone) => {
                return report(reporter, &format!("cursor position {position} is a tombstone"))
            }
            Some(Slot::Occupied { .. }) => {
                if !can_remove {
                    expected += 1;
                }
            }
        }
    }
    expected += slots
        .iter()
        .skip(position + 1)
        .filter(|s| s.is_occupied())
        .count();
    if expected != remaining {
        return report(
            reporter,
            &format!("cursor remaining claims {remaining}, but should be {expected}"),
        );
    }
    true
}
