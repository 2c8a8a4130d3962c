//! word-multiset: a single-threaded multiset of strings with counts, stored
//! in an open-addressing hash table with double hashing.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: keep the probe sequence, tombstone policy and fail-fast iteration
//!   in small layers that can each be checked on their own.
//! - Layers:
//!   - SlotTable: a boxed slice of `Slot { Empty | Tombstone | Occupied }`
//!     plus `used`/`live` counters and a structural version. Owns the
//!     double-hashing probe and the twin-prime resize.
//!   - WordMultiset: public API. Validates arguments, keeps counts
//!     positive, and asserts table invariants at the end of every mutation
//!     under `cfg(test)` or the `invariant-checks` feature.
//!   - Cursor: detached, fail-fast walk that removes through the table's
//!     own removal path.
//!
//! Probing
//! - Table lengths are the larger of a twin-prime pair (7, 13, 19, 31, ...),
//!   so both `len` and `len - 2` are prime.
//! - `h1 = hash % len`, `h2 = 1 + hash % (len - 2)`; the step is never zero
//!   and is coprime with `len`, so a probe visits every slot.
//! - Lookups stop at the key or the first `Empty` slot. Fresh inserts take
//!   the first tombstone passed on the way, if any.
//! - The probe does not bound its loop; termination relies on the table
//!   never being more than half used.
//!
//! Load and resizing
//! - `used` counts occupied slots and tombstones. After every public call
//!   `used * 2 <= len`.
//! - Crossing that bound on insert rebuilds into the smallest twin prime
//!   `>= 4 * live`, dropping tombstones.
//!
//! Structural version
//! - Bumped when a key is added or removed (including via a cursor and by
//!   `clear`). Count changes on an existing key and resizes leave it alone,
//!   so a cursor survives `add`/`remove_one`/`set_count` on keys that are
//!   already present.
//!
//! Constraints
//! - Single-threaded: `!Send`/`!Sync` (the reporter is an `Rc`).
//! - Counts are `usize` and always at least one; a count reaching zero
//!   removes the key. Count overflow on `add` panics.
//!
//! Diagnostics
//! - `check_invariants` reports the first violation it finds to a
//!   per-instance reporter set on the builder. Without one, messages go to
//!   `log::error!` under the `logging` feature.

mod builder;
mod cursor;
mod error;
mod invariants;
mod iter;
mod log_capture;
mod primes;
mod table;
mod word_multiset;
mod word_multiset_proptest;

// Public surface
pub use builder::WordMultisetBuilder;
pub use cursor::Cursor;
pub use error::{CursorError, MultisetError};
pub use iter::{Counts, Iter, Keys};
pub use word_multiset::WordMultiset;
