//! Error types.

/// Errors returned by [`WordMultiset`](crate::WordMultiset) mutations.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultisetError {
    /// Counts are strictly positive; use
    /// [`remove_all`](crate::WordMultiset::remove_all) to drop a key.
    #[error("count must be positive")]
    InvalidCount,
}

/// Errors returned by [`Cursor`](crate::Cursor) operations.
///
/// None of these change the multiset; a cursor that reported
/// [`CursorError::Stale`] keeps reporting it.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorError {
    /// A key was added or removed after the cursor was created, by some
    /// path other than this cursor.
    #[error("multiset was structurally modified during iteration")]
    Stale,
    /// `remove_current` called before the first `next`, or twice in a row.
    #[error("no current entry to remove")]
    NoCurrentEntry,
    /// `next` called with no entries left.
    #[error("no more entries")]
    Exhausted,
    /// The cursor was created by a different multiset.
    #[error("cursor used with a multiset it does not belong to")]
    WrongMultiset,
}
