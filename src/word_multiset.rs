//! WordMultiset: public multiset API over the slot table.

use crate::builder::WordMultisetBuilder;
use crate::cursor::Cursor;
use crate::error::MultisetError;
use crate::invariants::{self, Reporter};
use crate::iter::{Counts, Iter, Keys};
use crate::table::SlotTable;
use core::fmt;
use core::hash::BuildHasher;
use core::sync::atomic::{AtomicU64, Ordering};
use hashbrown::hash_map::DefaultHashBuilder;

fn next_id() -> u64 {
    static NEXT_ID: AtomicU64 = AtomicU64::new(0);
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// A multiset of strings: each distinct key carries a positive count.
///
/// ```
/// use word_multiset::WordMultiset;
///
/// let mut words = WordMultiset::new();
/// assert!(words.add("the"));
/// assert!(!words.add("the"));
/// words.add("cat");
/// assert_eq!(words.get("the"), Some(2));
/// assert_eq!(words.len(), 2);
///
/// assert!(words.remove_one("the"));
/// assert_eq!(words.get("the"), Some(1));
/// assert_eq!(words.remove_all("the"), Some(1));
/// assert!(!words.contains_key("the"));
/// ```
pub struct WordMultiset<S = DefaultHashBuilder> {
    table: SlotTable<S>,
    reporter: Reporter,
    // Identity checked by cursors; survives moves, not clones.
    id: u64,
}

impl WordMultiset {
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Sized so that `keys` distinct keys fit before the first resize.
    pub fn with_capacity(keys: usize) -> Self {
        Self::builder().initial_capacity(keys).build()
    }

    pub fn builder() -> WordMultisetBuilder {
        WordMultisetBuilder::new()
    }
}

impl Default for WordMultiset {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> WordMultiset<S>
where
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        WordMultiset::<DefaultHashBuilder>::builder().hasher(hasher).build()
    }

    pub(crate) fn from_parts(table: SlotTable<S>, reporter: Reporter) -> Self {
        let set = Self {
            table,
            reporter,
            id: next_id(),
        };
        set.debug_check("new");
        set
    }

    pub(crate) fn table(&self) -> &SlotTable<S> {
        &self.table
    }
    pub(crate) fn table_mut(&mut self) -> &mut SlotTable<S> {
        &mut self.table
    }
    pub(crate) fn reporter(&self) -> &dyn Fn(&str) {
        &*self.reporter
    }
    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    #[cfg(any(test, feature = "invariant-checks"))]
    pub(crate) fn debug_check(&self, when: &str) {
        assert!(self.check_invariants(), "invariant false at end of {when}");
    }
    #[cfg(not(any(test, feature = "invariant-checks")))]
    #[inline(always)]
    pub(crate) fn debug_check(&self, _when: &str) {}

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.table.len()
    }
    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    pub fn hasher(&self) -> &S {
        self.table.hasher()
    }

    /// Length of the backing slot table; always the larger of a twin-prime
    /// pair.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Generation counter bumped whenever a key is added or removed. Count
    /// changes on existing keys leave it unchanged.
    pub fn structural_version(&self) -> u64 {
        self.table.version()
    }

    /// Verify table invariants, sending the first violation found (if any) to
    /// the configured reporter.
    pub fn check_invariants(&self) -> bool {
        invariants::check_table(&self.table, self.reporter())
    }

    pub fn get(&self, key: &str) -> Option<usize> {
        let index = self.table.find(key)?;
        self.table.count_at(index)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.table.find(key).is_some()
    }

    /// Whether `key` is present with exactly `count` copies.
    pub fn contains_entry(&self, key: &str, count: usize) -> bool {
        self.get(key) == Some(count)
    }

    /// Set the count for `key`, returning the previous count.
    ///
    /// Introducing a new key is a structural change; replacing the count of
    /// an existing key is not.
    pub fn set_count(&mut self, key: &str, count: usize) -> Result<Option<usize>, MultisetError> {
        if count == 0 {
            return Err(MultisetError::InvalidCount);
        }
        let old = self.table.set_count(key, count);
        self.debug_check("set_count");
        Ok(old)
    }

    /// Add one copy of `key`. Returns `true` if the key was not present.
    ///
    /// # Panics
    ///
    /// If the count would overflow `usize`.
    pub fn add(&mut self, key: &str) -> bool {
        let added = match self.table.find(key) {
            Some(index) => {
                let count = self.table.count_at(index).unwrap_or(0);
                let Some(next) = count.checked_add(1) else {
                    panic!("count overflow for {key:?}");
                };
                self.table.set_count_at(index, next);
                false
            }
            None => {
                self.table.set_count(key, 1);
                true
            }
        };
        self.debug_check("add");
        added
    }

    /// Remove `key` entirely, returning how many copies it had.
    pub fn remove_all(&mut self, key: &str) -> Option<usize> {
        let index = self.table.find(key)?;
        let (_, count) = self.table.remove_at(index)?;
        self.debug_check("remove_all");
        Some(count)
    }

    /// Remove one copy of `key`. The key disappears when its last copy goes;
    /// otherwise only its count drops, which open cursors tolerate.
    /// Returns `false` if the key was absent.
    pub fn remove_one(&mut self, key: &str) -> bool {
        let Some(index) = self.table.find(key) else {
            return false;
        };
        match self.table.count_at(index) {
            Some(1) => {
                self.table.remove_at(index);
            }
            Some(count) => {
                self.table.set_count_at(index, count - 1);
            }
            None => return false,
        }
        self.debug_check("remove_one");
        true
    }

    /// Remove `key` only if it currently has exactly `count` copies.
    pub fn remove_entry(&mut self, key: &str, count: usize) -> bool {
        if !self.contains_entry(key, count) {
            return false;
        }
        self.remove_all(key).is_some()
    }

    /// Remove every key and shrink back to the table length the multiset was
    /// built with: 7 slots by default, or whatever
    /// [`initial_capacity`](WordMultisetBuilder::initial_capacity) asked for.
    /// Clearing an empty multiset does nothing.
    pub fn clear(&mut self) {
        if self.is_empty() {
            return;
        }
        #[cfg(feature = "logging")]
        log::debug!(
            "clearing multiset: {} keys over {} slots",
            self.table.len(),
            self.table.capacity()
        );
        self.table.clear();
        self.debug_check("clear");
    }

    /// Entries in slot order.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self.table.slots(), self.table.len())
    }

    pub fn keys(&self) -> Keys<'_> {
        Keys::new(self.iter())
    }

    pub fn counts(&self) -> Counts<'_> {
        Counts::new(self.iter())
    }

    /// A detached, fail-fast cursor over the entries. Unlike [`iter`], it
    /// holds no borrow, so the multiset may be modified between steps;
    /// adding or removing keys other than through
    /// [`Cursor::remove_current`] invalidates it.
    ///
    /// [`iter`]: WordMultiset::iter
    pub fn cursor(&self) -> Cursor {
        Cursor::new(self)
    }
}

impl<S> Clone for WordMultiset<S>
where
    S: BuildHasher + Clone,
{
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            reporter: self.reporter.clone(),
            id: next_id(),
        }
    }
}

impl<S> fmt::Debug for WordMultiset<S>
where
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<S> PartialEq for WordMultiset<S>
where
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, c)| other.get(k) == Some(c))
    }
}

impl<S> Eq for WordMultiset<S> where S: BuildHasher {}

impl<'a, S> IntoIterator for &'a WordMultiset<S>
where
    S: BuildHasher,
{
    type Item = (&'a str, usize);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

impl<'a, S> Extend<&'a str> for WordMultiset<S>
where
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = &'a str>>(&mut self, iter: I) {
        for word in iter {
            self.add(word);
        }
    }
}

impl<S> Extend<String> for WordMultiset<S>
where
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = String>>(&mut self, iter: I) {
        for word in iter {
            self.add(&word);
        }
    }
}

impl<'a, S> FromIterator<&'a str> for WordMultiset<S>
where
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = Self::with_hasher(S::default());
        set.extend(iter);
        set
    }
}

impl<S> FromIterator<String> for WordMultiset<S>
where
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut set = Self::with_hasher(S::default());
        set.extend(iter);
        set
    }
}
