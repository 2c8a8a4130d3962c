//! Builder for [`WordMultiset`] configuration.

use crate::invariants::{self, Reporter};
use crate::table::SlotTable;
use crate::word_multiset::WordMultiset;
use core::hash::BuildHasher;
use hashbrown::hash_map::DefaultHashBuilder;
use std::rc::Rc;

/// Configures and builds a [`WordMultiset`].
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use word_multiset::WordMultiset;
///
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let sink = seen.clone();
/// let mut words = WordMultiset::builder()
///     .initial_capacity(100)
///     .reporter(move |msg| sink.borrow_mut().push(msg.to_string()))
///     .build();
/// words.add("hello");
/// assert!(words.capacity() >= 200);
/// assert!(words.check_invariants());
/// assert!(seen.borrow().is_empty());
/// ```
pub struct WordMultisetBuilder<S = DefaultHashBuilder> {
    hasher: S,
    initial_capacity: usize,
    reporter: Option<Reporter>,
}

impl WordMultisetBuilder {
    pub(crate) fn new() -> Self {
        Self {
            hasher: DefaultHashBuilder::default(),
            initial_capacity: 0,
            reporter: None,
        }
    }
}

impl<S> WordMultisetBuilder<S> {
    /// Number of distinct keys the first table holds without resizing.
    pub fn initial_capacity(self, keys: usize) -> Self {
        Self {
            initial_capacity: keys,
            ..self
        }
    }

    /// Hasher used to derive both probe values from a key.
    pub fn hasher<S2>(self, hasher: S2) -> WordMultisetBuilder<S2> {
        WordMultisetBuilder {
            hasher,
            initial_capacity: self.initial_capacity,
            reporter: self.reporter,
        }
    }

    /// Receives a message for every invariant violation found by
    /// [`WordMultiset::check_invariants`]. Without one, messages go to
    /// `log::error!` when the `logging` feature is enabled.
    pub fn reporter<F>(self, reporter: F) -> Self
    where
        F: Fn(&str) + 'static,
    {
        Self {
            reporter: Some(Rc::new(reporter)),
            ..self
        }
    }

    pub fn build(self) -> WordMultiset<S>
    where
        S: BuildHasher,
    {
        let table = SlotTable::with_capacity_and_hasher(self.initial_capacity, self.hasher);
        let reporter = self.reporter.unwrap_or_else(invariants::default_reporter);
        WordMultiset::from_parts(table, reporter)
    }
}
