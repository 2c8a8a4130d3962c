//! Borrowing iterators over a `WordMultiset`.

use crate::table::Slot;
use core::iter::FusedIterator;

/// Iterator over `(key, count)` pairs in slot order.
#[derive(Clone, Debug)]
pub struct Iter<'a> {
    it: core::slice::Iter<'a, Slot>,
    remaining: usize,
}

impl<'a> Iter<'a> {
    pub(crate) fn new(slots: &'a [Slot], live: usize) -> Self {
        Self {
            it: slots.iter(),
            remaining: live,
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, usize);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        for slot in self.it.by_ref() {
            if let Slot::Occupied { key, count } = slot {
                self.remaining -= 1;
                return Some((key.as_str(), *count));
            }
        }
        None
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}
impl FusedIterator for Iter<'_> {}

/// Iterator over the distinct keys.
#[derive(Clone, Debug)]
pub struct Keys<'a> {
    inner: Iter<'a>,
}

impl<'a> Keys<'a> {
    pub(crate) fn new(inner: Iter<'a>) -> Self {
        Self { inner }
    }
}

impl<'a> Iterator for Keys<'a> {
    type Item = &'a str;

    #[inline]
    fn next(&mut self) -> Option<&'a str> {
        self.inner.next().map(|(k, _)| k)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Keys<'_> {}
impl FusedIterator for Keys<'_> {}

/// Iterator over the counts, one per distinct key.
#[derive(Clone, Debug)]
pub struct Counts<'a> {
    inner: Iter<'a>,
}

impl<'a> Counts<'a> {
    pub(crate) fn new(inner: Iter<'a>) -> Self {
        Self { inner }
    }
}

impl Iterator for Counts<'_> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        self.inner.next().map(|(_, c)| c)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Counts<'_> {}
impl FusedIterator for Counts<'_> {}
