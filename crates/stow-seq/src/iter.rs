//! Owning iteration.

use std::fmt;
use std::iter::FusedIterator;
use std::ptr;
use std::slice;

use stow_raw::RawStorage;

use crate::sequence::Sequence;

/// An iterator that moves elements out of a [`Sequence`].
///
/// Elements not consumed are dropped with the iterator, after which the
/// block is released.
pub struct IntoIter<T> {
    storage: RawStorage<T>,
    /// Slots `[start, end)` are live and not yet yielded.
    start: usize,
    end: usize,
}

impl<T> IntoIter<T> {
    /// The elements not yet yielded.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: slots [start, end) are live.
        unsafe { slice::from_raw_parts(self.storage.slot(self.start), self.end - self.start) }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        let index = self.start;
        self.start += 1;
        // SAFETY: `index` was live and is now outside [start, end), so it
        // is read out exactly once.
        Some(unsafe { self.storage.slot(index).read() })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.start;
        (remaining, Some(remaining))
    }

    fn count(self) -> usize {
        self.len()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        self.end -= 1;
        // SAFETY: as in `next`, for the slot at the back.
        Some(unsafe { self.storage.slot(self.end).read() })
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        let remaining =
            ptr::slice_from_raw_parts_mut(self.storage.slot_mut(self.start), self.end - self.start);
        self.start = self.end;
        // SAFETY: the remaining slots were live and are now uncounted.
        unsafe { ptr::drop_in_place(remaining) };
    }
}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

impl<T, S> IntoIterator for Sequence<T, S> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(mut self) -> IntoIter<T> {
        let end = self.len();
        // The elements move to the iterator together with the block.
        let storage = self.release_storage();
        IntoIter {
            storage,
            start: 0,
            end,
        }
    }
}

impl<'a, T, S> IntoIterator for &'a Sequence<T, S> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> slice::Iter<'a, T> {
        self.as_slice().iter()
    }
}

impl<'a, T, S> IntoIterator for &'a mut Sequence<T, S> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> slice::IterMut<'a, T> {
        self.as_mut_slice().iter_mut()
    }
}
