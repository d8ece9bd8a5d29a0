//! Standard trait implementations for [`Sequence`].

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Deref, DerefMut, Index, IndexMut};
use std::slice::SliceIndex;

use stow_raw::StorageError;

use crate::growth::grown_capacity;
use crate::sequence::Sequence;
use crate::transfer::TransferStrategy;

impl<T, S> Default for Sequence<T, S> {
    fn default() -> Self {
        Self::with_strategy()
    }
}

impl<T: Clone, S> Clone for Sequence<T, S> {
    /// Copy into a fresh block of exactly `len` slots.
    fn clone(&self) -> Self {
        let mut copy = Self::with_capacity_and_strategy(self.len());
        copy.clone_within_capacity(self);
        copy
    }

    /// Copy-assignment; see [`Sequence::assign_from`].
    fn clone_from(&mut self, source: &Self) {
        self.assign_from(source);
    }
}

impl<T: fmt::Debug, S> fmt::Debug for Sequence<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, S> Deref for Sequence<T, S> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, S> DerefMut for Sequence<T, S> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, S, I: SliceIndex<[T]>> Index<I> for Sequence<T, S> {
    type Output = I::Output;

    #[inline]
    fn index(&self, index: I) -> &Self::Output {
        Index::index(self.as_slice(), index)
    }
}

impl<T, S, I: SliceIndex<[T]>> IndexMut<I> for Sequence<T, S> {
    #[inline]
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        IndexMut::index_mut(self.as_mut_slice(), index)
    }
}

impl<T, S> AsRef<[T]> for Sequence<T, S> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, S> AsMut<[T]> for Sequence<T, S> {
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, U, S1, S2> PartialEq<Sequence<U, S2>> for Sequence<T, S1>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &Sequence<U, S2>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, S> Eq for Sequence<T, S> {}

impl<T, U, S> PartialEq<[U]> for Sequence<T, S>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T, U, S> PartialEq<&[U]> for Sequence<T, S>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &&[U]) -> bool {
        self.as_slice() == *other
    }
}

impl<T, U, S, const N: usize> PartialEq<[U; N]> for Sequence<T, S>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T, U, S> PartialEq<Vec<U>> for Sequence<T, S>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &Vec<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Hash, S> Hash for Sequence<T, S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T, S: TransferStrategy<T>> Extend<T> for Sequence<T, S> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        let Some(needed) = self.len().checked_add(lower) else {
            StorageError::CapacityOverflow {
                requested: usize::MAX,
            }
            .raise()
        };
        if needed > self.capacity() {
            let grown = grown_capacity(self.capacity(), needed)
                .and_then(|capacity| self.try_reserve(capacity));
            if let Err(err) = grown {
                err.raise();
            }
        }
        for value in iter {
            self.push(value);
        }
    }
}

impl<'a, T: Clone + 'a, S: TransferStrategy<T>> Extend<&'a T> for Sequence<T, S> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().cloned());
    }
}

impl<T, S: TransferStrategy<T>> FromIterator<T> for Sequence<T, S> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut seq = Self::with_strategy();
        seq.extend(iter);
        seq
    }
}

impl<T: Clone, S> From<&[T]> for Sequence<T, S> {
    fn from(items: &[T]) -> Self {
        let mut seq = Self::with_capacity_and_strategy(items.len());
        seq.clone_within_capacity(items);
        seq
    }
}

impl<T, S: TransferStrategy<T>, const N: usize> From<[T; N]> for Sequence<T, S> {
    fn from(items: [T; N]) -> Self {
        let mut seq = Self::with_capacity_and_strategy(N);
        for value in items {
            // Capacity is exactly N, so this never reallocates.
            seq.push(value);
        }
        seq
    }
}
