//! The growable sequence.
//!
//! A [`Sequence`] owns exactly one [`RawStorage`] and a live count `len`.
//! Slots `[0, len)` always hold constructed elements and slots
//! `[len, capacity)` are always uninitialized. Every mutation moves the
//! sequence from one such state to another, or leaves it untouched if it
//! fails.
//!
//! # Reallocation
//!
//! Appends and inserts that find the storage full run the same sequence of
//! steps:
//!
//! 1. Acquire a block of [`next_capacity`] slots. Failure returns before
//!    anything else happens.
//! 2. Construct the new element and place it in its final slot of the new
//!    block. A failing or panicking constructor discards the new block.
//! 3. Populate the rest of the new block through the [`TransferStrategy`].
//! 4. Adopt the new block, count the new element, then (for non-moving
//!    strategies) drop the originals and release the old block.

use std::convert::Infallible;
use std::marker::PhantomData;
use std::mem;
use std::ptr;
use std::slice;

use stow_raw::{RawStorage, StorageError};

use crate::error::SequenceError;
use crate::growth::next_capacity;
use crate::guard::InitGuard;
use crate::transfer::{Relocate, TransferStrategy};

/// A contiguous, growable sequence of `T`.
///
/// `S` selects how elements are carried across reallocations; see
/// [`TransferStrategy`]. The default, [`Relocate`], works for every
/// element type.
pub struct Sequence<T, S = Relocate> {
    storage: RawStorage<T>,
    len: usize,
    _strategy: PhantomData<fn() -> S>,
}

impl<T> Sequence<T> {
    /// An empty sequence. Does not allocate.
    pub const fn new() -> Self {
        Self::with_strategy()
    }

    /// An empty sequence with room for exactly `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_strategy(capacity)
    }

    /// An empty sequence with room for exactly `capacity` elements, or the
    /// reason the block could not be acquired.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, StorageError> {
        Self::try_with_capacity_and_strategy(capacity)
    }

    /// A sequence of `len` default-valued elements, with capacity `len`.
    pub fn with_len(len: usize) -> Self
    where
        T: Default,
    {
        match Self::try_with_len(len) {
            Ok(seq) => seq,
            Err(err) => err.raise(),
        }
    }

    /// Fallible form of [`with_len`](Sequence::with_len).
    pub fn try_with_len(len: usize) -> Result<Self, StorageError>
    where
        T: Default,
    {
        let mut seq = Self::try_with_capacity(len)?;
        seq.try_resize(len)?;
        Ok(seq)
    }
}

impl<T, S> Sequence<T, S> {
    /// An empty sequence using transfer strategy `S`. Does not allocate.
    pub const fn with_strategy() -> Self {
        Self {
            storage: RawStorage::new(),
            len: 0,
            _strategy: PhantomData,
        }
    }

    /// An empty sequence using transfer strategy `S` with room for exactly
    /// `capacity` elements.
    pub fn with_capacity_and_strategy(capacity: usize) -> Self {
        match Self::try_with_capacity_and_strategy(capacity) {
            Ok(seq) => seq,
            Err(err) => err.raise(),
        }
    }

    /// Fallible form of
    /// [`with_capacity_and_strategy`](Sequence::with_capacity_and_strategy).
    pub fn try_with_capacity_and_strategy(capacity: usize) -> Result<Self, StorageError> {
        Ok(Self {
            storage: RawStorage::try_with_capacity(capacity)?,
            len: 0,
            _strategy: PhantomData,
        })
    }

    /// A sequence of `len` clones of `value`.
    pub fn from_elem(value: T, len: usize) -> Self
    where
        T: Clone,
    {
        let mut seq = Self::with_capacity_and_strategy(len);
        if len > 0 {
            seq.fill_within_capacity(len - 1, || value.clone());
            // SAFETY: capacity is `len` and `len - 1` slots are filled.
            unsafe { seq.write_next(value) };
        }
        seq
    }

    /// Number of live elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the sequence holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of elements the sequence can hold without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// Whether reallocations move elements rather than clone them.
    #[inline]
    pub fn transfers_by_move(&self) -> bool
    where
        S: TransferStrategy<T>,
    {
        S::MOVES
    }

    /// Address of the first element. Dangling when nothing is allocated.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.storage.as_ptr()
    }

    /// Mutable address of the first element.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.storage.as_mut_ptr()
    }

    /// The live elements as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: slots [0, len) are live and the block is aligned for T.
        unsafe { slice::from_raw_parts(self.storage.as_ptr(), self.len) }
    }

    /// The live elements as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as in `as_slice`; `&mut self` rules out aliasing.
        unsafe { slice::from_raw_parts_mut(self.storage.as_mut_ptr(), self.len) }
    }

    /// Element at `index` without a bounds check.
    ///
    /// # Safety
    ///
    /// `index` must be less than [`len`](Sequence::len). Debug builds
    /// assert this.
    #[inline]
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        debug_assert!(index < self.len, "index {index} out of bounds for length {}", self.len);
        // SAFETY: upheld by the caller; slot `index` is live.
        unsafe { &*self.storage.slot(index) }
    }

    /// Mutable element at `index` without a bounds check.
    ///
    /// # Safety
    ///
    /// `index` must be less than [`len`](Sequence::len). Debug builds
    /// assert this.
    #[inline]
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self.len, "index {index} out of bounds for length {}", self.len);
        // SAFETY: upheld by the caller; slot `index` is live.
        unsafe { &mut *self.storage.slot_mut(index) }
    }

    /// Remove and return the last element, or `None` if empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: slot `len` was live and is no longer counted, so reading
        // it out transfers ownership exactly once.
        Some(unsafe { self.storage.slot(self.len).read() })
    }

    /// Remove and return the element at `index`, shifting later elements
    /// one slot left. Capacity is unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn remove(&mut self, index: usize) -> T {
        let len = self.len;
        assert!(
            index < len,
            "removal index (is {index}) should be < len (is {len})"
        );
        let base = self.storage.as_mut_ptr();
        // SAFETY: index < len, so slot `index` is live; the tail
        // [index + 1, len) is shifted over it with an overlapping copy and
        // the vacated last slot is uncounted before anything can unwind.
        unsafe {
            let removed = base.add(index).read();
            ptr::copy(base.add(index + 1), base.add(index), len - index - 1);
            self.len = len - 1;
            removed
        }
    }

    /// Drop the element at `index` and return the index of the element
    /// that now occupies its position (equal to the new `len` if the last
    /// element was erased).
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn erase(&mut self, index: usize) -> usize {
        drop(self.remove(index));
        index
    }

    /// Drop every element past `len`. No effect if `len >= self.len()`.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        let tail = ptr::slice_from_raw_parts_mut(self.storage.slot_mut(len), self.len - len);
        // Uncount first so a panicking destructor cannot cause a double drop.
        self.len = len;
        // SAFETY: the tail slots were live and are no longer counted.
        unsafe { ptr::drop_in_place(tail) };
    }

    /// Drop every element, keeping the capacity.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Exchange contents (storage and length) with `other` in O(1).
    pub fn swap_with(&mut self, other: &mut Self) {
        self.storage.swap(&mut other.storage);
        mem::swap(&mut self.len, &mut other.len);
    }

    /// Move the contents out, leaving `self` empty with capacity 0.
    pub fn take(&mut self) -> Self {
        mem::replace(self, Self::with_strategy())
    }

    /// Hand the block and its live elements to the caller, leaving `self`
    /// empty. The caller becomes responsible for dropping `[0, len)`.
    pub(crate) fn release_storage(&mut self) -> RawStorage<T> {
        self.len = 0;
        self.storage.take()
    }

    /// Overwrite this sequence with clones of `source`.
    ///
    /// If `source` does not fit in the current capacity, a complete copy is
    /// built first and swapped in, so a panicking `clone` leaves `self`
    /// untouched and the old block is released. Otherwise existing
    /// elements are assigned in place, surplus elements are dropped, and
    /// missing ones are cloned into the spare capacity without
    /// reallocating.
    pub fn assign_from(&mut self, source: &[T])
    where
        T: Clone,
    {
        if source.len() > self.capacity() {
            let mut copy = Self::with_capacity_and_strategy(source.len());
            copy.clone_within_capacity(source);
            self.swap_with(&mut copy);
            return;
        }
        let shared = self.len.min(source.len());
        for (dst, src) in self.as_mut_slice()[..shared].iter_mut().zip(&source[..shared]) {
            dst.clone_from(src);
        }
        if source.len() < self.len {
            self.truncate(source.len());
        } else {
            self.clone_within_capacity(&source[shared..]);
        }
    }

    /// Clone `items` onto the end without growing. A panicking `clone`
    /// drops the clones made so far and leaves `len` unchanged.
    pub(crate) fn clone_within_capacity(&mut self, items: &[T])
    where
        T: Clone,
    {
        debug_assert!(self.len + items.len() <= self.capacity());
        let mut built = InitGuard::new(self.storage.slot_mut(self.len));
        for item in items {
            // SAFETY: len + built.len() < capacity, so the next slot is
            // uninitialized spare capacity.
            unsafe { built.push(item.clone()) };
        }
        self.len += built.disarm();
    }

    /// Construct `count` elements onto the end without growing, with the
    /// same rollback as [`clone_within_capacity`](Self::clone_within_capacity).
    fn fill_within_capacity<F>(&mut self, count: usize, mut f: F)
    where
        F: FnMut() -> T,
    {
        debug_assert!(self.len + count <= self.capacity());
        let mut built = InitGuard::new(self.storage.slot_mut(self.len));
        for _ in 0..count {
            // SAFETY: as in `clone_within_capacity`.
            unsafe { built.push(f()) };
        }
        self.len += built.disarm();
    }

    /// Write `value` into slot `len` and count it.
    ///
    /// # Safety
    ///
    /// `len < capacity` must hold.
    #[inline]
    unsafe fn write_next(&mut self, value: T) {
        debug_assert!(self.len < self.capacity());
        // SAFETY: upheld by the caller; slot `len` is uninitialized.
        unsafe { self.storage.slot_mut(self.len).write(value) };
        self.len += 1;
    }
}

impl<T, S: TransferStrategy<T>> Sequence<T, S> {
    /// Grow the capacity to exactly `capacity` if it is currently smaller.
    pub fn reserve(&mut self, capacity: usize) {
        if let Err(err) = self.try_reserve(capacity) {
            err.raise();
        }
    }

    /// Fallible form of [`reserve`](Sequence::reserve). On error the
    /// sequence is unchanged.
    pub fn try_reserve(&mut self, capacity: usize) -> Result<(), StorageError> {
        if capacity <= self.capacity() {
            return Ok(());
        }
        let fresh = RawStorage::try_with_capacity(capacity)?;
        // SAFETY: the new block is larger than the current live count and
        // holds nothing yet.
        unsafe { self.adopt(fresh, None) };
        Ok(())
    }

    /// Append `value`, doubling the capacity if the sequence is full.
    pub fn push(&mut self, value: T) {
        if let Err(err) = self.try_push(value) {
            err.raise();
        }
    }

    /// Fallible form of [`push`](Sequence::push). On error the sequence is
    /// unchanged and `value` is dropped.
    pub fn try_push(&mut self, value: T) -> Result<(), StorageError> {
        self.try_emplace_with(self.len, || Ok::<T, Infallible>(value))
            .map(|_| ())
            .map_err(SequenceError::into_storage)
    }

    /// Append the element built by `f` and return a reference to it.
    ///
    /// When the sequence is full, `f` runs after the new block has been
    /// acquired and its result is placed directly in its final slot before
    /// any existing element is transferred.
    pub fn emplace_back_with<F>(&mut self, f: F) -> &mut T
    where
        F: FnOnce() -> T,
    {
        self.emplace_with(self.len, f)
    }

    /// Fallible form of [`emplace_back_with`](Sequence::emplace_back_with)
    /// for constructors that report failure.
    pub fn try_emplace_back_with<F, E>(&mut self, f: F) -> Result<&mut T, SequenceError<E>>
    where
        F: FnOnce() -> Result<T, E>,
    {
        self.try_emplace_with(self.len, f)
    }

    /// Insert `value` before `index`, shifting later elements right.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, value: T) -> &mut T {
        self.emplace_with(index, || value)
    }

    /// Fallible form of [`insert`](Sequence::insert). On error the
    /// sequence is unchanged and `value` is dropped.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn try_insert(&mut self, index: usize, value: T) -> Result<&mut T, StorageError> {
        self.try_emplace_with(index, || Ok::<T, Infallible>(value))
            .map_err(SequenceError::into_storage)
    }

    /// Insert the element built by `f` before `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`, or propagates a panic from `f` with the
    /// sequence unchanged.
    pub fn emplace_with<F>(&mut self, index: usize, f: F) -> &mut T
    where
        F: FnOnce() -> T,
    {
        match self.try_emplace_with(index, || Ok::<T, Infallible>(f())) {
            Ok(slot) => slot,
            Err(err) => err.into_storage().raise(),
        }
    }

    /// Insert the element built by the fallible constructor `f` before
    /// `index`.
    ///
    /// With spare capacity, `f` runs before any slot is touched. Otherwise
    /// the grown block is acquired first, `f` runs, and its value is placed
    /// in its final slot before the existing elements are transferred
    /// around it. In every failure case, including a panic in `f` or in a
    /// cloning transfer, the sequence is left exactly as it was.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn try_emplace_with<F, E>(&mut self, index: usize, f: F) -> Result<&mut T, SequenceError<E>>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let len = self.len;
        assert!(
            index <= len,
            "insertion index (is {index}) should be <= len (is {len})"
        );
        if len < self.capacity() {
            let value = f().map_err(|source| SequenceError::ConstructionFailed { source })?;
            let base = self.storage.as_mut_ptr();
            // SAFETY: len < capacity, so slot `len` is spare; the live range
            // [index, len) shifts one slot right with an overlapping copy,
            // which cannot unwind, and the vacated slot is filled at once.
            unsafe {
                ptr::copy(base.add(index), base.add(index + 1), len - index);
                base.add(index).write(value);
            }
            self.len = len + 1;
        } else {
            let capacity = next_capacity(self.capacity())?;
            let mut fresh = RawStorage::try_with_capacity(capacity)?;
            let value = match f() {
                Ok(value) => value,
                Err(source) => {
                    tracing::debug!(
                        len,
                        capacity,
                        "element constructor failed; discarding grown block"
                    );
                    return Err(SequenceError::ConstructionFailed { source });
                }
            };
            fresh.slot_uninit_mut(index).write(value);
            // SAFETY: `fresh` has room for len + 1 elements and holds only
            // the new element at `index`.
            unsafe { self.adopt(fresh, Some(index)) };
        }
        // SAFETY: slot `index` now holds the inserted element.
        Ok(unsafe { &mut *self.storage.slot_mut(index) })
    }

    /// Resize to `len` elements, filling new slots with `T::default()`.
    pub fn resize(&mut self, len: usize)
    where
        T: Default,
    {
        if let Err(err) = self.try_resize(len) {
            err.raise();
        }
    }

    /// Fallible form of [`resize`](Sequence::resize).
    pub fn try_resize(&mut self, len: usize) -> Result<(), StorageError>
    where
        T: Default,
    {
        self.try_resize_with(len, || Ok::<T, Infallible>(T::default()))
            .map_err(SequenceError::into_storage)
    }

    /// Resize to `len` elements, filling new slots with values from `f`.
    pub fn resize_with<F>(&mut self, len: usize, mut f: F)
    where
        F: FnMut() -> T,
    {
        if let Err(err) = self.try_resize_with(len, || Ok::<T, Infallible>(f())) {
            err.into_storage().raise();
        }
    }

    /// Resize to `len` elements with a fallible constructor.
    ///
    /// Shrinking drops the trailing elements. Growing reserves exactly
    /// `len` slots, then constructs the new elements in order; if `f` fails
    /// or panics, the elements built so far are dropped and `len` is
    /// restored. The reserved capacity is kept.
    pub fn try_resize_with<F, E>(&mut self, len: usize, mut f: F) -> Result<(), SequenceError<E>>
    where
        F: FnMut() -> Result<T, E>,
    {
        if len <= self.len {
            self.truncate(len);
            return Ok(());
        }
        self.try_reserve(len)?;
        let mut built = InitGuard::new(self.storage.slot_mut(self.len));
        while self.len + built.len() < len {
            let value = f().map_err(|source| SequenceError::ConstructionFailed { source })?;
            // SAFETY: self.len + built.len() < len <= capacity, so the next
            // slot is uninitialized spare capacity.
            unsafe { built.push(value) };
        }
        self.len += built.disarm();
        Ok(())
    }

    /// Replace the storage with `fresh`, carrying the live elements across
    /// with `S`.
    ///
    /// With `gap = Some(i)`, slot `i` of `fresh` already holds a new
    /// element: elements `[0, i)` land at `[0, i)`, elements `[i, len)`
    /// land at `[i + 1, len + 1)`, and the new element is counted.
    ///
    /// # Safety
    ///
    /// `fresh` must have room for `len` (plus one with a gap) elements and
    /// hold no live value other than the gap element. `gap` must be at
    /// most `len`.
    unsafe fn adopt(&mut self, mut fresh: RawStorage<T>, gap: Option<usize>) {
        let len = self.len;
        let split = gap.unwrap_or(len);
        let shift = usize::from(gap.is_some());
        debug_assert!(split <= len);
        debug_assert!(len + shift <= fresh.capacity());

        let src = self.storage.as_ptr();
        let dst = fresh.as_mut_ptr();
        // SAFETY: the gap element is live and owned by nothing else yet.
        let placed = unsafe { InitGuard::covering(dst.wrapping_add(split), shift) };
        // SAFETY: [0, split) is live in the old block and uninitialized in
        // the new one; the blocks are distinct allocations.
        unsafe { S::transfer(src, dst, split) };
        // A moving strategy never unwinds, so only cloned prefixes need
        // cleanup if the suffix transfer does.
        let prefix_len = if S::MOVES { 0 } else { split };
        // SAFETY: the prefix copies are live and owned only by this guard.
        let prefix = unsafe { InitGuard::covering(dst, prefix_len) };
        // SAFETY: [split, len) is live in the old block and the shifted
        // destination range is uninitialized.
        unsafe {
            S::transfer(
                src.wrapping_add(split),
                dst.wrapping_add(split + shift),
                len - split,
            )
        };
        prefix.disarm();
        placed.disarm();

        tracing::trace!(
            from = self.storage.capacity(),
            to = fresh.capacity(),
            len,
            strategy = S::NAME,
            "sequence reallocated"
        );
        let mut old = mem::replace(&mut self.storage, fresh);
        self.len = len + shift;
        if !S::MOVES {
            // SAFETY: the originals are still live in the old block and no
            // longer reachable from `self`.
            unsafe { ptr::drop_in_place(ptr::slice_from_raw_parts_mut(old.as_mut_ptr(), len)) };
        }
        drop(old);
    }
}

impl<T, S> Drop for Sequence<T, S> {
    fn drop(&mut self) {
        // SAFETY: slots [0, len) are live; the storage then releases the
        // block without touching them again.
        unsafe { ptr::drop_in_place(self.as_mut_slice()) };
    }
}
