//! Owned blocks of uninitialized element slots.
//!
//! A [`RawStorage`] owns exactly one allocation sized for `capacity`
//! elements of `T`. It never constructs or drops elements: which slots
//! hold live values is tracked by the owner (see `stow-seq`). Dropping a
//! storage releases the block only, so any live elements left inside it
//! are leaked.

use std::alloc::{self, Layout};
use std::fmt;
use std::marker::PhantomData;
use std::mem::{self, MaybeUninit};
use std::ptr::NonNull;
use std::slice;

use crate::error::StorageError;

/// A uniquely owned block of `capacity` uninitialized slots for `T`.
///
/// Ownership is transferable (move, [`take`](RawStorage::take),
/// [`swap`](RawStorage::swap)) but never duplicable: the type is not
/// `Clone`. A capacity of zero holds no allocation, and neither does any
/// capacity when `T` is zero-sized.
pub struct RawStorage<T> {
    /// Start of the block, or dangling when nothing is allocated.
    buffer: NonNull<T>,
    /// Number of element slots (not bytes).
    capacity: usize,
    /// The block logically owns `T` slots for auto-trait purposes.
    _owns: PhantomData<T>,
}

// SAFETY: RawStorage uniquely owns its block; sending it sends the slots,
// which is sound exactly when T itself may be sent.
unsafe impl<T: Send> Send for RawStorage<T> {}

// SAFETY: shared access only hands out `*const T` / `&MaybeUninit<T>`,
// which is sound to share across threads when T is Sync.
unsafe impl<T: Sync> Sync for RawStorage<T> {}

impl<T> RawStorage<T> {
    const IS_ZST: bool = mem::size_of::<T>() == 0;

    /// An empty storage with capacity 0. Does not allocate.
    pub const fn new() -> Self {
        Self {
            buffer: NonNull::dangling(),
            capacity: 0,
            _owns: PhantomData,
        }
    }

    /// Acquire a block of `capacity` uninitialized slots.
    ///
    /// Capacity 0 yields an empty storage without touching the allocator.
    /// On failure nothing has been allocated and no storage exists.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, StorageError> {
        if capacity == 0 {
            return Ok(Self::new());
        }
        if Self::IS_ZST {
            return Ok(Self {
                buffer: NonNull::dangling(),
                capacity,
                _owns: PhantomData,
            });
        }
        let layout = Self::layout_for(capacity)?;
        // SAFETY: `layout` has a non-zero size because capacity > 0 and T
        // is not zero-sized.
        let ptr = unsafe { alloc::alloc(layout) };
        let Some(buffer) = NonNull::new(ptr.cast::<T>()) else {
            tracing::debug!(
                requested = capacity,
                bytes = layout.size(),
                "slot block allocation failed"
            );
            return Err(StorageError::AllocationFailed {
                requested: capacity,
                bytes: layout.size(),
                align: layout.align(),
            });
        };
        tracing::trace!(capacity, bytes = layout.size(), "allocated slot block");
        Ok(Self {
            buffer,
            capacity,
            _owns: PhantomData,
        })
    }

    /// Acquire a block of `capacity` slots, escalating failure through
    /// [`StorageError::raise`].
    pub fn with_capacity(capacity: usize) -> Self {
        match Self::try_with_capacity(capacity) {
            Ok(storage) => storage,
            Err(err) => err.raise(),
        }
    }

    fn layout_for(capacity: usize) -> Result<Layout, StorageError> {
        Layout::array::<T>(capacity).map_err(|_| {
            tracing::debug!(requested = capacity, "slot block layout overflow");
            StorageError::CapacityOverflow {
                requested: capacity,
            }
        })
    }

    /// Number of element slots in the block.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether the storage has no slots.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.capacity == 0
    }

    /// Address of slot 0. Dangling (but aligned) when nothing is allocated.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.buffer.as_ptr()
    }

    /// Mutable address of slot 0. Dangling (but aligned) when nothing is
    /// allocated.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.buffer.as_ptr()
    }

    /// Address of the slot at `offset`.
    ///
    /// `offset == capacity` is allowed and yields the one-past-the-end
    /// address. Larger offsets are a caller bug, caught by a debug
    /// assertion only.
    #[inline]
    pub fn slot(&self, offset: usize) -> *const T {
        debug_assert!(
            offset <= self.capacity,
            "slot offset {offset} past capacity {}",
            self.capacity
        );
        self.buffer.as_ptr().wrapping_add(offset)
    }

    /// Mutable address of the slot at `offset`. Same contract as
    /// [`slot`](RawStorage::slot).
    #[inline]
    pub fn slot_mut(&mut self, offset: usize) -> *mut T {
        debug_assert!(
            offset <= self.capacity,
            "slot offset {offset} past capacity {}",
            self.capacity
        );
        self.buffer.as_ptr().wrapping_add(offset)
    }

    /// The slot at `index`, viewed as possibly uninitialized memory.
    ///
    /// # Panics
    ///
    /// Panics if `index >= capacity`.
    #[inline]
    pub fn slot_uninit(&self, index: usize) -> &MaybeUninit<T> {
        debug_assert!(index < self.capacity);
        &self.as_uninit_slice()[index]
    }

    /// The slot at `index`, writable as possibly uninitialized memory.
    ///
    /// Overwriting a slot that holds a live value leaks that value.
    ///
    /// # Panics
    ///
    /// Panics if `index >= capacity`.
    #[inline]
    pub fn slot_uninit_mut(&mut self, index: usize) -> &mut MaybeUninit<T> {
        debug_assert!(index < self.capacity);
        &mut self.as_uninit_slice_mut()[index]
    }

    /// All slots as possibly uninitialized memory.
    #[inline]
    pub fn as_uninit_slice(&self) -> &[MaybeUninit<T>] {
        // SAFETY: the block spans `capacity` slots (or is dangling with a
        // zero-byte extent), and MaybeUninit<T> has no validity invariant.
        unsafe { slice::from_raw_parts(self.buffer.as_ptr().cast(), self.capacity) }
    }

    /// All slots as possibly uninitialized, writable memory.
    #[inline]
    pub fn as_uninit_slice_mut(&mut self) -> &mut [MaybeUninit<T>] {
        // SAFETY: as in `as_uninit_slice`; `&mut self` guarantees the
        // block is not aliased.
        unsafe { slice::from_raw_parts_mut(self.buffer.as_ptr().cast(), self.capacity) }
    }

    /// Exchange blocks with `other` in O(1).
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.buffer, &mut other.buffer);
        mem::swap(&mut self.capacity, &mut other.capacity);
    }

    /// Move the block out, leaving `self` empty with capacity 0.
    #[inline]
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }
}

impl<T> Default for RawStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for RawStorage<T> {
    fn drop(&mut self) {
        if self.capacity == 0 || Self::IS_ZST {
            return;
        }
        // The layout was valid when the block was acquired.
        if let Ok(layout) = Layout::array::<T>(self.capacity) {
            tracing::trace!(capacity = self.capacity, bytes = layout.size(), "released slot block");
            // SAFETY: `buffer` was returned by `alloc::alloc` with exactly
            // this layout and has not been released since.
            unsafe { alloc::dealloc(self.buffer.as_ptr().cast(), layout) };
        }
    }
}

impl<T> fmt::Debug for RawStorage<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawStorage")
            .field("buffer", &self.buffer)
            .field("capacity", &self.capacity)
            .finish()
    }
}
