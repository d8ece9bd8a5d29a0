//! How live elements are carried into a freshly allocated block.
//!
//! When a [`Sequence`](crate::Sequence) outgrows its storage it acquires a
//! new block and must populate it from the old one. Two policies exist:
//!
//! - [`Relocate`] moves the elements bitwise. A Rust move cannot fail, so
//!   once it starts there is nothing left to roll back to and the old
//!   block is released without dropping anything.
//! - [`CloneTransfer`] clones every element into the new block and only
//!   drops the originals after the whole batch succeeded. A panicking
//!   `clone` part-way through drops the copies made so far and leaves the
//!   old block exactly as it was.
//!
//! The strategy is a type parameter of the sequence, and
//! [`TransferStrategy::MOVES`] is the capability query the growth path
//! consults to decide whether the source block must be kept intact.

use std::ptr;

use crate::guard::InitGuard;

/// A policy for populating a new block from an old one.
///
/// # Safety
///
/// Implementations must uphold:
///
/// - On normal return, `dst[..len]` holds `len` live values.
/// - If [`MOVES`](TransferStrategy::MOVES) is `true`, `transfer` never
///   unwinds, and the values in `src[..len]` are considered moved out:
///   the caller releases the source block without dropping them.
/// - If `MOVES` is `false`, `src[..len]` is left untouched and still live,
///   and if `transfer` unwinds, no live value remains in `dst[..len]`.
pub unsafe trait TransferStrategy<T> {
    /// Whether the transfer is a move that cannot fail.
    const MOVES: bool;

    /// Short name used in diagnostics.
    const NAME: &'static str;

    /// Populate `dst[..len]` from `src[..len]`.
    ///
    /// # Safety
    ///
    /// `src[..len]` must hold live values, `dst[..len]` must be
    /// uninitialized and writable, and the two ranges must not overlap.
    unsafe fn transfer(src: *const T, dst: *mut T, len: usize);
}

/// Transfer by bitwise move. Available for every element type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Relocate;

// SAFETY: `copy_nonoverlapping` cannot unwind and produces `len` live
// values in `dst`; ownership passes from `src` to `dst`.
unsafe impl<T> TransferStrategy<T> for Relocate {
    const MOVES: bool = true;
    const NAME: &'static str = "relocate";

    #[inline]
    unsafe fn transfer(src: *const T, dst: *mut T, len: usize) {
        // SAFETY: upheld by the caller.
        unsafe { ptr::copy_nonoverlapping(src, dst, len) };
    }
}

/// Transfer by cloning, keeping the source block intact until the whole
/// batch has been copied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CloneTransfer;

// SAFETY: sources are only borrowed; the guard drops every clone written
// so far if a later `clone` unwinds, so `dst` holds nothing live on panic.
unsafe impl<T: Clone> TransferStrategy<T> for CloneTransfer {
    const MOVES: bool = false;
    const NAME: &'static str = "clone";

    unsafe fn transfer(src: *const T, dst: *mut T, len: usize) {
        let mut copies = InitGuard::new(dst);
        for i in 0..len {
            // SAFETY: `src[i]` is live and `dst[i]` is the next
            // uninitialized slot covered by the guard.
            unsafe {
                let value = (*src.add(i)).clone();
                copies.push(value);
            }
        }
        copies.disarm();
    }
}
