//! Scoped cleanup for partially constructed slot ranges.
//!
//! Every multi-step construction in this crate writes into uninitialized
//! slots through an [`InitGuard`]. If the step unwinds (a panicking
//! `clone`, constructor closure or `Default`) or bails out early with an
//! error, the guard drops exactly the values written so far and nothing
//! else. On success the caller [`disarm`](InitGuard::disarm)s it and takes
//! ownership of the range.

use std::mem;
use std::ptr;

/// Tracks `len` live values written contiguously from `start`.
pub(crate) struct InitGuard<T> {
    start: *mut T,
    len: usize,
}

impl<T> InitGuard<T> {
    /// A guard over an empty range beginning at `start`.
    pub(crate) fn new(start: *mut T) -> Self {
        Self { start, len: 0 }
    }

    /// A guard that already owns `len` live values at `start`.
    ///
    /// # Safety
    ///
    /// `start[..len]` must hold live values that nothing else will drop
    /// while the guard is armed.
    pub(crate) unsafe fn covering(start: *mut T, len: usize) -> Self {
        Self { start, len }
    }

    /// Write `value` into the next slot and take responsibility for it.
    ///
    /// # Safety
    ///
    /// The slot at `start + len` must be uninitialized and writable.
    #[inline]
    pub(crate) unsafe fn push(&mut self, value: T) {
        // SAFETY: upheld by the caller.
        unsafe { self.start.add(self.len).write(value) };
        self.len += 1;
    }

    /// Number of live values currently covered.
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Release the covered values to the caller without dropping them.
    #[inline]
    pub(crate) fn disarm(self) -> usize {
        let len = self.len;
        mem::forget(self);
        len
    }
}

impl<T> Drop for InitGuard<T> {
    fn drop(&mut self) {
        // SAFETY: the guard only ever covers values it was told are live
        // and that no one else owns.
        unsafe { ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.start, self.len)) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::MaybeUninit;
    use std::rc::Rc;

    #[test]
    fn drops_written_values_when_not_disarmed() {
        let rc = Rc::new(());
        let mut slots: [MaybeUninit<Rc<()>>; 4] = [const { MaybeUninit::uninit() }; 4];
        {
            let mut guard = InitGuard::new(slots.as_mut_ptr().cast::<Rc<()>>());
            // SAFETY: slots 0 and 1 are uninitialized.
            unsafe {
                guard.push(Rc::clone(&rc));
                guard.push(Rc::clone(&rc));
            }
            assert_eq!(guard.len(), 2);
            assert_eq!(Rc::strong_count(&rc), 3);
        }
        assert_eq!(Rc::strong_count(&rc), 1);
    }

    #[test]
    fn disarm_hands_over_ownership() {
        let rc = Rc::new(());
        let mut slots: [MaybeUninit<Rc<()>>; 2] = [const { MaybeUninit::uninit() }; 2];
        let base = slots.as_mut_ptr().cast::<Rc<()>>();
        let mut guard = InitGuard::new(base);
        // SAFETY: slot 0 is uninitialized.
        unsafe { guard.push(Rc::clone(&rc)) };
        assert_eq!(guard.disarm(), 1);
        assert_eq!(Rc::strong_count(&rc), 2);
        // SAFETY: slot 0 was handed over live by the disarmed guard.
        unsafe { ptr::drop_in_place(base) };
        assert_eq!(Rc::strong_count(&rc), 1);
    }
}
