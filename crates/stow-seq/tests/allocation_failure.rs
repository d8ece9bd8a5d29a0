//! Integration test: allocator exhaustion on the growth path.
//!
//! A wrapping global allocator refuses every request made on the current
//! thread while armed. Appends and inserts into a full sequence must report
//! `AllocationFailed` before running the element constructor, and leave the
//! sequence exactly as it was.

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;

use stow_raw::StorageError;
use stow_seq::{Sequence, SequenceError};
use stow_test_utils::Refused;

// ── Failing allocator ──────────────────────────────────────────────────

struct Exhaustible;

thread_local! {
    static EXHAUSTED: Cell<bool> = const { Cell::new(false) };
}

// SAFETY: every request is forwarded to `System` unchanged, or refused
// with a null pointer, which `GlobalAlloc` permits.
unsafe impl GlobalAlloc for Exhaustible {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if EXHAUSTED.with(Cell::get) {
            return std::ptr::null_mut();
        }
        // SAFETY: forwarded with the caller's layout.
        unsafe { System.alloc(layout) }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        // SAFETY: `ptr` came from `System.alloc` with this layout.
        unsafe { System.dealloc(ptr, layout) }
    }
}

#[global_allocator]
static ALLOCATOR: Exhaustible = Exhaustible;

/// Run `f` with every allocation on this thread refused.
fn exhausted<R>(f: impl FnOnce() -> R) -> R {
    struct Restore;
    impl Drop for Restore {
        fn drop(&mut self) {
            EXHAUSTED.with(|flag| flag.set(false));
        }
    }
    EXHAUSTED.with(|flag| flag.set(true));
    let _restore = Restore;
    f()
}

fn full() -> Sequence<u64> {
    let seq: Sequence<u64> = [1, 2].into();
    assert_eq!(seq.capacity(), 2);
    seq
}

const GROWN: StorageError = StorageError::AllocationFailed {
    requested: 4,
    bytes: 32,
    align: 8,
};

// ── Growth path ────────────────────────────────────────────────────────

#[test]
fn failed_growth_on_emplace_back_skips_constructor() {
    let mut seq = full();
    let before = seq.as_ptr();
    let called = Cell::new(false);

    let result = exhausted(|| {
        seq.try_emplace_back_with(|| {
            called.set(true);
            Ok::<u64, Refused>(3)
        })
        .map(|slot| *slot)
    });

    assert_eq!(result, Err(SequenceError::Storage(GROWN)));
    assert!(!called.get());
    assert_eq!(seq, [1, 2]);
    assert_eq!(seq.capacity(), 2);
    assert_eq!(seq.as_ptr(), before);
}

#[test]
fn failed_growth_on_emplace_skips_constructor() {
    let mut seq = full();
    let called = Cell::new(false);

    let result = exhausted(|| {
        seq.try_emplace_with(1, || {
            called.set(true);
            Ok::<u64, Refused>(9)
        })
        .map(|slot| *slot)
    });

    assert_eq!(result, Err(SequenceError::Storage(GROWN)));
    assert!(!called.get());
    assert_eq!(seq, [1, 2]);
    assert_eq!(seq.capacity(), 2);
}

#[test]
fn failed_growth_on_push_and_insert_leaves_sequence_unchanged() {
    let mut seq = full();

    let pushed = exhausted(|| seq.try_push(3));
    assert_eq!(pushed, Err(GROWN));

    let inserted = exhausted(|| seq.try_insert(0, 0).map(|slot| *slot));
    assert_eq!(inserted, Err(GROWN));

    assert_eq!(seq, [1, 2]);
    assert_eq!(seq.capacity(), 2);
}

#[test]
fn spare_capacity_needs_no_allocation() {
    let mut seq: Sequence<u64> = Sequence::with_capacity(4);
    seq.push(1);

    let result = exhausted(|| seq.try_push(2));

    assert_eq!(result, Ok(()));
    assert_eq!(seq, [1, 2]);
}

#[test]
fn allocator_recovers_after_failure() {
    let mut seq = full();
    assert!(exhausted(|| seq.try_push(3)).is_err());
    seq.push(3);
    assert_eq!(seq, [1, 2, 3]);
    assert_eq!(seq.capacity(), 4);
}
