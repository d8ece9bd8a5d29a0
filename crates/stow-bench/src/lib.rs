//! Benchmark workloads for the Stow container library.
//!
//! - [`small_values`]: cheap `Copy` elements, where reallocation cost is
//!   dominated by the block copy
//! - [`heap_values`]: owned strings, where a cloning transfer pays for
//!   every element on each reallocation
//! - [`filled`]: a sequence pre-populated from a workload

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use stow_seq::{Sequence, TransferStrategy};

/// `n` distinct `u64` values.
pub fn small_values(n: usize) -> Vec<u64> {
    (0..n as u64).map(|i| i.wrapping_mul(0x9E37_79B9_7F4A_7C15)).collect()
}

/// `n` distinct heap-allocated strings of moderate length.
pub fn heap_values(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("element-{i:08}")).collect()
}

/// A sequence holding clones of `values`, grown one push at a time.
pub fn filled<T: Clone, S: TransferStrategy<T>>(values: &[T]) -> Sequence<T, S> {
    let mut seq = Sequence::with_strategy();
    for value in values {
        seq.push(value.clone());
    }
    seq
}
