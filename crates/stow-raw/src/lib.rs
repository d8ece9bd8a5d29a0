//! Uninitialized contiguous slot storage for Stow containers.
//!
//! This is the leaf crate of the workspace. It owns raw memory and nothing
//! else: a [`RawStorage<T>`] is a block of `capacity` slots sized and
//! aligned for `T`, with no knowledge of which slots hold live values.
//! Element lifetimes are tracked by the owning container
//! (`stow_seq::Sequence`), which constructs into and drops out of the
//! slots it hands out.
//!
//! # Guarantees
//!
//! - Acquisition either returns a fully formed storage or a
//!   [`StorageError`]; there is no partially acquired state.
//! - Ownership moves in O(1) and is never duplicated.
//! - Dropping a storage releases the block and never runs an element
//!   destructor.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod error;
pub mod storage;

pub use error::StorageError;
pub use storage::RawStorage;
