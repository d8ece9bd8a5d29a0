//! Growable contiguous sequence with strong failure guarantees.
//!
//! [`Sequence<T, S>`] pairs one [`RawStorage`](stow_raw::RawStorage) with a
//! live-element count. It performs every construction and destruction
//! inside that storage and keeps the invariant that slots `[0, len)` are
//! live and `[len, capacity)` are uninitialized across every operation,
//! including failing ones.
//!
//! # Failure model
//!
//! - Storage acquisition failures are reported by the `try_*` operations
//!   as [`StorageError`](stow_raw::StorageError) (or
//!   [`SequenceError::Storage`]) with the sequence unchanged. The plain
//!   operations escalate them like the standard collections do.
//! - Constructors that report failure as a value go through the
//!   `try_emplace*` / `try_resize_with` operations and surface as
//!   [`SequenceError::ConstructionFailed`], again with the sequence
//!   unchanged.
//! - Panicking constructors, `clone`s and `Default`s unwind through scoped
//!   guards that drop whatever was partially built, so the sequence is left
//!   as it was before the call.
//!
//! # Architecture
//!
//! ```text
//! Sequence<T, S>
//! ├── RawStorage<T>          (stow-raw: one block, no element lifetimes)
//! ├── len                    (live count, slots [0, len))
//! └── S: TransferStrategy<T> (Relocate | CloneTransfer)
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod error;
pub mod growth;
pub mod iter;
pub mod sequence;
pub mod transfer;

mod guard;
mod impls;
mod macros;

pub use error::SequenceError;
pub use iter::IntoIter;
pub use sequence::Sequence;
pub use transfer::{CloneTransfer, Relocate, TransferStrategy};
