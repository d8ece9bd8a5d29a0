//! Stow: contiguous containers over raw slot storage with strong failure
//! guarantees.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the Stow sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use stow::prelude::*;
//!
//! let mut names: Sequence<String> = Sequence::new();
//! names.push("ada".to_string());
//! names.push("grace".to_string());
//! names.insert(1, "edsger".to_string());
//! assert_eq!(names, ["ada", "edsger", "grace"]);
//! assert_eq!(names.capacity(), 4);
//!
//! // Constructors that can fail leave the sequence untouched.
//! let err = names
//!     .try_emplace_back_with(|| "".parse::<u8>().map(|n| n.to_string()))
//!     .unwrap_err();
//! assert!(matches!(err, SequenceError::ConstructionFailed { .. }));
//! assert_eq!(names.len(), 3);
//!
//! // Reallocate by cloning instead of moving.
//! let mut copies: Sequence<String, CloneTransfer> = names.iter().cloned().collect();
//! copies.reserve(16);
//! assert!(!copies.transfers_by_move());
//! assert_eq!(copies, names);
//!
//! let counts = seq![0u32; 4];
//! assert_eq!(counts, [0, 0, 0, 0]);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`raw`] | `stow-raw` | `RawStorage` slot blocks and `StorageError` |
//! | [`seq`](mod@seq) | `stow-seq` | `Sequence`, transfer strategies, growth policy |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Uninitialized slot storage (`stow-raw`).
///
/// Most users only need [`raw::StorageError`], which is also available in
/// the [`prelude`].
pub use stow_raw as raw;

/// The growable sequence and its policies (`stow-seq`).
///
/// [`seq::Sequence`] is the container; [`seq::growth`] holds the capacity
/// policy and [`seq::transfer`] the reallocation strategies.
pub use stow_seq as seq;

pub use stow_seq::seq;

/// Common imports for typical Stow usage.
///
/// ```rust
/// use stow::prelude::*;
/// ```
pub mod prelude {
    // Storage
    pub use stow_raw::{RawStorage, StorageError};

    // Sequence
    pub use stow_seq::{seq, CloneTransfer, Relocate, Sequence, SequenceError, TransferStrategy};
}
