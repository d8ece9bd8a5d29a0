//! Storage acquisition errors.

use std::alloc::{handle_alloc_error, Layout};
use std::error::Error;
use std::fmt;

/// Errors that can occur while acquiring a block of slots.
///
/// Both variants are raised before any state is mutated: a failed
/// acquisition never leaves a half-constructed [`RawStorage`](crate::RawStorage)
/// behind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageError {
    /// The requested slot count does not describe a valid allocation
    /// layout (its byte size exceeds `isize::MAX`), or a growth step
    /// overflowed `usize`.
    CapacityOverflow {
        /// Number of element slots requested.
        requested: usize,
    },
    /// The global allocator could not satisfy the request.
    AllocationFailed {
        /// Number of element slots requested.
        requested: usize,
        /// Size of the failed request in bytes.
        bytes: usize,
        /// Alignment of the failed request in bytes.
        align: usize,
    },
}

impl StorageError {
    /// Layout of the request that failed, if one could be formed.
    pub fn layout(&self) -> Option<Layout> {
        match self {
            Self::CapacityOverflow { .. } => None,
            Self::AllocationFailed { bytes, align, .. } => {
                Layout::from_size_align(*bytes, *align).ok()
            }
        }
    }

    /// Escalate the error the way the standard collections do.
    ///
    /// Allocation failures are routed to [`handle_alloc_error`]; layout
    /// overflow panics with `"capacity overflow"`. Used by the infallible
    /// counterparts of every `try_*` operation.
    #[cold]
    #[track_caller]
    pub fn raise(self) -> ! {
        match self.layout() {
            Some(layout) => handle_alloc_error(layout),
            None => panic!("capacity overflow: {self}"),
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityOverflow { requested } => {
                write!(f, "capacity overflow: {requested} slots exceed the addressable size")
            }
            Self::AllocationFailed {
                requested,
                bytes,
                align,
            } => {
                write!(
                    f,
                    "allocation failed: {requested} slots ({bytes} bytes, align {align})"
                )
            }
        }
    }
}

impl Error for StorageError {}
