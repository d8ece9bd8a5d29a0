//! Sequence operation errors.

use std::convert::Infallible;
use std::error::Error;
use std::fmt;

use stow_raw::StorageError;

/// Errors from sequence operations that construct a new element.
///
/// `E` is the error type of the caller-supplied constructor; operations
/// whose constructors cannot fail use the default `Infallible`, for which
/// [`into_storage`](SequenceError::into_storage) recovers the plain
/// [`StorageError`].
///
/// Whichever variant is returned, the sequence is unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SequenceError<E = Infallible> {
    /// Storage for the grown sequence could not be acquired.
    Storage(StorageError),
    /// The element constructor reported failure.
    ConstructionFailed {
        /// The constructor's error.
        source: E,
    },
}

impl<E> SequenceError<E> {
    /// The storage error, if this is an allocation-side failure.
    pub fn storage(&self) -> Option<&StorageError> {
        match self {
            Self::Storage(err) => Some(err),
            Self::ConstructionFailed { .. } => None,
        }
    }

    /// The constructor's error, if construction failed.
    pub fn into_construction(self) -> Option<E> {
        match self {
            Self::Storage(_) => None,
            Self::ConstructionFailed { source } => Some(source),
        }
    }
}

impl SequenceError<Infallible> {
    /// Unwrap the storage error; construction cannot have failed.
    pub fn into_storage(self) -> StorageError {
        match self {
            Self::Storage(err) => err,
            Self::ConstructionFailed { source } => match source {},
        }
    }
}

impl<E> From<StorageError> for SequenceError<E> {
    fn from(err: StorageError) -> Self {
        Self::Storage(err)
    }
}

impl<E: fmt::Display> fmt::Display for SequenceError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "sequence storage: {err}"),
            Self::ConstructionFailed { source } => {
                write!(f, "element construction failed: {source}")
            }
        }
    }
}

impl<E: Error + 'static> Error for SequenceError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::ConstructionFailed { source } => Some(source),
        }
    }
}
