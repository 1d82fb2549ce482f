//! Storage error types.

use thiserror::Error;

/// Errors that can occur in storage operations.
///
/// The variants mirror the backend's failure classes. [`Busy`] and
/// [`TryAgain`] are retryable: the caller aborts the transaction, backs
/// off, and reruns against a fresh one.
///
/// [`Busy`]: StorageError::Busy
/// [`TryAgain`]: StorageError::TryAgain
#[derive(Debug, Error)]
pub enum StorageError {
    /// The requested key or entity does not exist.
    #[error("not found")]
    NotFound,

    /// A conflicting transaction committed first.
    #[error("transaction conflict, retry with a fresh transaction")]
    Busy,

    /// The backend's conflict-tracking history is exhausted.
    #[error("conflict history exhausted, retry with a fresh transaction")]
    TryAgain,

    /// The backend detected corrupt data.
    #[error("corruption: {0}")]
    Corruption(String),

    /// An argument was rejected by the backend.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(String),

    /// Any other backend failure.
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl StorageError {
    /// Returns `true` if the operation may succeed when rerun against a
    /// fresh transaction.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Busy | Self::TryAgain)
    }
}

impl From<rocksdb::Error> for StorageError {
    fn from(e: rocksdb::Error) -> Self {
        use rocksdb::ErrorKind;
        match e.kind() {
            ErrorKind::NotFound => Self::NotFound,
            ErrorKind::Busy => Self::Busy,
            ErrorKind::TryAgain => Self::TryAgain,
            ErrorKind::Corruption => Self::Corruption(e.to_string()),
            ErrorKind::IOError => Self::Io(e.to_string()),
            ErrorKind::InvalidArgument => Self::InvalidArgument(e.to_string()),
            _ => Self::Backend(e.to_string()),
        }
    }
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
