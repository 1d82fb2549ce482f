//! Error types for graph operations.

use quiver_core::{CoreError, ElementId};
use quiver_storage::StorageError;
use thiserror::Error;

/// Errors that can occur in graph storage operations.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A storage backend error occurred.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// An encoding or decoding error occurred.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The addressed entity does not exist.
    ///
    /// Reads surface missing entities as `None`; deletes surface them as
    /// this error.
    #[error("element not found: {0}")]
    NotFound(ElementId),

    /// An edge was re-written with different endpoints or directedness.
    #[error("edge {0} already exists with different endpoints or direction")]
    EdgeDataMismatch(ElementId),

    /// The adjacency index disagrees with the primary data.
    #[error("corrupted adjacency index: {0}")]
    CorruptedIndex(String),
}

impl GraphError {
    /// Returns `true` if the operation may succeed when rerun against a
    /// fresh transaction.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Storage(e) => e.is_retryable(),
            _ => false,
        }
    }
}

/// Result type alias for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;
