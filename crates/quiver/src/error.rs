//! Error types for the facade crate.

use thiserror::Error;

/// Errors that can occur when using `QuiverDB`.
#[derive(Debug, Error)]
pub enum Error {
    /// A storage backend error occurred.
    #[error(transparent)]
    Storage(#[from] quiver_storage::StorageError),

    /// A graph storage error occurred.
    #[error(transparent)]
    Graph(#[from] quiver_graph::GraphError),

    /// A query planning or execution error occurred.
    #[error(transparent)]
    Query(#[from] quiver_query::QueryError),

    /// A value codec or arithmetic error occurred.
    #[error(transparent)]
    Core(#[from] quiver_core::CoreError),

    /// A retried write gave up after exhausting its attempts.
    #[error("write retried {attempts} times without committing")]
    RetriesExhausted {
        /// How many attempts were made.
        attempts: u32,
    },
}

impl Error {
    /// Returns `true` if rerunning against a fresh transaction may
    /// succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Storage(e) => e.is_retryable(),
            Self::Graph(e) => e.is_retryable(),
            Self::Query(e) => e.is_retryable(),
            Self::Core(_) | Self::RetriesExhausted { .. } => false,
        }
    }
}
