//! Error types for planning and execution.

use quiver_core::CoreError;
use quiver_graph::GraphError;
use thiserror::Error;

/// Errors that can occur while building or executing a query plan.
#[derive(Debug, Error)]
pub enum QueryError {
    /// An operation required a value with a different tag.
    #[error("wrong value type: expected {expected}, got {got}")]
    WrongType {
        /// The tag the operation required.
        expected: &'static str,
        /// The tag it found.
        got: &'static str,
    },

    /// The plan is structurally invalid.
    #[error("malformed plan: {0}")]
    MalformedPlan(String),

    /// An expression referenced a parameter the caller did not supply.
    #[error("unknown parameter: ${0}")]
    UnknownParameter(String),

    /// The executor's pull budget is exhausted.
    #[error("execution budget exhausted")]
    BudgetExhausted,

    /// A graph storage error occurred.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// A value codec or arithmetic error occurred.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl QueryError {
    /// Returns `true` if rerunning the query against a fresh transaction
    /// may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Graph(e) => e.is_retryable(),
            _ => false,
        }
    }
}

impl From<quiver_storage::StorageError> for QueryError {
    fn from(e: quiver_storage::StorageError) -> Self {
        Self::Graph(GraphError::from(e))
    }
}

/// Result type alias for query operations.
pub type QueryResult<T> = Result<T, QueryError>;
