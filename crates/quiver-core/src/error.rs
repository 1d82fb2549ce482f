//! Error types for the core crate.

use thiserror::Error;

/// Errors that can occur in the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A value could not be encoded.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// A value tag byte was not recognized during decoding.
    #[error("invalid value tag: {0:#04x}")]
    InvalidValueTag(u8),

    /// Stored bytes could not be decoded back into an entity or value.
    ///
    /// Corruption is fatal to the operation that observed it but not to
    /// the process; the database remains usable.
    #[error("corrupt data: {0}")]
    Corruption(String),

    /// A string could not be parsed as an element id.
    #[error("invalid element id: {0}")]
    InvalidId(String),

    /// Integer arithmetic overflowed.
    #[error("integer overflow")]
    IntOverflow,
}

impl CoreError {
    /// Creates a corruption error for truncated input.
    #[must_use]
    pub fn truncated(context: &str) -> Self {
        Self::Corruption(format!("unexpected end of input in {context}"))
    }
}
