//! Error types for tessera-transform

use thiserror::Error;

/// Errors that can occur during geometric transformations
#[derive(Debug, Error)]
pub enum TransformError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] tessera_core::Error),

    /// Invalid transformation parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// Unknown boundary policy name
    #[error("unsupported boundary policy: {0}")]
    UnsupportedPolicy(String),

    /// Unknown anchor name
    #[error("unsupported anchor: {0}")]
    UnsupportedAnchor(String),

    /// Tiles disagree about a shared placement field
    #[error("inconsistent tile metadata for {field}: {first} vs {second}")]
    InconsistentMetadata {
        field: &'static str,
        first: u32,
        second: u32,
    },

    /// A required placement field is absent
    #[error("missing tile metadata: {0}")]
    MissingMetadata(&'static str),

    /// The caller cancelled the operation
    #[error("operation cancelled")]
    Cancelled,
}

/// Result type for transform operations
pub type TransformResult<T> = Result<T, TransformError>;
