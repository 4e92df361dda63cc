//! Error types for canonical model operations.

use thiserror::Error;

/// Error type for loading and saving the canonical model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The model document is not valid JSON or does not match the model shape.
    #[error("malformed model document: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An occurrence bound that is neither a number nor `unbounded`.
    #[error("invalid maxOccurs value '{value}'")]
    InvalidOccurs {
        /// Offending value.
        value: String,
    },
}

impl ModelError {
    /// Creates an invalid occurrence bound error.
    pub fn invalid_occurs(value: impl Into<String>) -> Self {
        Self::InvalidOccurs {
            value: value.into(),
        }
    }
}

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
