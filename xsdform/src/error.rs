//! Error type for the end-to-end pipelines.

use thiserror::Error;
use xsdform_model::ModelError;
use xsdform_schema::{DictionaryError, SchemaError};
use xsdform_writer::GenerationError;

/// Any failure raised by a pipeline stage.
#[derive(Debug, Error)]
pub enum Error {
    /// Schema could not be read or compiled.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Dictionary document is malformed.
    #[error("dictionary error: {0}")]
    Dictionary(#[from] DictionaryError),

    /// Canonical model could not be read or written.
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// Document could not be generated or written.
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;
