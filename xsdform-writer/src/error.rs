//! Error types for document generation.

use thiserror::Error;

/// Error type for document generation and output.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// A name or value has a character outside the output code page.
    #[error("character {character:?} at '{path}' cannot be encoded in {encoding}")]
    UnencodableCharacter {
        /// Tag/attribute path of the offending name or value.
        path: String,
        /// First unmappable character.
        character: char,
        /// Output encoding name.
        encoding: &'static str,
    },

    /// A name or value has a character XML 1.0 does not allow.
    #[error("character {character:?} at '{path}' is not allowed in XML")]
    IllegalCharacter {
        /// Tag/attribute path of the offending name or value.
        path: String,
        /// First disallowed character.
        character: char,
    },

    /// Filled value shape contradicts the slot cardinality.
    #[error("shape mismatch at '{path}': {message}")]
    ShapeMismatch {
        /// Tag/attribute path.
        path: String,
        /// What was wrong.
        message: String,
    },

    /// More than one alternative of an exclusive choice carries data.
    #[error("conflicting choice alternatives under '{path}': {alternatives}")]
    ChoiceConflict {
        /// Path of the parent element.
        path: String,
        /// Tags of the filled alternatives.
        alternatives: String,
    },

    /// XML writer error.
    #[error("XML writing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Serialized document is not valid UTF-8 before encoding.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GenerationError {
    /// Creates a shape mismatch error.
    pub fn shape_mismatch(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            path: path.into(),
            message: message.into(),
        }
    }
}
