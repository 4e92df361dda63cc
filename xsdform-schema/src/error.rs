//! Error types for schema reading, dictionary loading and compilation.

use thiserror::Error;

/// Error type for XSD reading.
#[derive(Debug, Error)]
pub enum ParseError {
    /// XML parsing error.
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Bad character or entity reference in an attribute value.
    #[error("XML escape error: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),

    /// Invalid schema structure.
    #[error("invalid schema structure: {message}")]
    InvalidStructure {
        /// Error message.
        message: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 decoding error.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

impl ParseError {
    /// Creates an invalid structure error.
    pub fn invalid_structure(message: impl Into<String>) -> Self {
        Self::InvalidStructure {
            message: message.into(),
        }
    }
}

/// Error type for schema compilation.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Parsing error.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// No top-level element declaration with the requested name.
    #[error("root element '{name}' not found among top-level declarations")]
    RootNotFound {
        /// Requested root element name.
        name: String,
    },

    /// Root declaration is a bare leaf.
    #[error("root element '{name}' has no complex type")]
    RootNotComplex {
        /// Root element name.
        name: String,
    },

    /// Named complex types referencing themselves.
    #[error("circular type reference detected: {path}")]
    CircularType {
        /// Chain of type names forming the cycle.
        path: String,
    },

    /// Occurrence bound that is neither a number nor `unbounded`.
    #[error("invalid maxOccurs '{value}' on element '{element}'")]
    InvalidOccurs {
        /// Element path.
        element: String,
        /// Offending value.
        value: String,
    },

    /// `ref` pointing at no top-level element.
    #[error("element reference '{name}' at '{element}' does not resolve")]
    UnresolvedReference {
        /// Referenced name.
        name: String,
        /// Path of the referencing declaration.
        element: String,
    },
}

impl SchemaError {
    /// Creates a root not found error.
    pub fn root_not_found(name: impl Into<String>) -> Self {
        Self::RootNotFound { name: name.into() }
    }

    /// Creates a root not complex error.
    pub fn root_not_complex(name: impl Into<String>) -> Self {
        Self::RootNotComplex { name: name.into() }
    }

    /// Creates an invalid occurrence bound error.
    pub fn invalid_occurs(element: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidOccurs {
            element: element.into(),
            value: value.into(),
        }
    }
}

/// Error type for dictionary loading.
///
/// Only structural problems are errors. Individual unusable field records
/// are skipped.
#[derive(Debug, Error)]
pub enum DictionaryError {
    /// Document is not JSON or not a table-of-tables.
    #[error("malformed dictionary document: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
