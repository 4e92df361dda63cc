//! Serialized canonical model document.
//!
//! This is the interface between compilation and generation: the compiler
//! saves it, an external filler edits values in it, and the writer loads it.

use crate::error::Result;
use crate::tree::ContainerNode;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// Root tag plus the compiled (and possibly filled) root container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalModel {
    /// Name of the document element.
    pub root_tag: String,
    /// Root container.
    pub model: ContainerNode,
}

impl CanonicalModel {
    /// Creates a model document.
    #[must_use]
    pub fn new(root_tag: impl Into<String>, model: ContainerNode) -> Self {
        Self {
            root_tag: root_tag.into(),
            model,
        }
    }

    /// Parses a model document from JSON text.
    ///
    /// # Errors
    /// Returns `ModelError::Json` if the text does not describe a model.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses a model document from a reader.
    ///
    /// # Errors
    /// Returns `ModelError` on read failure or malformed JSON.
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Loads a model document from a file.
    ///
    /// # Errors
    /// Returns `ModelError` on read failure or malformed JSON.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Renders the document as indented JSON, keeping non-ASCII names readable.
    ///
    /// # Errors
    /// Returns `ModelError::Json` if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the document to a file as indented JSON.
    ///
    /// # Errors
    /// Returns `ModelError` on serialization or write failure.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }
}
