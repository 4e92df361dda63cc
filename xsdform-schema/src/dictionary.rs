//! Field dictionary.
//!
//! The dictionary is a table-of-tables JSON document describing every short
//! field name used by a family of forms:
//!
//! ```json
//! {"tables": [{"tableNumber": "4.1", "fields": [
//!     {"shortName": "ИдФайл", "fullName": "Идентификатор файла",
//!      "type": "T", "format": "T(1-255)", "required": "О", "info": ""}
//! ]}]}
//! ```
//!
//! Loading flattens it into a short name → metadata map. The map is built
//! once and only read afterwards.

use crate::config::CollisionPolicy;
use crate::error::DictionaryError;
use serde::Deserialize;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::io::Read;
use std::path::Path;
use xsdform_model::{FieldMetadata, Scalar};

/// Raw dictionary document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DictionaryDocument {
    /// Tables in document order.
    #[serde(default)]
    pub tables: Vec<DictionaryTable>,
}

/// One dictionary table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryTable {
    /// Table number as printed in the format description.
    #[serde(default)]
    pub table_number: Option<Scalar>,
    /// Field records, kept raw so one bad record cannot fail the document.
    #[serde(default)]
    pub fields: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FieldRecord {
    #[serde(default)]
    short_name: Option<String>,
    #[serde(default)]
    full_name: Option<Scalar>,
    #[serde(rename = "type", default)]
    field_type: Option<Scalar>,
    #[serde(default)]
    format: Option<Scalar>,
    #[serde(default)]
    required: Option<Scalar>,
    #[serde(default)]
    info: Option<Scalar>,
}

impl FieldRecord {
    fn into_metadata(self, table_number: Option<Scalar>) -> FieldMetadata {
        let text = |s: Option<Scalar>| s.map(|s| s.to_string());
        FieldMetadata {
            full_name: text(self.full_name),
            field_type: text(self.field_type),
            format: text(self.format),
            required: self.required,
            info: text(self.info),
            table_number,
        }
    }
}

/// Short name → metadata lookup table.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    entries: HashMap<String, FieldMetadata>,
}

impl Dictionary {
    /// Creates an empty dictionary. Every lookup misses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flattens a table-of-tables document.
    ///
    /// Records without a short name, or that are not objects of the expected
    /// shape, are skipped.
    #[must_use]
    pub fn from_document(document: DictionaryDocument, policy: CollisionPolicy) -> Self {
        let mut dictionary = Self::new();

        for table in document.tables {
            for raw in table.fields {
                let record: FieldRecord = match serde_json::from_value(raw) {
                    Ok(record) => record,
                    Err(e) => {
                        tracing::warn!(
                            "Skipping unreadable field record in table {:?}: {}",
                            table.table_number,
                            e
                        );
                        continue;
                    }
                };
                let Some(short_name) = record.short_name.clone().filter(|s| !s.is_empty()) else {
                    continue;
                };
                let metadata = record.into_metadata(table.table_number.clone());
                dictionary.insert(short_name, metadata, policy);
            }
        }

        tracing::info!("Dictionary loaded with {} entries", dictionary.len());
        dictionary
    }

    /// Parses and flattens a dictionary from JSON text.
    ///
    /// # Errors
    /// Returns `DictionaryError::Json` if the document is not a table-of-tables.
    pub fn from_json_str(json: &str, policy: CollisionPolicy) -> Result<Self, DictionaryError> {
        let document: DictionaryDocument = serde_json::from_str(json)?;
        Ok(Self::from_document(document, policy))
    }

    /// Parses and flattens a dictionary from a reader.
    ///
    /// # Errors
    /// Returns `DictionaryError` on read failure or malformed JSON.
    pub fn from_reader(reader: impl Read, policy: CollisionPolicy) -> Result<Self, DictionaryError> {
        let document: DictionaryDocument = serde_json::from_reader(reader)?;
        Ok(Self::from_document(document, policy))
    }

    /// Loads a dictionary file.
    ///
    /// # Errors
    /// Returns `DictionaryError` on read failure or malformed JSON.
    pub fn from_path(path: impl AsRef<Path>, policy: CollisionPolicy) -> Result<Self, DictionaryError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text, policy)
    }

    /// Adds one entry, resolving a collision according to `policy`.
    pub fn insert(&mut self, short_name: String, metadata: FieldMetadata, policy: CollisionPolicy) {
        match self.entries.entry(short_name) {
            Entry::Vacant(slot) => {
                slot.insert(metadata);
            }
            Entry::Occupied(mut slot) => match policy {
                CollisionPolicy::FirstWins => {
                    tracing::warn!(
                        "Short name '{}' already defined in table {:?}, ignoring table {:?}",
                        slot.key(),
                        slot.get().table_number,
                        metadata.table_number
                    );
                }
                CollisionPolicy::LastWins => {
                    tracing::debug!("Short name '{}' redefined, last wins", slot.key());
                    slot.insert(metadata);
                }
            },
        }
    }

    /// Looks up metadata by short name.
    #[must_use]
    pub fn lookup(&self, short_name: &str) -> Option<&FieldMetadata> {
        self.entries.get(short_name)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the dictionary has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
