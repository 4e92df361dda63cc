//! # xsdform Writer
//!
//! XML document generation from filled canonical models.
//!
//! This crate provides:
//! - The document generator honoring slot cardinality
//! - An owned XML element tree
//! - windows-1251 output encoding with hard failure on unmappable characters
//! - Atomic file output (temporary file, then rename)

pub mod config;
pub mod element;
pub mod encoding;
pub mod error;
pub mod generator;
pub mod output;

pub use config::{ChoicePolicy, GeneratorConfig};
pub use element::XmlElement;
pub use error::GenerationError;
pub use generator::{DocumentGenerator, generate};
pub use output::{render, write_file};
