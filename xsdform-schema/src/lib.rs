//! # xsdform Schema
//!
//! XSD reading and compilation into the canonical fillable model.
//!
//! This crate provides:
//! - A small XSD document reader built on quick-xml
//! - The field dictionary loader (short name → metadata)
//! - The schema compiler producing [`xsdform_model::ContainerNode`] trees
//! - Compiler configuration

pub mod compiler;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod xsd;

pub use compiler::{SchemaCompiler, compile_root};
pub use config::{AttributeScope, CollisionPolicy, CompilerConfig};
pub use dictionary::{Dictionary, DictionaryDocument, DictionaryTable};
pub use error::{DictionaryError, ParseError, SchemaError};
pub use xsd::{XsdNode, XsdSchema, parse_xsd, parse_xsd_file};
