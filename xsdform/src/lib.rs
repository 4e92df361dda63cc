//! # xsdform
//!
//! Two-stage offline transform between XSD schemas and XML documents.
//!
//! ## Features
//!
//! - **Schema compilation** - Turn an XSD root element into a fillable tree of
//!   attributes and child slots, enriched from a field dictionary
//! - **Canonical model** - A JSON document an external filler edits in place
//! - **Document generation** - Turn a filled model back into XML honoring
//!   slot cardinality
//! - **Legacy encoding** - Output is written in windows-1251 and any character
//!   outside it is an error
//!
//! ## Quick Start
//!
//! ```ignore
//! use xsdform::prelude::*;
//!
//! let mut model = compile_schema_str(xsd, dictionary, "Root", CompilerConfig::default())?;
//! model.model.attribute_mut("Id").unwrap().set_value("7");
//! write_document(&model, "out.xml", &GeneratorConfig::default())?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`model`] - Canonical tree, values and the serialized model document
//! - [`schema`] - XSD reading, dictionary loading and compilation
//! - [`writer`] - Document generation and windows-1251 output

pub mod error;
pub mod pipeline;
pub mod prelude;

pub use error::{Error, Result};
pub use pipeline::{compile_schema_file, compile_schema_str, render_document, write_document};

/// Canonical model types.
pub mod model {
    pub use xsdform_model::*;
}

/// XSD reading and schema compilation.
pub mod schema {
    pub use xsdform_schema::*;
}

/// XML document generation and output.
pub mod writer {
    pub use xsdform_writer::*;
}
