//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions.
//!
//! ```ignore
//! use xsdform::prelude::*;
//! ```

// Pipelines
pub use crate::error::{Error, Result};
pub use crate::pipeline::{
    compile_schema_file, compile_schema_str, render_document, write_document,
};

// Model types
pub use xsdform_model::{
    CanonicalModel, Cardinality, ChildSlot, ChoiceRef, ContainerNode, FieldDescriptor,
    FieldMetadata, FieldValue, NestedContent, Occurs, Scalar, SlotContent,
};

// Schema types
pub use xsdform_schema::{
    AttributeScope, CollisionPolicy, CompilerConfig, Dictionary, SchemaCompiler, SchemaError,
};

// Writer types
pub use xsdform_writer::{
    ChoicePolicy, DocumentGenerator, GenerationError, GeneratorConfig, XmlElement,
};
