//! # xsdform Model
//!
//! Canonical tree model shared by the schema compiler and the document writer.
//!
//! This crate provides:
//! - Field descriptors with optional dictionary metadata
//! - Container nodes and child slots with occurrence cardinality
//! - Scalar and list values supplied by the filler
//! - The serialized canonical model document (`rootTag` + `model`)

pub mod document;
pub mod error;
pub mod tree;
pub mod value;

pub use document::CanonicalModel;
pub use error::{ModelError, Result};
pub use tree::{
    Cardinality, ChildSlot, ChoiceRef, ContainerNode, FieldDescriptor, FieldMetadata,
    NestedContent, Occurs, SlotContent,
};
pub use value::{FieldValue, Scalar};
