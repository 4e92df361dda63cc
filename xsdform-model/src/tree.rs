//! Canonical tree types.
//!
//! The compiler produces a [`ContainerNode`] for every complex-typed element.
//! Each container lists its attribute descriptors and its child slots in
//! declaration order. A slot's content is either a nested container or a
//! leaf descriptor, and its occurrence bound decides whether the filler
//! supplies one instance or a list of them.
//!
//! The shape is fixed once compiled. Filling only writes values and, for
//! repeated nested slots, appends items cloned from the slot template.

use crate::error::ModelError;
use crate::value::{FieldValue, Scalar};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Dictionary metadata attached to a field descriptor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMetadata {
    /// Human-readable field name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// Declared data type (e.g. `T`, `N`, `D`).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    /// Format string, e.g. `T(1-255)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Required-ness marker as written in the dictionary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Scalar>,
    /// Additional notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    /// Number of the dictionary table the field came from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_number: Option<Scalar>,
}

/// Whether a child slot admits exactly one instance or zero-to-many.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    /// Exactly one instance.
    One,
    /// Zero or more instances.
    Many,
}

/// Declared `maxOccurs` bound of a child element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawOccurs", into = "String")]
pub enum Occurs {
    /// Numeric bound.
    Bounded(u32),
    /// `unbounded`.
    Unbounded,
}

impl Occurs {
    /// Derives the slot cardinality from the bound.
    ///
    /// `unbounded` and any bound above one repeat; everything else is single.
    #[must_use]
    pub const fn cardinality(self) -> Cardinality {
        match self {
            Self::Unbounded => Cardinality::Many,
            Self::Bounded(n) if n > 1 => Cardinality::Many,
            Self::Bounded(_) => Cardinality::One,
        }
    }
}

impl Default for Occurs {
    fn default() -> Self {
        Self::Bounded(1)
    }
}

impl FromStr for Occurs {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "unbounded" {
            return Ok(Self::Unbounded);
        }
        s.parse::<u32>()
            .map(Self::Bounded)
            .map_err(|_| ModelError::invalid_occurs(s))
    }
}

impl fmt::Display for Occurs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bounded(n) => write!(f, "{n}"),
            Self::Unbounded => f.write_str("unbounded"),
        }
    }
}

impl From<Occurs> for String {
    fn from(occurs: Occurs) -> Self {
        occurs.to_string()
    }
}

/// Accepts both `"unbounded"`/`"3"` and a bare JSON number.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawOccurs {
    Number(u32),
    Text(String),
}

impl TryFrom<RawOccurs> for Occurs {
    type Error = ModelError;

    fn try_from(raw: RawOccurs) -> Result<Self, Self::Error> {
        match raw {
            RawOccurs::Number(n) => Ok(Self::Bounded(n)),
            RawOccurs::Text(s) => s.parse(),
        }
    }
}

/// A leaf placeholder: an attribute or a simple-content element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    /// Schema-declared element or attribute name.
    pub short_name: String,
    /// Dictionary enrichment, absent when the dictionary has no entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<FieldMetadata>,
    /// Filled value.
    #[serde(default)]
    pub value: FieldValue,
}

impl FieldDescriptor {
    /// Creates an unfilled descriptor.
    #[must_use]
    pub fn new(short_name: impl Into<String>, metadata: Option<FieldMetadata>) -> Self {
        Self {
            short_name: short_name.into(),
            metadata,
            value: FieldValue::Empty,
        }
    }

    /// Replaces the value.
    pub fn set_value(&mut self, value: impl Into<FieldValue>) {
        self.value = value.into();
    }

    /// Appends one entry to a list value.
    pub fn push_value(&mut self, scalar: impl Into<Scalar>) {
        self.value.push(scalar.into());
    }

    /// Returns true if a non-empty value was filled in.
    #[must_use]
    pub fn is_filled(&self) -> bool {
        !self.value.is_empty()
    }

    /// Returns the full name from the dictionary, if known.
    #[must_use]
    pub fn full_name(&self) -> Option<&str> {
        self.metadata.as_ref()?.full_name.as_deref()
    }
}

/// A complex-typed element: attributes plus ordered child slots.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContainerNode {
    /// Attribute descriptors, fixed at compile time.
    #[serde(default)]
    pub attributes: Vec<FieldDescriptor>,
    /// Child slots in declaration order.
    #[serde(default, rename = "elements")]
    pub children: Vec<ChildSlot>,
}

impl ContainerNode {
    /// Creates an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up an attribute descriptor by short name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&FieldDescriptor> {
        self.attributes.iter().find(|a| a.short_name == name)
    }

    /// Looks up an attribute descriptor by short name for filling.
    pub fn attribute_mut(&mut self, name: &str) -> Option<&mut FieldDescriptor> {
        self.attributes.iter_mut().find(|a| a.short_name == name)
    }

    /// Looks up a child slot by tag name.
    #[must_use]
    pub fn child(&self, tag_name: &str) -> Option<&ChildSlot> {
        self.children.iter().find(|c| c.tag_name == tag_name)
    }

    /// Looks up a child slot by tag name for filling.
    pub fn child_mut(&mut self, tag_name: &str) -> Option<&mut ChildSlot> {
        self.children.iter_mut().find(|c| c.tag_name == tag_name)
    }

    /// Returns true if any attribute or descendant carries a filled value.
    #[must_use]
    pub fn has_data(&self) -> bool {
        self.attributes.iter().any(FieldDescriptor::is_filled)
            || self.children.iter().any(ChildSlot::has_data)
    }

    /// Returns a copy of this container with every value cleared.
    #[must_use]
    pub fn blank(&self) -> Self {
        let mut copy = self.clone();
        copy.clear_values();
        copy
    }

    fn clear_values(&mut self) {
        for attr in &mut self.attributes {
            attr.value = FieldValue::Empty;
        }
        for child in &mut self.children {
            let cardinality = child.cardinality();
            match &mut child.content {
                SlotContent::Leaf(leaf) => {
                    leaf.value = match cardinality {
                        Cardinality::One => FieldValue::Empty,
                        Cardinality::Many => FieldValue::List(Vec::new()),
                    };
                }
                SlotContent::Nested(nested) => {
                    nested.template.clear_values();
                    nested.items.clear();
                }
            }
        }
    }
}

/// Position of a slot inside an `xs:choice` group.
///
/// Slots sharing `group` are alternatives of one choice; slots that also
/// share `option` belong to the same alternative (a nested sequence).
/// Group indices are unique within a container, also across nesting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChoiceRef {
    /// Choice group index within the parent container.
    pub group: usize,
    /// Alternative index within the group.
    pub option: usize,
}

/// A child element declaration inside a container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildSlot {
    /// Element name.
    pub tag_name: String,
    /// Declared occurrence bound.
    #[serde(default)]
    pub max_occurs: Occurs,
    /// Enclosing choice alternatives, outermost first. Empty outside any
    /// `xs:choice`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choice: Vec<ChoiceRef>,
    /// Nested container or leaf placeholder.
    #[serde(flatten)]
    pub content: SlotContent,
}

impl ChildSlot {
    /// Creates a slot for a nested complex element.
    #[must_use]
    pub fn nested(tag_name: impl Into<String>, max_occurs: Occurs, node: ContainerNode) -> Self {
        Self {
            tag_name: tag_name.into(),
            max_occurs,
            choice: Vec::new(),
            content: SlotContent::Nested(NestedContent::new(node)),
        }
    }

    /// Creates a slot for a simple-content element.
    ///
    /// Repeated leaves start with an empty list so the filler sees the shape.
    #[must_use]
    pub fn leaf(tag_name: impl Into<String>, max_occurs: Occurs, mut field: FieldDescriptor) -> Self {
        if max_occurs.cardinality() == Cardinality::Many && field.value == FieldValue::Empty {
            field.value = FieldValue::List(Vec::new());
        }
        Self {
            tag_name: tag_name.into(),
            max_occurs,
            choice: Vec::new(),
            content: SlotContent::Leaf(field),
        }
    }

    /// Sets the enclosing choice alternatives, outermost first.
    #[must_use]
    pub fn in_choice(mut self, choice: impl Into<Vec<ChoiceRef>>) -> Self {
        self.choice = choice.into();
        self
    }

    /// Returns the cardinality derived from `maxOccurs`.
    #[must_use]
    pub const fn cardinality(&self) -> Cardinality {
        self.max_occurs.cardinality()
    }

    /// Returns true if the slot carries any filled data.
    #[must_use]
    pub fn has_data(&self) -> bool {
        match &self.content {
            SlotContent::Leaf(leaf) => leaf.is_filled(),
            SlotContent::Nested(nested) => match self.cardinality() {
                Cardinality::One => nested.template.has_data(),
                Cardinality::Many => !nested.items.is_empty(),
            },
        }
    }

    /// Returns the leaf descriptor, if this is a simple-content slot.
    pub fn leaf_mut(&mut self) -> Option<&mut FieldDescriptor> {
        match &mut self.content {
            SlotContent::Leaf(leaf) => Some(leaf),
            SlotContent::Nested(_) => None,
        }
    }

    /// Returns the nested content, if this is a complex slot.
    pub fn nested_mut(&mut self) -> Option<&mut NestedContent> {
        match &mut self.content {
            SlotContent::Nested(nested) => Some(nested),
            SlotContent::Leaf(_) => None,
        }
    }
}

/// Content of a child slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SlotContent {
    /// Complex content.
    #[serde(rename = "model")]
    Nested(NestedContent),
    /// Simple content.
    #[serde(rename = "placeholder")]
    Leaf(FieldDescriptor),
}

/// Complex slot content.
///
/// For a single slot the template itself is filled. For a repeated slot the
/// filler appends `items`, each a copy of the template shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestedContent {
    /// Compiled shape of the nested element.
    #[serde(flatten)]
    pub template: ContainerNode,
    /// Filled instances of a repeated slot.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<ContainerNode>,
}

impl NestedContent {
    /// Wraps a compiled container with no items.
    #[must_use]
    pub fn new(template: ContainerNode) -> Self {
        Self {
            template,
            items: Vec::new(),
        }
    }

    /// Appends a blank instance of the template and returns it for filling.
    pub fn push_item(&mut self) -> &mut ContainerNode {
        let index = self.items.len();
        self.items.push(self.template.blank());
        &mut self.items[index]
    }
}
