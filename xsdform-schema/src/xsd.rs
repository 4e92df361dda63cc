//! XSD document reader.
//!
//! Reads a schema into a plain element tree keyed by local names, so that
//! `xs:element`, `xsd:element` and `element` are all seen as `element`.
//! Namespaces are not resolved.

use crate::error::ParseError;
use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use std::path::Path;

/// One schema element with its attributes and child elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XsdNode {
    /// Local element name (`element`, `complexType`, `sequence`, ...).
    pub name: String,
    /// Attributes in document order, keys without prefix.
    pub attributes: Vec<(String, String)>,
    /// Child elements in document order.
    pub children: Vec<XsdNode>,
}

impl XsdNode {
    /// Creates a node with no attributes or children.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Reads the node name and attributes from a start tag.
    fn from_start(e: &BytesStart<'_>) -> Result<Self, ParseError> {
        let local = e.local_name();
        let mut node = Self::new(std::str::from_utf8(local.as_ref())?);

        for attr in e.attributes().flatten() {
            let key = std::str::from_utf8(attr.key.as_ref())?;
            if key == "xmlns" || key.starts_with("xmlns:") {
                continue;
            }
            let key_local = attr.key.local_name();
            let key = std::str::from_utf8(key_local.as_ref())?;
            let raw = std::str::from_utf8(&attr.value)?;
            let value = unescape(raw)?;
            node.attributes.push((key.to_string(), value.into_owned()));
        }

        Ok(node)
    }

    /// Returns an attribute value by local name.
    #[must_use]
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the `name` attribute.
    #[must_use]
    pub fn decl_name(&self) -> Option<&str> {
        self.attr("name")
    }

    /// Returns true if this node has the given local name.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    /// Iterates direct children with the given local name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XsdNode> + 'a {
        self.children.iter().filter(move |c| c.is(name))
    }

    /// Returns the first direct child with the given local name.
    #[must_use]
    pub fn first_child(&self, name: &str) -> Option<&XsdNode> {
        self.children.iter().find(|c| c.is(name))
    }

    /// Collects all descendants with the given local name, in document order.
    ///
    /// When `stop_at` is given, the walk does not enter nodes with that name.
    #[must_use]
    pub fn descendants_named<'a>(&'a self, name: &str, stop_at: Option<&str>) -> Vec<&'a XsdNode> {
        let mut found = Vec::new();
        collect_descendants(self, name, stop_at, &mut found);
        found
    }
}

fn collect_descendants<'a>(
    node: &'a XsdNode,
    name: &str,
    stop_at: Option<&str>,
    found: &mut Vec<&'a XsdNode>,
) {
    for child in &node.children {
        if child.is(name) {
            found.push(child);
        }
        if stop_at.is_some_and(|stop| child.is(stop)) {
            continue;
        }
        collect_descendants(child, name, stop_at, found);
    }
}

/// A parsed XSD document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XsdSchema {
    root: XsdNode,
}

impl XsdSchema {
    /// Wraps an already built `schema` node.
    ///
    /// # Errors
    /// Returns `ParseError::InvalidStructure` if the node is not `schema`.
    pub fn from_root(root: XsdNode) -> Result<Self, ParseError> {
        if !root.is("schema") {
            return Err(ParseError::invalid_structure(format!(
                "document element is '{}', expected 'schema'",
                root.name
            )));
        }
        Ok(Self { root })
    }

    /// Returns the `schema` node.
    #[must_use]
    pub fn root(&self) -> &XsdNode {
        &self.root
    }

    /// Iterates top-level element declarations.
    pub fn elements(&self) -> impl Iterator<Item = &XsdNode> {
        self.root.children_named("element")
    }

    /// Finds a top-level element declaration by name.
    #[must_use]
    pub fn element(&self, name: &str) -> Option<&XsdNode> {
        let name = strip_prefix(name);
        self.elements().find(|e| e.decl_name() == Some(name))
    }

    /// Finds a top-level named complex type.
    #[must_use]
    pub fn complex_type(&self, name: &str) -> Option<&XsdNode> {
        let name = strip_prefix(name);
        self.root
            .children_named("complexType")
            .find(|t| t.decl_name() == Some(name))
    }
}

/// Drops a namespace prefix from a QName reference (`tns:AType` → `AType`).
#[must_use]
pub fn strip_prefix(qname: &str) -> &str {
    qname.rsplit_once(':').map_or(qname, |(_, local)| local)
}

/// Parses an XSD document from a string.
///
/// # Errors
/// Returns `ParseError` if the XML is malformed or the document element is
/// not `schema`.
pub fn parse_xsd(xml: &str) -> Result<XsdSchema, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XsdNode> = Vec::new();
    let mut root: Option<XsdNode> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => stack.push(XsdNode::from_start(e)?),
            Ok(Event::Empty(ref e)) => {
                let node = XsdNode::from_start(e)?;
                attach(&mut stack, &mut root, node)?;
            }
            Ok(Event::End(_)) => {
                if let Some(node) = stack.pop() {
                    attach(&mut stack, &mut root, node)?;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(ParseError::invalid_structure(format!(
            "unexpected end of document inside '{}'",
            open.name
        )));
    }

    let root = root.ok_or_else(|| ParseError::invalid_structure("empty schema document"))?;
    XsdSchema::from_root(root)
}

/// Parses an XSD document from a file.
///
/// # Errors
/// Returns `ParseError` on read failure or malformed schema.
pub fn parse_xsd_file(path: impl AsRef<Path>) -> Result<XsdSchema, ParseError> {
    let xml = std::fs::read_to_string(path)?;
    parse_xsd(&xml)
}

fn attach(
    stack: &mut [XsdNode],
    root: &mut Option<XsdNode>,
    node: XsdNode,
) -> Result<(), ParseError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None if root.is_none() => *root = Some(node),
        None => {
            return Err(ParseError::invalid_structure(format!(
                "second document element '{}'",
                node.name
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE_XSD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
    <xs:element name="Root">
        <xs:annotation>
            <xs:documentation>Root &amp; friends</xs:documentation>
        </xs:annotation>
        <xs:complexType>
            <xs:sequence>
                <xs:element name="Name" type="xs:string"/>
            </xs:sequence>
            <xs:attribute name="Id" use="required"/>
        </xs:complexType>
    </xs:element>
    <xs:complexType name="AddressType">
        <xs:attribute name="Zip" default="a&lt;b"/>
    </xs:complexType>
</xs:schema>"#;

    #[test]
    fn test_parse_simple_xsd() {
        let schema = parse_xsd(SIMPLE_XSD).expect("Failed to parse schema");
        assert_eq!(schema.root().name, "schema");
        assert_eq!(schema.elements().count(), 1);

        let root = schema.element("Root").expect("Root missing");
        let complex = root.first_child("complexType").expect("complexType missing");
        assert_eq!(complex.children.len(), 2);
        assert_eq!(
            complex.first_child("attribute").and_then(XsdNode::decl_name),
            Some("Id")
        );
    }

    #[test]
    fn test_prefix_variants_share_local_names() {
        let xml = r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
            <xsd:element name="A"/>
        </xsd:schema>"#;
        let schema = parse_xsd(xml).expect("Failed to parse schema");
        assert!(schema.element("A").is_some());
    }

    #[test]
    fn test_attribute_values_unescaped() {
        let schema = parse_xsd(SIMPLE_XSD).expect("Failed to parse schema");
        let address = schema.complex_type("tns:AddressType").expect("type missing");
        let zip = address.first_child("attribute").expect("attribute missing");
        assert_eq!(zip.attr("default"), Some("a<b"));
    }

    #[test]
    fn test_non_schema_document_rejected() {
        let result = parse_xsd("<root/>");
        assert!(matches!(result, Err(ParseError::InvalidStructure { .. })));
    }

    #[test]
    fn test_mismatched_tags_rejected() {
        let result = parse_xsd("<xs:schema><xs:element></xs:schema>");
        assert!(result.is_err());
    }

    #[test]
    fn test_descendants_stop_at() {
        let schema = parse_xsd(SIMPLE_XSD).expect("Failed to parse schema");
        let root = schema.element("Root").expect("Root missing");
        assert_eq!(root.descendants_named("element", None).len(), 1);
        assert_eq!(root.descendants_named("attribute", Some("element")).len(), 1);
    }

    #[test]
    fn test_strip_prefix() {
        assert_eq!(strip_prefix("xs:string"), "string");
        assert_eq!(strip_prefix("Plain"), "Plain");
    }
}
