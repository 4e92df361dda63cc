//! Owned XML element tree produced by the generator.

use crate::error::GenerationError;

/// An XML element with attributes, optional text and child elements.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlElement {
    /// Tag name.
    pub name: String,
    /// Attributes in insertion order.
    pub attributes: Vec<(String, String)>,
    /// Text content; `None` renders as an empty element.
    pub text: Option<String>,
    /// Child elements in document order.
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Creates an element with no attributes, text or children.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Sets an attribute, replacing an earlier value of the same name.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Appends a child element.
    pub fn push_child(&mut self, child: XmlElement) {
        self.children.push(child);
    }

    /// Returns an attribute value by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Iterates child elements with the given tag name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Renders the element as compact UTF-8 markup without a declaration.
    ///
    /// # Errors
    /// Returns `GenerationError` if the XML writer fails.
    pub fn to_xml_string(&self) -> Result<String, GenerationError> {
        crate::output::render_fragment(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_attribute_replaces() {
        let mut element = XmlElement::new("Root");
        element.set_attribute("Id", "1");
        element.set_attribute("Id", "2");
        assert_eq!(element.attributes.len(), 1);
        assert_eq!(element.attribute("Id"), Some("2"));
    }

    #[test]
    fn test_to_xml_string() {
        let mut root = XmlElement::new("Root");
        root.set_attribute("Id", "a\"b");
        root.push_child(XmlElement::new("Name").with_text("x < y"));
        root.push_child(XmlElement::new("Empty"));

        let xml = root.to_xml_string().expect("Failed to render");
        assert_eq!(
            xml,
            r#"<Root Id="a&quot;b"><Name>x &lt; y</Name><Empty/></Root>"#
        );
    }

    #[test]
    fn test_children_named() {
        let mut root = XmlElement::new("Root");
        root.push_child(XmlElement::new("A"));
        root.push_child(XmlElement::new("B"));
        root.push_child(XmlElement::new("A"));
        assert_eq!(root.children_named("A").count(), 2);
    }
}
