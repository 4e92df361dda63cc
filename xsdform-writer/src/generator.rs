//! Document generator.
//!
//! Walks a filled [`ContainerNode`] and builds an [`XmlElement`] tree. Every
//! name and value is checked against XML 1.0 and the output code page as it
//! is visited, so errors name the tag or attribute path that caused them.

use crate::config::{ChoicePolicy, GeneratorConfig};
use crate::element::XmlElement;
use crate::encoding::ensure_writable;
use crate::error::GenerationError;
use std::collections::{BTreeMap, BTreeSet};
use xsdform_model::{
    CanonicalModel, Cardinality, ChildSlot, ContainerNode, FieldValue, NestedContent, SlotContent,
};

/// Builds XML element trees from filled containers.
#[derive(Debug, Clone, Default)]
pub struct DocumentGenerator {
    config: GeneratorConfig,
}

impl DocumentGenerator {
    /// Creates a generator with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a generator with the given configuration.
    #[must_use]
    pub fn with_config(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration in use.
    #[must_use]
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates the document element of a model.
    ///
    /// # Errors
    /// Returns `GenerationError` if the model cannot be written.
    pub fn generate_document(&self, model: &CanonicalModel) -> Result<XmlElement, GenerationError> {
        self.generate(&model.root_tag, &model.model)
    }

    /// Generates an element named `tag_name` from a filled container.
    ///
    /// # Errors
    /// Returns `GenerationError::UnencodableCharacter` for names or values
    /// outside the output code page, `IllegalCharacter` for characters XML
    /// does not allow, `ShapeMismatch` for values that do not
    /// fit their slot, and `ChoiceConflict` when an exclusive choice has more
    /// than one filled alternative.
    pub fn generate(
        &self,
        tag_name: &str,
        node: &ContainerNode,
    ) -> Result<XmlElement, GenerationError> {
        self.build(tag_name, node, tag_name)
    }

    fn build(
        &self,
        tag_name: &str,
        node: &ContainerNode,
        path: &str,
    ) -> Result<XmlElement, GenerationError> {
        ensure_writable(tag_name, path)?;
        let mut element = XmlElement::new(tag_name);

        for attribute in &node.attributes {
            let attr_path = format!("{path}/@{}", attribute.short_name);
            if let Some(value) = single_text(&attribute.value, &attr_path)? {
                ensure_writable(&attribute.short_name, &attr_path)?;
                ensure_writable(&value, &attr_path)?;
                element.set_attribute(attribute.short_name.as_str(), value);
            }
        }

        let skipped = self.unselected_alternatives(node, path)?;
        for (index, slot) in node.children.iter().enumerate() {
            if skipped.contains(&index) {
                continue;
            }
            self.append_slot(&mut element, slot, path)?;
        }

        Ok(element)
    }

    fn append_slot(
        &self,
        parent: &mut XmlElement,
        slot: &ChildSlot,
        parent_path: &str,
    ) -> Result<(), GenerationError> {
        let tag = slot.tag_name.as_str();
        match (slot.cardinality(), &slot.content) {
            (Cardinality::One, SlotContent::Nested(nested)) => {
                let path = format!("{parent_path}/{tag}");
                if !nested.items.is_empty() {
                    return Err(GenerationError::shape_mismatch(
                        path,
                        format!(
                            "single element holds {} repeated items",
                            nested.items.len()
                        ),
                    ));
                }
                parent.push_child(self.build(tag, &nested.template, &path)?);
            }
            (Cardinality::One, SlotContent::Leaf(leaf)) => {
                let path = format!("{parent_path}/{tag}");
                ensure_writable(tag, &path)?;
                let mut child = XmlElement::new(tag);
                if let Some(text) = single_text(&leaf.value, &path)? {
                    ensure_writable(&text, &path)?;
                    child.text = Some(text);
                }
                parent.push_child(child);
            }
            (Cardinality::Many, SlotContent::Nested(nested)) => {
                check_template_unfilled(nested, &format!("{parent_path}/{tag}"))?;
                for (i, item) in nested.items.iter().enumerate() {
                    let path = format!("{parent_path}/{tag}[{}]", i + 1);
                    parent.push_child(self.build(tag, item, &path)?);
                }
            }
            (Cardinality::Many, SlotContent::Leaf(leaf)) => {
                let values = match &leaf.value {
                    FieldValue::Single(scalar) if scalar.is_empty() => &[][..],
                    FieldValue::Single(_) => {
                        tracing::warn!(
                            "Repeated element {parent_path}/{tag} holds a single value, writing it once"
                        );
                        leaf.value.as_slice()
                    }
                    other => other.as_slice(),
                };
                for (i, scalar) in values.iter().enumerate() {
                    let path = format!("{parent_path}/{tag}[{}]", i + 1);
                    ensure_writable(tag, &path)?;
                    let mut child = XmlElement::new(tag);
                    if !scalar.is_empty() {
                        let text = scalar.to_string();
                        ensure_writable(&text, &path)?;
                        child.text = Some(text);
                    }
                    parent.push_child(child);
                }
            }
        }
        Ok(())
    }

    /// Returns the indices of choice slots that must not be emitted.
    fn unselected_alternatives(
        &self,
        node: &ContainerNode,
        path: &str,
    ) -> Result<BTreeSet<usize>, GenerationError> {
        let mut skipped = BTreeSet::new();
        if self.config.choices() == ChoicePolicy::Merge {
            return Ok(skipped);
        }

        // group -> option -> slot indices, in declaration order. A slot in a
        // nested choice is listed under every enclosing alternative, so an
        // unselected outer alternative drops the inner group with it.
        let mut groups: BTreeMap<usize, BTreeMap<usize, Vec<usize>>> = BTreeMap::new();
        for (index, slot) in node.children.iter().enumerate() {
            for choice in &slot.choice {
                groups
                    .entry(choice.group)
                    .or_default()
                    .entry(choice.option)
                    .or_default()
                    .push(index);
            }
        }

        for options in groups.values() {
            let filled: Vec<usize> = options
                .iter()
                .filter(|(_, slots)| slots.iter().any(|&i| node.children[i].has_data()))
                .map(|(&option, _)| option)
                .collect();

            if filled.len() > 1 {
                let alternatives = filled
                    .iter()
                    .flat_map(|option| &options[option])
                    .filter(|&&i| node.children[i].has_data())
                    .map(|&i| node.children[i].tag_name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                return Err(GenerationError::ChoiceConflict {
                    path: path.to_string(),
                    alternatives,
                });
            }

            let selected = match filled.first() {
                Some(&option) => option,
                None => match options.keys().next() {
                    Some(&first) => first,
                    None => continue,
                },
            };
            for (&option, slots) in options {
                if option != selected {
                    skipped.extend(slots.iter().copied());
                }
            }
        }

        Ok(skipped)
    }
}

/// Generates an element with the default configuration.
///
/// # Errors
/// Returns `GenerationError` if the container cannot be written.
pub fn generate(tag_name: &str, node: &ContainerNode) -> Result<XmlElement, GenerationError> {
    DocumentGenerator::new().generate(tag_name, node)
}

/// Text of a value that must hold at most one scalar.
fn single_text(value: &FieldValue, path: &str) -> Result<Option<String>, GenerationError> {
    match value {
        FieldValue::Empty => Ok(None),
        FieldValue::Single(scalar) if scalar.is_empty() => Ok(None),
        FieldValue::Single(scalar) => Ok(Some(scalar.to_string())),
        FieldValue::List(items) if items.is_empty() => Ok(None),
        FieldValue::List(items) => Err(GenerationError::shape_mismatch(
            path,
            format!("expected a single value, found a list of {}", items.len()),
        )),
    }
}

fn check_template_unfilled(nested: &NestedContent, path: &str) -> Result<(), GenerationError> {
    if nested.items.is_empty() && nested.template.has_data() {
        return Err(GenerationError::shape_mismatch(
            path,
            "repeated element was filled in its template instead of its items",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use xsdform_model::{ChoiceRef, FieldDescriptor, Occurs, Scalar};

    fn leaf(name: &str, occurs: Occurs) -> ChildSlot {
        ChildSlot::leaf(name, occurs, FieldDescriptor::new(name, None))
    }

    fn scenario() -> ContainerNode {
        let mut item = ContainerNode::new();
        item.attributes.push(FieldDescriptor::new("Code", None));
        item.children.push(leaf("Name", Occurs::Bounded(1)));

        let mut root = ContainerNode::new();
        root.attributes.push(FieldDescriptor::new("Id", None));
        root.children
            .push(ChildSlot::nested("Items", Occurs::Unbounded, item));
        root
    }

    fn fill_item(root: &mut ContainerNode, code: &str, name: &str) {
        let item = root
            .child_mut("Items")
            .unwrap()
            .nested_mut()
            .unwrap()
            .push_item();
        item.attribute_mut("Code").unwrap().set_value(code);
        item.child_mut("Name")
            .unwrap()
            .leaf_mut()
            .unwrap()
            .set_value(name);
    }

    #[test]
    fn test_scenario_output() {
        let mut root = scenario();
        root.attribute_mut("Id").unwrap().set_value("7");
        fill_item(&mut root, "A1", "x");
        fill_item(&mut root, "B2", "y");

        let xml = generate("Root", &root)
            .expect("Failed to generate")
            .to_xml_string()
            .expect("Failed to render");
        assert_eq!(
            xml,
            r#"<Root Id="7"><Items Code="A1"><Name>x</Name></Items><Items Code="B2"><Name>y</Name></Items></Root>"#
        );
    }

    #[test]
    fn test_empty_attribute_omitted_empty_leaf_emitted() {
        let mut root = ContainerNode::new();
        root.attributes.push(FieldDescriptor::new("Id", None));
        root.attributes.push(FieldDescriptor::new("Blank", None));
        root.attribute_mut("Blank").unwrap().set_value("");
        root.children.push(leaf("Name", Occurs::Bounded(1)));

        let element = generate("Root", &root).expect("Failed to generate");
        assert!(element.attributes.is_empty());
        assert_eq!(element.children.len(), 1);
        assert_eq!(element.children[0].name, "Name");
        assert_eq!(element.children[0].text, None);
        assert_eq!(
            element.to_xml_string().unwrap(),
            "<Root><Name/></Root>"
        );
    }

    #[test]
    fn test_many_leaf_fan_out() {
        let mut root = ContainerNode::new();
        root.children.push(leaf("Note", Occurs::Unbounded));
        root.child_mut("Note")
            .unwrap()
            .leaf_mut()
            .unwrap()
            .set_value(vec![Scalar::from("A"), Scalar::from("B"), Scalar::from("C")]);

        let element = generate("Root", &root).expect("Failed to generate");
        let texts: Vec<_> = element
            .children_named("Note")
            .map(|c| c.text.as_deref().unwrap_or_default())
            .collect();
        assert_eq!(texts, ["A", "B", "C"]);
    }

    #[test]
    fn test_many_leaf_empty_list_yields_nothing() {
        let mut root = ContainerNode::new();
        root.children.push(leaf("Note", Occurs::Unbounded));
        let element = generate("Root", &root).expect("Failed to generate");
        assert!(element.children.is_empty());

        root.child_mut("Note").unwrap().leaf_mut().unwrap().value = FieldValue::Empty;
        let element = generate("Root", &root).expect("Failed to generate");
        assert!(element.children.is_empty());
    }

    #[test]
    fn test_many_leaf_single_scalar_tolerated() {
        let mut root = ContainerNode::new();
        root.children.push(leaf("Note", Occurs::Bounded(5)));
        root.child_mut("Note")
            .unwrap()
            .leaf_mut()
            .unwrap()
            .set_value(42_i64);

        let element = generate("Root", &root).expect("Failed to generate");
        assert_eq!(element.children.len(), 1);
        assert_eq!(element.children[0].text.as_deref(), Some("42"));
    }

    #[test]
    fn test_many_complex_zero_items() {
        let root = scenario();
        let element = generate("Root", &root).expect("Failed to generate");
        assert!(element.children.is_empty());
    }

    #[test]
    fn test_one_complex_always_emitted() {
        let mut header = ContainerNode::new();
        header.children.push(leaf("Date", Occurs::Bounded(1)));
        let mut root = ContainerNode::new();
        root.children
            .push(ChildSlot::nested("Header", Occurs::Bounded(1), header));

        let xml = generate("Root", &root).unwrap().to_xml_string().unwrap();
        assert_eq!(xml, "<Root><Header><Date/></Header></Root>");
    }

    #[test]
    fn test_unencodable_value_names_path() {
        let mut root = scenario();
        fill_item(&mut root, "A1", "x");
        fill_item(&mut root, "B2", "名");

        let err = generate("Root", &root).unwrap_err();
        match err {
            GenerationError::UnencodableCharacter {
                path, character, ..
            } => {
                assert_eq!(path, "Root/Items[2]/Name");
                assert_eq!(character, '名');
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unencodable_attribute_names_path() {
        let mut root = scenario();
        fill_item(&mut root, "😀", "x");

        let err = generate("Root", &root).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::UnencodableCharacter { ref path, .. } if path == "Root/Items[1]/@Code"
        ));
    }

    #[test]
    fn test_control_character_names_path() {
        let mut root = scenario();
        fill_item(&mut root, "A1", "a\u{1}b");

        match generate("Root", &root).unwrap_err() {
            GenerationError::IllegalCharacter { path, character } => {
                assert_eq!(path, "Root/Items[1]/Name");
                assert_eq!(character, '\u{1}');
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_cyrillic_names_accepted() {
        let mut root = ContainerNode::new();
        root.attributes.push(FieldDescriptor::new("ИдФайл", None));
        root.attribute_mut("ИдФайл").unwrap().set_value("Ф-1");
        let element = generate("Файл", &root).expect("Failed to generate");
        assert_eq!(element.attribute("ИдФайл"), Some("Ф-1"));
    }

    #[test]
    fn test_list_in_single_leaf_is_shape_mismatch() {
        let mut root = ContainerNode::new();
        root.children.push(leaf("Name", Occurs::Bounded(1)));
        root.child_mut("Name")
            .unwrap()
            .leaf_mut()
            .unwrap()
            .set_value(vec![Scalar::from("a"), Scalar::from("b")]);

        let err = generate("Root", &root).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::ShapeMismatch { ref path, .. } if path == "Root/Name"
        ));
    }

    #[test]
    fn test_items_on_single_slot_is_shape_mismatch() {
        let mut root = ContainerNode::new();
        root.children.push(ChildSlot::nested(
            "Header",
            Occurs::Bounded(1),
            ContainerNode::new(),
        ));
        root.child_mut("Header")
            .unwrap()
            .nested_mut()
            .unwrap()
            .push_item();

        assert!(matches!(
            generate("Root", &root),
            Err(GenerationError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_filled_template_of_repeated_slot_is_shape_mismatch() {
        let mut root = scenario();
        root.child_mut("Items")
            .unwrap()
            .nested_mut()
            .unwrap()
            .template
            .attribute_mut("Code")
            .unwrap()
            .set_value("A1");

        assert!(matches!(
            generate("Root", &root),
            Err(GenerationError::ShapeMismatch { ref path, .. }) if path == "Root/Items"
        ));
    }

    fn choice_node() -> ContainerNode {
        let mut root = ContainerNode::new();
        root.children.push(leaf("Id", Occurs::Bounded(1)));
        root.children.push(
            leaf("Person", Occurs::Bounded(1)).in_choice(vec![ChoiceRef { group: 0, option: 0 }]),
        );
        root.children.push(
            leaf("OrgName", Occurs::Bounded(1)).in_choice(vec![ChoiceRef { group: 0, option: 1 }]),
        );
        root.children.push(
            leaf("OrgCode", Occurs::Bounded(1)).in_choice(vec![ChoiceRef { group: 0, option: 1 }]),
        );
        root
    }

    fn set_leaf(root: &mut ContainerNode, name: &str, value: &str) {
        root.child_mut(name)
            .unwrap()
            .leaf_mut()
            .unwrap()
            .set_value(value);
    }

    fn exclusive() -> DocumentGenerator {
        DocumentGenerator::with_config(
            GeneratorConfig::new().choice_policy(ChoicePolicy::Exclusive),
        )
    }

    #[test]
    fn test_merge_emits_all_alternatives() {
        let root = choice_node();
        let element = generate("Root", &root).expect("Failed to generate");
        let names: Vec<_> = element.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Id", "Person", "OrgName", "OrgCode"]);
    }

    #[test]
    fn test_exclusive_selects_filled_alternative() {
        let mut root = choice_node();
        set_leaf(&mut root, "OrgName", "ACME");

        let element = exclusive().generate("Root", &root).expect("Failed to generate");
        let names: Vec<_> = element.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Id", "OrgName", "OrgCode"]);
    }

    #[test]
    fn test_exclusive_defaults_to_first_alternative() {
        let root = choice_node();
        let element = exclusive().generate("Root", &root).expect("Failed to generate");
        let names: Vec<_> = element.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Id", "Person"]);
    }

    #[test]
    fn test_exclusive_conflict() {
        let mut root = choice_node();
        set_leaf(&mut root, "Person", "Ivanov");
        set_leaf(&mut root, "OrgCode", "77");

        match exclusive().generate("Root", &root) {
            Err(GenerationError::ChoiceConflict { path, alternatives }) => {
                assert_eq!(path, "Root");
                assert_eq!(alternatives, "Person, OrgCode");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    /// `Person | (OrgName, (Inn | Kpp))`
    fn nested_choice_node() -> ContainerNode {
        let person = ChoiceRef { group: 0, option: 0 };
        let org = ChoiceRef { group: 0, option: 1 };
        let mut root = ContainerNode::new();
        root.children
            .push(leaf("Person", Occurs::Bounded(1)).in_choice(vec![person]));
        root.children
            .push(leaf("OrgName", Occurs::Bounded(1)).in_choice(vec![org]));
        root.children.push(
            leaf("Inn", Occurs::Bounded(1)).in_choice(vec![org, ChoiceRef { group: 1, option: 0 }]),
        );
        root.children.push(
            leaf("Kpp", Occurs::Bounded(1)).in_choice(vec![org, ChoiceRef { group: 1, option: 1 }]),
        );
        root
    }

    #[test]
    fn test_exclusive_outer_alternative_drops_inner_choice() {
        let mut root = nested_choice_node();
        set_leaf(&mut root, "Person", "Ivanov");

        let xml = exclusive()
            .generate("Doc", &root)
            .expect("Failed to generate")
            .to_xml_string()
            .expect("Failed to render");
        assert_eq!(xml, "<Doc><Person>Ivanov</Person></Doc>");
    }

    #[test]
    fn test_exclusive_inner_choice_selected() {
        let mut root = nested_choice_node();
        set_leaf(&mut root, "OrgName", "ACME");
        set_leaf(&mut root, "Kpp", "7701");

        let xml = exclusive()
            .generate("Doc", &root)
            .expect("Failed to generate")
            .to_xml_string()
            .expect("Failed to render");
        assert_eq!(xml, "<Doc><OrgName>ACME</OrgName><Kpp>7701</Kpp></Doc>");
    }

    #[test]
    fn test_exclusive_conflict_across_nesting() {
        let mut root = nested_choice_node();
        set_leaf(&mut root, "Person", "Ivanov");
        set_leaf(&mut root, "Inn", "7700");

        match exclusive().generate("Doc", &root) {
            Err(GenerationError::ChoiceConflict { path, alternatives }) => {
                assert_eq!(path, "Doc");
                assert_eq!(alternatives, "Person, Inn");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_config_accessor() {
        assert_eq!(DocumentGenerator::new().config().choices(), ChoicePolicy::Merge);
        assert_eq!(exclusive().config().choices(), ChoicePolicy::Exclusive);
    }

    #[test]
    fn test_generate_document() {
        let mut root = scenario();
        root.attribute_mut("Id").unwrap().set_value(7_i64);
        let model = CanonicalModel::new("Root", root);

        let element = DocumentGenerator::new()
            .generate_document(&model)
            .expect("Failed to generate");
        assert_eq!(element.name, "Root");
        assert_eq!(element.attribute("Id"), Some("7"));
    }
}
