//! Schema compiler.
//!
//! Walks element declarations depth-first and builds the canonical tree.
//! Complex content (an inline `complexType`, a `type` naming a top-level
//! `complexType`, or the same reached through `ref`) becomes a nested
//! container; anything else becomes a leaf descriptor. Every attribute and
//! leaf is enriched from the dictionary by short name.

use crate::config::{AttributeScope, CompilerConfig};
use crate::dictionary::Dictionary;
use crate::error::SchemaError;
use crate::xsd::{XsdNode, XsdSchema, strip_prefix};
use std::collections::HashSet;
use xsdform_model::{CanonicalModel, ChildSlot, ChoiceRef, ContainerNode, FieldDescriptor, Occurs};

/// Complex content located for an element declaration.
struct ComplexRef<'a> {
    node: &'a XsdNode,
    /// Named type or referenced element the content came from, for cycle checks.
    origin: Option<String>,
}

/// Compiles XSD declarations into canonical containers.
pub struct SchemaCompiler<'a> {
    schema: &'a XsdSchema,
    dictionary: &'a Dictionary,
    config: CompilerConfig,
    expanding: Vec<String>,
}

impl<'a> SchemaCompiler<'a> {
    /// Creates a compiler with default settings.
    #[must_use]
    pub fn new(schema: &'a XsdSchema, dictionary: &'a Dictionary) -> Self {
        Self {
            schema,
            dictionary,
            config: CompilerConfig::default(),
            expanding: Vec::new(),
        }
    }

    /// Replaces the compiler settings.
    #[must_use]
    pub fn with_config(mut self, config: CompilerConfig) -> Self {
        self.config = config;
        self
    }

    /// Compiles the top-level element named `root_name`.
    ///
    /// # Errors
    /// Returns `SchemaError::RootNotFound` if no top-level declaration has that
    /// name, `SchemaError::RootNotComplex` if it has no complex type, or any
    /// error raised while compiling its content.
    pub fn compile_root(&mut self, root_name: &str) -> Result<CanonicalModel, SchemaError> {
        self.expanding.clear();

        let element = self
            .schema
            .element(root_name)
            .ok_or_else(|| SchemaError::root_not_found(root_name))?;
        let complex = self
            .complex_type_of(element, None)
            .ok_or_else(|| SchemaError::root_not_complex(root_name))?;

        let model = self.expand(complex, root_name)?;
        tracing::info!(
            "Compiled '{}': {} attributes, {} child slots",
            root_name,
            model.attributes.len(),
            model.children.len()
        );
        Ok(CanonicalModel::new(root_name, model))
    }

    /// Compiles one complex type node into a container.
    ///
    /// `path` names the element being compiled and prefixes error locations.
    ///
    /// # Errors
    /// Returns `SchemaError` for invalid occurrence bounds, unresolved element
    /// references or circular named types below this node.
    pub fn compile_container(
        &mut self,
        complex: &'a XsdNode,
        path: &str,
    ) -> Result<ContainerNode, SchemaError> {
        let mut node = ContainerNode::new();
        node.attributes = self.collect_attributes(complex, path);

        let mut groups = 0;
        if let Some(sequence) = complex
            .first_child("sequence")
            .or_else(|| complex.first_child("all"))
        {
            self.collect_group(sequence, &[], &mut groups, path, &mut node)?;
        }
        // Choice members follow sequence members, flagged with their group.
        if let Some(choice) = complex.first_child("choice") {
            self.collect_choice(choice, &[], &mut groups, path, &mut node)?;
        }

        Ok(node)
    }

    fn collect_attributes(&self, complex: &XsdNode, path: &str) -> Vec<FieldDescriptor> {
        let stop_at = match self.config.scope() {
            AttributeScope::Deep => None,
            AttributeScope::Local => Some("element"),
        };

        let mut seen = HashSet::new();
        let mut attributes = Vec::new();
        for decl in complex.descendants_named("attribute", stop_at) {
            let Some(name) = decl.decl_name().or_else(|| decl.attr("ref").map(strip_prefix)) else {
                tracing::debug!("Skipping unnamed attribute under '{}'", path);
                continue;
            };
            if !seen.insert(name) {
                tracing::debug!("Attribute '{}' already collected for '{}'", name, path);
                continue;
            }
            attributes.push(self.descriptor(name));
        }
        attributes
    }

    /// `chain` lists the choice alternatives enclosing `group`, outermost first.
    fn collect_group(
        &mut self,
        group: &'a XsdNode,
        chain: &[ChoiceRef],
        groups: &mut usize,
        path: &str,
        node: &mut ContainerNode,
    ) -> Result<(), SchemaError> {
        for particle in &group.children {
            match particle.name.as_str() {
                "element" => self.push_element(particle, chain, path, node)?,
                "sequence" | "all" => self.collect_group(particle, chain, groups, path, node)?,
                "choice" => self.collect_choice(particle, chain, groups, path, node)?,
                _ => {}
            }
        }
        Ok(())
    }

    fn collect_choice(
        &mut self,
        choice: &'a XsdNode,
        chain: &[ChoiceRef],
        groups: &mut usize,
        path: &str,
        node: &mut ContainerNode,
    ) -> Result<(), SchemaError> {
        let group = *groups;
        *groups += 1;

        let alternatives = choice
            .children
            .iter()
            .filter(|p| matches!(p.name.as_str(), "element" | "sequence" | "all" | "choice"));
        for (option, particle) in alternatives.enumerate() {
            let mut member = chain.to_vec();
            member.push(ChoiceRef { group, option });
            match particle.name.as_str() {
                "element" => self.push_element(particle, &member, path, node)?,
                "choice" => self.collect_choice(particle, &member, groups, path, node)?,
                _ => self.collect_group(particle, &member, groups, path, node)?,
            }
        }
        Ok(())
    }

    fn push_element(
        &mut self,
        particle: &'a XsdNode,
        chain: &[ChoiceRef],
        path: &str,
        node: &mut ContainerNode,
    ) -> Result<(), SchemaError> {
        let Some(slot) = self.compile_particle(particle, path)? else {
            return Ok(());
        };
        if node.child(&slot.tag_name).is_some() {
            tracing::warn!(
                "Element '{}' declared more than once under '{}'",
                slot.tag_name,
                path
            );
        }
        node.children.push(slot.in_choice(chain.to_vec()));
        Ok(())
    }

    /// Builds the slot for one `element` particle.
    fn compile_particle(
        &mut self,
        particle: &'a XsdNode,
        parent_path: &str,
    ) -> Result<Option<ChildSlot>, SchemaError> {
        let (decl, via_ref) = match particle.attr("ref") {
            Some(reference) => {
                let target = self.schema.element(reference).ok_or_else(|| {
                    SchemaError::UnresolvedReference {
                        name: reference.to_string(),
                        element: parent_path.to_string(),
                    }
                })?;
                (target, Some(strip_prefix(reference)))
            }
            None => (particle, None),
        };

        let Some(name) = decl.decl_name() else {
            tracing::debug!("Skipping unnamed element under '{}'", parent_path);
            return Ok(None);
        };
        let path = format!("{parent_path}/{name}");

        let max_occurs = match particle.attr("maxOccurs") {
            Some(raw) => raw
                .parse::<Occurs>()
                .map_err(|_| SchemaError::invalid_occurs(&path, raw))?,
            None => Occurs::default(),
        };

        let slot = match self.complex_type_of(decl, via_ref) {
            Some(complex) => ChildSlot::nested(name, max_occurs, self.expand(complex, &path)?),
            None => ChildSlot::leaf(name, max_occurs, self.descriptor(name)),
        };
        Ok(Some(slot))
    }

    /// Finds the complex content of an element declaration, if any.
    fn complex_type_of(&self, decl: &'a XsdNode, via_ref: Option<&str>) -> Option<ComplexRef<'a>> {
        if let Some(inline) = decl.first_child("complexType") {
            return Some(ComplexRef {
                node: inline,
                origin: via_ref.map(str::to_string),
            });
        }

        let type_name = decl.attr("type")?;
        match self.schema.complex_type(type_name) {
            Some(named) => {
                tracing::debug!("Resolved named complex type '{}'", type_name);
                Some(ComplexRef {
                    node: named,
                    origin: Some(strip_prefix(type_name).to_string()),
                })
            }
            None => None,
        }
    }

    /// Compiles complex content, guarding against self-referencing types.
    fn expand(&mut self, complex: ComplexRef<'a>, path: &str) -> Result<ContainerNode, SchemaError> {
        let Some(origin) = complex.origin else {
            return self.compile_container(complex.node, path);
        };

        if self.expanding.contains(&origin) {
            let mut chain = self.expanding.clone();
            chain.push(origin);
            return Err(SchemaError::CircularType {
                path: chain.join(" -> "),
            });
        }

        self.expanding.push(origin);
        let result = self.compile_container(complex.node, path);
        self.expanding.pop();
        result
    }

    fn descriptor(&self, short_name: &str) -> FieldDescriptor {
        FieldDescriptor::new(short_name, self.dictionary.lookup(short_name).cloned())
    }
}

/// Compiles the top-level element `root_name` with default settings.
///
/// # Errors
/// Returns `SchemaError` if the root is missing, not complex, or its content
/// cannot be compiled.
pub fn compile_root(
    schema: &XsdSchema,
    dictionary: &Dictionary,
    root_name: &str,
) -> Result<CanonicalModel, SchemaError> {
    SchemaCompiler::new(schema, dictionary).compile_root(root_name)
}
