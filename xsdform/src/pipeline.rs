//! One-call pipelines for both stages.

use crate::error::Result;
use std::path::Path;
use xsdform_model::CanonicalModel;
use xsdform_schema::{
    CompilerConfig, Dictionary, SchemaCompiler, SchemaError, XsdSchema, parse_xsd, parse_xsd_file,
};
use xsdform_writer::{DocumentGenerator, GeneratorConfig, render, write_file};

/// Compiles `root` from XSD text, enriched from a JSON dictionary.
///
/// # Errors
/// Returns an error if the schema or dictionary is malformed, or the root
/// cannot be compiled.
pub fn compile_schema_str(
    xsd: &str,
    dictionary_json: &str,
    root: &str,
    config: CompilerConfig,
) -> Result<CanonicalModel> {
    let schema = parse_xsd(xsd).map_err(SchemaError::from)?;
    let dictionary = Dictionary::from_json_str(dictionary_json, config.collisions())?;
    compile(&schema, &dictionary, root, config)
}

/// Compiles `root` from an XSD file, enriched from a JSON dictionary file.
///
/// # Errors
/// Returns an error if either file cannot be read or parsed, or the root
/// cannot be compiled.
pub fn compile_schema_file(
    xsd_path: impl AsRef<Path>,
    dictionary_path: impl AsRef<Path>,
    root: &str,
    config: CompilerConfig,
) -> Result<CanonicalModel> {
    let schema = parse_xsd_file(xsd_path).map_err(SchemaError::from)?;
    let dictionary = Dictionary::from_path(dictionary_path, config.collisions())?;
    compile(&schema, &dictionary, root, config)
}

fn compile(
    schema: &XsdSchema,
    dictionary: &Dictionary,
    root: &str,
    config: CompilerConfig,
) -> Result<CanonicalModel> {
    let model = SchemaCompiler::new(schema, dictionary)
        .with_config(config)
        .compile_root(root)?;
    Ok(model)
}

/// Generates a filled model and serializes it to windows-1251 bytes.
///
/// # Errors
/// Returns an error if the model does not fit its shape or holds characters
/// outside the output encoding.
pub fn render_document(model: &CanonicalModel, config: &GeneratorConfig) -> Result<Vec<u8>> {
    let element = DocumentGenerator::with_config(*config).generate_document(model)?;
    let bytes = render(&element, config)?;
    tracing::info!("Rendered '{}' document, {} bytes", model.root_tag, bytes.len());
    Ok(bytes)
}

/// Generates a filled model and writes it to `path`.
///
/// The destination is only replaced once the whole document was produced.
///
/// # Errors
/// Returns an error if generation or the write fails.
pub fn write_document(
    model: &CanonicalModel,
    path: impl AsRef<Path>,
    config: &GeneratorConfig,
) -> Result<()> {
    let element = DocumentGenerator::with_config(*config).generate_document(model)?;
    write_file(&element, path, config)?;
    Ok(())
}
