//! Serialization and file output.
//!
//! The element tree is written with quick-xml, then transcoded to the output
//! code page. Files are written to a temporary sibling and renamed into place,
//! so the destination never holds a partial document.

use crate::config::GeneratorConfig;
use crate::element::XmlElement;
use crate::encoding;
use crate::error::GenerationError;
use quick_xml::Writer;
use quick_xml::escape::escape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use std::borrow::Cow;
use std::io::Write;
use std::path::Path;

/// Serializes a document: XML declaration plus the element, encoded in the
/// output code page.
///
/// # Errors
/// Returns `GenerationError::IllegalCharacter` if the markup holds a
/// character XML 1.0 forbids, `GenerationError::UnencodableCharacter` if it
/// cannot be encoded, or a writer error.
pub fn render(element: &XmlElement, config: &GeneratorConfig) -> Result<Vec<u8>, GenerationError> {
    let mut writer = match config.indentation() {
        Some(spaces) => Writer::new_with_indent(Vec::new(), b' ', spaces),
        None => Writer::new(Vec::new()),
    };

    writer.write_event(Event::Decl(BytesDecl::new(
        "1.0",
        Some(encoding::label()),
        None,
    )))?;
    if config.indentation().is_none() {
        writer.get_mut().write_all(b"\n")?;
    }
    write_element(&mut writer, element)?;

    let xml = String::from_utf8(writer.into_inner())?;
    if let Some(character) = xml.chars().find(|&c| !encoding::is_xml_char(c)) {
        return Err(GenerationError::IllegalCharacter {
            path: element.name.clone(),
            character,
        });
    }
    encoding::encode(&xml).map_err(|character| GenerationError::UnencodableCharacter {
        path: element.name.clone(),
        character,
        encoding: encoding::label(),
    })
}

/// Renders an element as compact UTF-8 markup without a declaration.
pub(crate) fn render_fragment(element: &XmlElement) -> Result<String, GenerationError> {
    let mut writer = Writer::new(Vec::new());
    write_element(&mut writer, element)?;
    Ok(String::from_utf8(writer.into_inner())?)
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &XmlElement) -> Result<(), GenerationError> {
    let mut start = BytesStart::new(element.name.as_str());
    for (name, value) in &element.attributes {
        let escaped = escape_attribute(value);
        start.push_attribute(Attribute {
            key: QName(name.as_bytes()),
            value: Cow::Borrowed(escaped.as_bytes()),
        });
    }

    if element.text.is_none() && element.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    if let Some(text) = &element.text {
        writer.write_event(Event::Text(BytesText::new(text)))?;
    }
    for child in &element.children {
        write_element(writer, child)?;
    }
    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
    Ok(())
}

/// Escapes an attribute value, writing whitespace other than the space as
/// character references so parsers do not normalize it away.
fn escape_attribute(value: &str) -> Cow<'_, str> {
    let escaped = escape(value);
    if !escaped.contains(['\n', '\r', '\t']) {
        return escaped;
    }
    let mut out = String::with_capacity(escaped.len() + 8);
    for c in escaped.chars() {
        match c {
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' => out.push_str("&#9;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Serializes a document and writes it to `path` atomically.
///
/// Nothing is created at `path` unless the whole document was rendered and
/// written successfully.
///
/// # Errors
/// Returns `GenerationError` on encoding or IO failure.
pub fn write_file(
    element: &XmlElement,
    path: impl AsRef<Path>,
    config: &GeneratorConfig,
) -> Result<(), GenerationError> {
    let path = path.as_ref();
    let bytes = render(element, config)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(&bytes)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;

    tracing::info!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
