//! Output code page.
//!
//! Documents are written in windows-1251. Characters outside it are errors,
//! never replaced.

use crate::error::GenerationError;
use encoding_rs::{Encoding, EncoderResult, WINDOWS_1251};

/// Returns the encoding every document is written in.
#[must_use]
pub fn output_encoding() -> &'static Encoding {
    WINDOWS_1251
}

/// Returns the label written into the XML declaration.
#[must_use]
pub fn label() -> &'static str {
    output_encoding().name()
}

/// Encodes text, returning the first unmappable character on failure.
///
/// # Errors
/// Returns the first character that has no mapping in the code page.
pub fn encode(text: &str) -> Result<Vec<u8>, char> {
    let mut encoder = output_encoding().new_encoder();
    let mut out = Vec::with_capacity(text.len());
    let mut buf = [0u8; 4096];
    let mut src = text;

    loop {
        let (result, read, written) =
            encoder.encode_from_utf8_without_replacement(src, &mut buf, true);
        out.extend_from_slice(&buf[..written]);
        src = &src[read..];
        match result {
            EncoderResult::InputEmpty => return Ok(out),
            EncoderResult::OutputFull => {}
            EncoderResult::Unmappable(c) => return Err(c),
        }
    }
}

/// Checks that a name or value can be written, naming `path` on failure.
///
/// # Errors
/// Returns `GenerationError::IllegalCharacter` for the first character XML
/// 1.0 does not allow, or `GenerationError::UnencodableCharacter` for the
/// first character the code page cannot represent.
pub fn ensure_writable(text: &str, path: &str) -> Result<(), GenerationError> {
    if let Some(character) = text.chars().find(|&c| !is_xml_char(c)) {
        return Err(GenerationError::IllegalCharacter {
            path: path.to_string(),
            character,
        });
    }
    match text.chars().find(|&c| !is_encodable(c)) {
        Some(character) => Err(GenerationError::UnencodableCharacter {
            path: path.to_string(),
            character,
            encoding: label(),
        }),
        None => Ok(()),
    }
}

/// `Char` production of XML 1.0.
#[must_use]
pub fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

fn is_encodable(c: char) -> bool {
    if c.is_ascii() {
        return true;
    }
    let mut utf8 = [0u8; 4];
    encode(c.encode_utf8(&mut utf8)).is_ok()
}
