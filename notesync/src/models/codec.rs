//! Wire encoding of note documents
//!
//! Remote files hold the note as pretty-printed JSON (2-space indent, so
//! diffs stay readable), transported as base64 of the UTF-8 bytes.

use super::{Note, NoteMetadata};
use crate::error::{AppError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;
use serde_json::Value;

/// Remote view of a note: everything but local bookkeeping
#[derive(Serialize)]
struct Document<'a> {
    metadata: &'a NoteMetadata,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a Value>,
}

/// Serialize a note into the base64 body sent to the remote store
pub fn encode_note(note: &Note) -> Result<String> {
    let document = Document {
        metadata: &note.metadata,
        content: &note.content,
        data: note.data.as_ref(),
    };
    let json = serde_json::to_string_pretty(&document)?;
    Ok(STANDARD.encode(json.as_bytes()))
}

/// Reverse of [`encode_note`].
///
/// Hosts wrap base64 content at 60 columns, so whitespace is stripped
/// before decoding.
pub fn decode_note(encoded: &str) -> Result<Note> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD.decode(compact)?;
    let text = String::from_utf8(bytes)
        .map_err(|e| AppError::Generic(format!("Note document is not UTF-8: {}", e)))?;
    let note = serde_json::from_str(&text)?;
    Ok(note)
}
