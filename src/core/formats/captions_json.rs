//! Structured JSON codec.
//!
//! The whole document as one JSON object. Unlike the WebVTT codec this format
//! is strict: the shape is validated field-by-field before deserialization so
//! a bad file fails with a message naming what is wrong, not a serde trace.

use std::path::Path;

use serde_json::Value;

use crate::core::document::Document;
use crate::core::CoreResult;

use super::{media_path_for_export, ParseError};

// =============================================================================
// Parsing
// =============================================================================

/// Parses the structured JSON caption format.
///
/// Fails with [`ParseError::InvalidStructure`] when the top level is not an
/// object, `metadata.id` is missing or non-string, `segments` is not an
/// array, or any segment lacks a required field of the right type. Duplicate
/// segment ids fail with [`ParseError::DuplicateIds`] listing up to five.
pub fn parse_captions_json(content: &str) -> Result<Document, ParseError> {
    let value: Value = serde_json::from_str(content)
        .map_err(|e| ParseError::InvalidStructure(format!("not valid JSON: {e}")))?;

    let root = value
        .as_object()
        .ok_or_else(|| ParseError::InvalidStructure("top level must be an object".to_string()))?;

    let metadata = root
        .get("metadata")
        .and_then(Value::as_object)
        .ok_or_else(|| ParseError::InvalidStructure("metadata must be an object".to_string()))?;
    if !metadata.get("id").is_some_and(Value::is_string) {
        return Err(ParseError::InvalidStructure(
            "metadata.id must be a string".to_string(),
        ));
    }
    if let Some(media) = metadata.get("mediaFilePath") {
        if !media.is_string() {
            return Err(ParseError::InvalidStructure(
                "metadata.mediaFilePath must be a string".to_string(),
            ));
        }
    }

    let segments = root
        .get("segments")
        .and_then(Value::as_array)
        .ok_or_else(|| ParseError::InvalidStructure("segments must be an array".to_string()))?;

    let mut seen: Vec<&str> = Vec::with_capacity(segments.len());
    let mut duplicates: Vec<String> = Vec::new();
    for (index, segment) in segments.iter().enumerate() {
        let fields = segment.as_object().ok_or_else(|| {
            ParseError::InvalidStructure(format!("segment {index} must be an object"))
        })?;

        let id = fields.get("id").and_then(Value::as_str).ok_or_else(|| {
            ParseError::InvalidStructure(format!("segment {index}: id must be a string"))
        })?;
        for (key, what) in [("startTime", "a number"), ("endTime", "a number")] {
            if !fields.get(key).is_some_and(Value::is_number) {
                return Err(ParseError::InvalidStructure(format!(
                    "segment {index}: {key} must be {what}"
                )));
            }
        }
        if !fields.get("text").is_some_and(Value::is_string) {
            return Err(ParseError::InvalidStructure(format!(
                "segment {index}: text must be a string"
            )));
        }

        if seen.contains(&id) {
            if duplicates.len() < 5 && !duplicates.iter().any(|d| d == id) {
                duplicates.push(id.to_string());
            }
        } else {
            seen.push(id);
        }
    }
    if !duplicates.is_empty() {
        return Err(ParseError::DuplicateIds(duplicates));
    }

    let mut doc: Document = serde_json::from_value(value)
        .map_err(|e| ParseError::InvalidStructure(e.to_string()))?;
    doc.sort_segments();
    Ok(doc)
}

// =============================================================================
// Serialization
// =============================================================================

/// Serializes a document as pretty-printed JSON with a trailing newline.
///
/// Strips the runtime-only file path and omits absent optional fields; key
/// order follows the declared field order, so output is reproducible. Media
/// path relativization works as in [`serialize_vtt`](super::serialize_vtt).
pub fn serialize_captions_json(doc: &Document, target: Option<&Path>) -> CoreResult<String> {
    let target = target.or(doc.file_path.as_deref());

    let mut doc = doc.clone();
    doc.file_path = None;
    if let Some(media) = doc.metadata.media_file_path.as_deref() {
        doc.metadata.media_file_path = Some(media_path_for_export(media, target));
    }

    Ok(format!("{}\n", serde_json::to_string_pretty(&doc)?))
}

// =============================================================================
// Tests
// =============================================================================
