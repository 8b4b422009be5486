//! Format Codec
//!
//! Two round-trippable on-disk encodings of a [`Document`](crate::core::document::Document):
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        Format Codec                             │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  vtt.rs            - Sentinel-annotated WebVTT                  │
//! │  captions_json.rs  - Structured JSON                            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! External tooling reads both formats, so the exact byte layout (timestamp
//! padding, sentinel tag names, stable JSON key order) is part of the
//! contract. `parse(serialize(doc)) == doc` holds for both.

use std::path::Path;

use thiserror::Error;

mod captions_json;
mod vtt;

pub use captions_json::{parse_captions_json, serialize_captions_json};
pub use vtt::{parse_vtt, serialize_vtt, CAPTION_EDITOR_SENTINEL};

// =============================================================================
// Errors
// =============================================================================

/// Structured parse failure. Never panics across the parse boundary; one bad
/// cue in the WebVTT format is skipped rather than failing the file, so these
/// cover only unrecoverable structure problems.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Missing WEBVTT header on line 1")]
    MissingHeader,

    #[error("Invalid {kind} payload on line {line}: {message}")]
    InvalidPayload {
        kind: String,
        line: usize,
        message: String,
    },

    #[error("Invalid document structure: {0}")]
    InvalidStructure(String),

    #[error("Duplicate segment ids: {}", .0.join(", "))]
    DuplicateIds(Vec<String>),
}

// =============================================================================
// Media Path Export
// =============================================================================

/// Rewrites an absolute media path relative to the export target's directory.
///
/// Left unchanged when no target location is known yet, when the path is
/// already relative, or when no relative form exists.
pub(crate) fn media_path_for_export(media: &str, target: Option<&Path>) -> String {
    let target = match target {
        Some(target) => target,
        None => return media.to_string(),
    };
    let media_path = Path::new(media);
    if !media_path.is_absolute() {
        return media.to_string();
    }
    let dir = match target.parent() {
        Some(dir) => dir,
        None => return media.to_string(),
    };
    match crate::core::fs::relative_path(media_path, dir) {
        Some(relative) => relative.to_string_lossy().into_owned(),
        None => media.to_string(),
    }
}
