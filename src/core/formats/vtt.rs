//! Sentinel-annotated WebVTT codec.
//!
//! The on-disk file is a plain WebVTT file that any subtitle tool can read,
//! with the structured document smuggled through `NOTE` comments:
//!
//! ```text
//! NOTE CAPTION_EDITOR:TranscriptMetadata {"id":"..."}
//!
//! NOTE CAPTION_EDITOR:TranscriptSegment {"id":"...","startTime":1.0,...}
//!
//! <cue identifier>
//! 00:00:01.000 --> 00:00:02.500
//! Hello world
//! ```
//!
//! The sentinel annotation preceding a cue is authoritative: it carries exact
//! floating-point times and the unmodified text, where the cue lines only
//! hold a millisecond-rounded, display-oriented rendering. Cue lines alone
//! are enough to import a file written by other tooling.

use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::core::codec;
use crate::core::document::{
    Document, HistoryEntry, Segment, SegmentSpeakerEmbedding, TranscriptMetadata,
};
use crate::core::CoreResult;

use super::{media_path_for_export, ParseError};

/// Tag marking a `NOTE` line as engine-owned structured data.
pub const CAPTION_EDITOR_SENTINEL: &str = "CAPTION_EDITOR";

// =============================================================================
// Parsing
// =============================================================================

/// Parses a sentinel-annotated (or plain) WebVTT document.
///
/// Requires the `WEBVTT` header on line 1. Plain cues with unparseable
/// timing or `end <= start` are skipped with a warning rather than failing
/// the file; an annotated cue stands or falls on its annotation's exact
/// times, never on the rounded cue line. A malformed payload on a recognized
/// sentinel tag is a hard error.
pub fn parse_vtt(content: &str) -> Result<Document, ParseError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let lines: Vec<&str> = content.lines().collect();

    let has_header = lines
        .first()
        .map(|line| line.trim())
        .is_some_and(|line| line.starts_with("WEBVTT"));
    if !has_header {
        return Err(ParseError::MissingHeader);
    }

    let mut metadata: Option<TranscriptMetadata> = None;
    let mut segments: Vec<Segment> = Vec::new();
    let mut history: Vec<HistoryEntry> = Vec::new();
    let mut embeddings: Vec<SegmentSpeakerEmbedding> = Vec::new();

    // Sentinel segment annotation waiting for its cue block.
    let mut pending: Option<Segment> = None;

    let mut i = 1;
    while i < lines.len() {
        let line = lines[i].trim();
        if line.is_empty() {
            i += 1;
            continue;
        }

        if line == "NOTE" || line.starts_with("NOTE ") {
            if let Some((tag, payload)) = sentinel_parts(&line[4..]) {
                match tag {
                    "TranscriptMetadata" => {
                        let parsed = decode_payload(tag, payload, i + 1)?;
                        if metadata.is_none() {
                            metadata = Some(parsed);
                        } else {
                            debug!(line = i + 1, "Ignoring repeated document metadata block");
                        }
                    }
                    // VTTCue is the legacy name for the same payload shape.
                    "TranscriptSegment" | "VTTCue" => {
                        pending = Some(decode_payload(tag, payload, i + 1)?);
                    }
                    "SegmentHistoryEntry" => history.push(decode_payload(tag, payload, i + 1)?),
                    "SegmentSpeakerEmbedding" => {
                        embeddings.push(decode_payload(tag, payload, i + 1)?);
                    }
                    other => debug!(tag = other, line = i + 1, "Ignoring unknown sentinel tag"),
                }
                i += 1;
            } else {
                // Plain comment block: skip through to the next blank line.
                i += 1;
                while i < lines.len() && !lines[i].trim().is_empty() {
                    i += 1;
                }
            }
            continue;
        }

        // Cue block: optional identifier line, then the timing line.
        let (ident, timing_index) = if line.contains("-->") {
            (None, i)
        } else if lines.get(i + 1).is_some_and(|next| next.contains("-->")) {
            (Some(line), i + 1)
        } else {
            debug!(line = i + 1, "Skipping stray line outside any cue");
            i += 1;
            continue;
        };

        let mut timing = lines[timing_index].splitn(2, "-->");
        let start = timing.next().and_then(codec::parse_timestamp);
        let end = timing.next().and_then(codec::parse_timestamp);

        // Cue text runs to the next blank line.
        let mut text_end = timing_index + 1;
        while text_end < lines.len() && !lines[text_end].trim().is_empty() {
            text_end += 1;
        }

        // The annotation carries the exact times; the cue lines are only a
        // millisecond-rounded display rendering and cannot veto it. A
        // sub-millisecond segment rounds to an equal-looking cue line, so the
        // end > start check applies to the annotated times, not the cue line.
        if let Some(segment) = pending.take() {
            if segment.end_time > segment.start_time {
                segments.push(segment);
            } else {
                warn!(
                    line = timing_index + 1,
                    start = segment.start_time,
                    end = segment.end_time,
                    "Skipping annotated segment with inverted timing"
                );
            }
        } else {
            match (start, end) {
                (Some(start), Some(end)) if end > start => {
                    let text = lines[timing_index + 1..text_end].join("\n");
                    let mut segment = Segment::new(start, end, &text);
                    match ident {
                        Some(ident) if is_uuid_shape(ident) => segment.id = ident.to_string(),
                        _ => {}
                    }
                    segments.push(segment);
                }
                (Some(start), Some(end)) => {
                    warn!(line = timing_index + 1, start, end, "Skipping cue with inverted timing");
                }
                _ => {
                    warn!(line = timing_index + 1, "Skipping cue with unparseable timing");
                }
            }
        }
        i = text_end;
    }

    let mut doc = Document {
        metadata: metadata.unwrap_or_default(),
        title: None,
        segments,
        file_path: None,
        history: (!history.is_empty()).then_some(history),
        embeddings: (!embeddings.is_empty()).then_some(embeddings),
    };
    doc.sort_segments();
    Ok(doc)
}

/// Splits the body of a `NOTE` line into sentinel tag and JSON payload.
fn sentinel_parts(note_body: &str) -> Option<(&str, &str)> {
    let tagged = note_body
        .trim_start()
        .strip_prefix(CAPTION_EDITOR_SENTINEL)?
        .strip_prefix(':')?;
    let split = tagged.find(char::is_whitespace)?;
    let (tag, payload) = tagged.split_at(split);
    Some((tag, payload.trim()))
}

fn decode_payload<T: DeserializeOwned>(kind: &str, payload: &str, line: usize) -> Result<T, ParseError> {
    serde_json::from_str(payload).map_err(|e| ParseError::InvalidPayload {
        kind: kind.to_string(),
        line,
        message: e.to_string(),
    })
}

/// Canonical 8-4-4-4-12 lowercase-or-uppercase hex UUID shape.
fn is_uuid_shape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 36
        && bytes.iter().enumerate().all(|(i, &b)| match i {
            8 | 13 | 18 | 23 => b == b'-',
            _ => b.is_ascii_hexdigit(),
        })
}

// =============================================================================
// Serialization
// =============================================================================

/// Serializes a document to sentinel-annotated WebVTT.
///
/// When an export location is known (the `target` argument, falling back to
/// the document's own `file_path`), an absolute `mediaFilePath` is rewritten
/// relative to it so the file stays portable alongside its media.
pub fn serialize_vtt(doc: &Document, target: Option<&Path>) -> CoreResult<String> {
    let target = target.or(doc.file_path.as_deref());

    let mut metadata = doc.metadata.clone();
    if let Some(media) = metadata.media_file_path.as_deref() {
        metadata.media_file_path = Some(media_path_for_export(media, target));
    }

    let mut lines: Vec<String> = vec!["WEBVTT\n".to_string()];
    lines.push(format!(
        "NOTE {CAPTION_EDITOR_SENTINEL}:TranscriptMetadata {}\n",
        serde_json::to_string(&metadata)?
    ));

    for segment in &doc.segments {
        lines.push(format!(
            "\nNOTE {CAPTION_EDITOR_SENTINEL}:TranscriptSegment {}\n",
            serde_json::to_string(segment)?
        ));
        lines.push(segment.id.clone());
        lines.push(format!(
            "{} --> {}",
            codec::format_timestamp(segment.start_time),
            codec::format_timestamp(segment.end_time)
        ));
        lines.push(format!("{}\n", segment.text));
    }

    for entry in doc.history.iter().flatten() {
        lines.push(format!(
            "\nNOTE {CAPTION_EDITOR_SENTINEL}:SegmentHistoryEntry {}",
            serde_json::to_string(entry)?
        ));
    }
    for embedding in doc.embeddings.iter().flatten() {
        lines.push(format!(
            "\nNOTE {CAPTION_EDITOR_SENTINEL}:SegmentSpeakerEmbedding {}",
            serde_json::to_string(embedding)?
        ));
    }

    Ok(lines.join("\n"))
}

// =============================================================================
// Tests
// =============================================================================
