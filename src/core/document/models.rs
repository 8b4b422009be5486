//! Document Data Models
//!
//! Defines the entity shapes shared by the editor, the on-disk formats, and
//! external tooling. Wire names are camelCase and optional fields are omitted
//! entirely when absent, so both codecs round-trip byte-compatibly with the
//! files other tools produce.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::{DocumentId, HistoryId, SegmentId, TimeSec};

// =============================================================================
// Word
// =============================================================================

/// A single word with optional ASR timing.
///
/// Timestamps are absent for user-typed words that were never anchored by an
/// ASR pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    /// Word text as displayed
    pub text: String,
    /// Start time in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<TimeSec>,
    /// End time in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<TimeSec>,
}

impl Word {
    /// Creates a word without timing information.
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            start_time: None,
            end_time: None,
        }
    }

    /// Creates a word with ASR timing.
    pub fn timed(text: &str, start_time: TimeSec, end_time: TimeSec) -> Self {
        Self {
            text: text.to_string(),
            start_time: Some(start_time),
            end_time: Some(end_time),
        }
    }
}

// =============================================================================
// Segment
// =============================================================================

/// A timed caption segment (cue).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    /// Unique identifier (UUID v4)
    pub id: SegmentId,
    /// Start time in seconds
    pub start_time: TimeSec,
    /// End time in seconds (invariant: end_time > start_time)
    pub end_time: TimeSec,
    /// Caption text (may contain line breaks)
    pub text: String,
    /// Word-level ASR timestamps, in text order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub words: Option<Vec<Word>>,
    /// Speaker name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker_name: Option<String>,
    /// Quality rating (1-5)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    /// ISO 8601 timestamp of last modification
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Whether a human has verified this segment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    /// ASR model that produced the words
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asr_model: Option<String>,
}

impl Segment {
    /// Creates a new segment with a generated id and a fresh timestamp.
    pub fn new(start_time: TimeSec, end_time: TimeSec, text: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            start_time,
            end_time,
            text: text.to_string(),
            words: None,
            speaker_name: None,
            rating: None,
            timestamp: Some(chrono::Utc::now().to_rfc3339()),
            verified: None,
            asr_model: None,
        }
    }

    /// Sets the speaker name.
    pub fn with_speaker(mut self, speaker_name: &str) -> Self {
        self.speaker_name = Some(speaker_name.to_string());
        self
    }

    /// Sets the word-level timestamps.
    pub fn with_words(mut self, words: Vec<Word>) -> Self {
        self.words = Some(words);
        self
    }

    /// Sets the quality rating.
    pub fn with_rating(mut self, rating: u8) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Returns the duration of this segment in seconds.
    pub fn duration(&self) -> TimeSec {
        self.end_time - self.start_time
    }

    /// Returns true if the segment covers the given time.
    pub fn contains_time(&self, time_sec: TimeSec) -> bool {
        time_sec >= self.start_time && time_sec < self.end_time
    }
}

// =============================================================================
// Document Metadata
// =============================================================================

/// Document-level metadata persisted with both on-disk formats.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptMetadata {
    /// Unique document identifier (UUID v4)
    pub id: DocumentId,
    /// Path to the media file; relative to the captions file when persisted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_file_path: Option<String>,
}

impl TranscriptMetadata {
    /// Creates metadata with a generated document id.
    pub fn new() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            media_file_path: None,
        }
    }
}

impl Default for TranscriptMetadata {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// History
// =============================================================================

/// Kind of change recorded in the audit history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryAction {
    #[serde(rename = "modified")]
    Modified,
    #[serde(rename = "deleted")]
    Deleted,
    #[serde(rename = "renameSpeaker")]
    SpeakerRenamed,
}

/// Audit record of a segment modification, deletion, or speaker rename.
///
/// `segment` is the pre-change snapshot; its own `timestamp` field keeps the
/// segment's original modification time, not the time of the history event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Unique identifier for this history entry (UUID v4)
    pub id: HistoryId,
    /// What happened to the segment
    pub action: HistoryAction,
    /// ISO 8601 timestamp of when the action occurred
    pub action_timestamp: String,
    /// The segment's state before the change
    pub segment: Segment,
}

impl HistoryEntry {
    /// Creates a history entry for a pre-change segment snapshot.
    pub fn new(action: HistoryAction, segment: Segment) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            action,
            action_timestamp: chrono::Utc::now().to_rfc3339(),
            segment,
        }
    }
}

// =============================================================================
// Speaker Embeddings
// =============================================================================

/// Per-segment speaker embedding vector.
///
/// Computed by an external tool; the engine only stores and round-trips it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentSpeakerEmbedding {
    /// Id of the segment this embedding was computed from
    pub segment_id: SegmentId,
    /// Fixed-width embedding vector
    pub speaker_embedding: Vec<f32>,
}

// =============================================================================
// Document
// =============================================================================

/// A caption document: metadata plus time-ordered segments.
///
/// Invariants maintained by every mutator:
/// - segments sorted ascending by (start_time, end_time)
/// - segment ids unique within the document
/// - history is append-only, one entry per affected original segment
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Document-level metadata
    pub metadata: TranscriptMetadata,
    /// Display title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Time-ordered segments
    pub segments: Vec<Segment>,
    /// Where this document was loaded from. Runtime-only, never persisted.
    #[serde(skip)]
    pub file_path: Option<PathBuf>,
    /// Append-only audit history
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<HistoryEntry>>,
    /// Per-segment speaker embeddings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embeddings: Option<Vec<SegmentSpeakerEmbedding>>,
}

impl Document {
    /// Creates an empty document with a fresh id.
    pub fn new() -> Self {
        Self {
            metadata: TranscriptMetadata::new(),
            title: None,
            segments: Vec::new(),
            file_path: None,
            history: None,
            embeddings: None,
        }
    }

    /// Attaches the on-disk location this document was loaded from and
    /// resolves a relative `mediaFilePath` against that location's directory.
    ///
    /// Parsers never attach paths themselves; the hosting application calls
    /// this after a successful load.
    pub fn with_file_path(mut self, file_path: &Path) -> Self {
        if let (Some(media), Some(dir)) = (self.metadata.media_file_path.as_deref(), file_path.parent())
        {
            self.metadata.media_file_path = Some(crate::core::fs::resolve_media_path(media, dir));
        }
        self.file_path = Some(file_path.to_path_buf());
        self
    }

    /// Appends an entry to the audit history.
    pub(crate) fn push_history(&mut self, entry: HistoryEntry) {
        self.history.get_or_insert_with(Vec::new).push(entry);
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
