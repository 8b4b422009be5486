//! CaptionWorks Core Library
//!
//! Caption/subtitle editing engine. Maintains a collection of timed text
//! segments, preserves word-level ASR timestamps across user text edits,
//! supports splitting and merging segments, records an append-only audit
//! history, and drives ordered playlist playback.
//!
//! The engine is a pure library: file I/O, dialogs, ASR invocation, and the
//! actual media player live in the hosting application. Every document
//! mutator takes a value and returns a new value, so the host owns all state
//! and needs no locks.

pub mod core;

pub use crate::core::{
    document::{
        Document, HistoryAction, HistoryEntry, Segment, SegmentSpeakerEmbedding, SegmentUpdate,
        TranscriptMetadata, Word,
    },
    formats::{parse_captions_json, parse_vtt, serialize_captions_json, serialize_vtt, ParseError},
    playback::{MediaSurface, PlaybackSequencer, PlaybackState},
    CoreError, CoreResult,
};
