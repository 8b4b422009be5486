//! Document Module
//!
//! The caption document: timed segments with optional word-level ASR
//! timestamps, an append-only audit history, and per-segment speaker
//! embeddings.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       Document System                           │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  models.rs     - Data structures (Word, Segment, Document, ...) │
//! │  split.rs      - Word-boundary segment splitting                │
//! │  store.rs      - Pure document mutators and queries             │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every mutator takes `&self` and returns a fresh `Document`; the caller's
//! prior value is never aliased or modified.

mod models;
mod split;
mod store;

pub use models::{
    Document, HistoryAction, HistoryEntry, Segment, SegmentSpeakerEmbedding, TranscriptMetadata,
    Word,
};
pub use split::split_at_word;
pub use store::SegmentUpdate;
