//! CaptionWorks Core Type Definitions
//!
//! Defines fundamental types used throughout the engine.

// =============================================================================
// ID Types
// =============================================================================

/// Segment unique identifier (UUID v4)
pub type SegmentId = String;

/// Document unique identifier (UUID v4)
pub type DocumentId = String;

/// History entry unique identifier (UUID v4)
pub type HistoryId = String;

// =============================================================================
// Time Types
// =============================================================================

/// Time in seconds (floating point)
pub type TimeSec = f64;
