//! CaptionWorks Error Definitions
//!
//! Defines error types used throughout the engine.

use thiserror::Error;

use super::TimeSec;

/// Core engine error types
#[derive(Error, Debug)]
pub enum CoreError {
    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Invalid time range: {0}~{1} seconds")]
    InvalidTimeRange(TimeSec, TimeSec),

    // =========================================================================
    // General Errors
    // =========================================================================
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Core engine result type
pub type CoreResult<T> = Result<T, CoreError>;
