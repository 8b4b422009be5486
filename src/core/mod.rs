//! CaptionWorks Core Engine
//!
//! Core editing engine module.
//! Handles the document store, word realignment, on-disk formats, and
//! playlist playback.

pub mod align;
pub mod codec;
pub mod document;
pub mod formats;
pub mod fs;
pub mod playback;

// Re-export common types
mod types;
pub use types::*;

mod error;
pub use error::*;
