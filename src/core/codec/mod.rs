//! Timestamp and Embedding Codec
//!
//! Parses and formats cue timestamps, and converts fixed-width numeric
//! vectors (speaker embeddings) to a portable text form.
//!
//! Timestamps render as `HH:MM:SS.mmm` with zero padding and exactly three
//! decimals; parsing additionally accepts the shorter `MM:SS.mmm` form and
//! bare seconds so hand-edited files still load.

use crate::core::{CoreResult, TimeSec};

// =============================================================================
// Timestamps
// =============================================================================

/// Formats seconds as a cue timestamp (`HH:MM:SS.mmm`).
pub fn format_timestamp(seconds: TimeSec) -> String {
    let total_ms = (seconds * 1000.0).round() as u64;
    let ms = total_ms % 1000;
    let total_secs = total_ms / 1000;
    let secs = total_secs % 60;
    let total_mins = total_secs / 60;
    let mins = total_mins % 60;
    let hours = total_mins / 60;

    format!("{:02}:{:02}:{:02}.{:03}", hours, mins, secs, ms)
}

/// Parses a cue timestamp into seconds.
///
/// Accepts `H:MM:SS.mmm`, `MM:SS.mmm`, or bare seconds. Returns `None` on
/// anything else; the caller decides whether that skips a cue or fails a
/// parse.
pub fn parse_timestamp(ts: &str) -> Option<TimeSec> {
    let ts = ts.trim();
    if ts.is_empty() {
        return None;
    }

    let parts: Vec<&str> = ts.split(':').collect();
    match parts.len() {
        // Bare seconds
        1 => parse_component(parts[0]),
        // MM:SS.mmm
        2 => {
            let minutes = parse_component(parts[0])?;
            let seconds = parse_component(parts[1])?;
            Some(minutes * 60.0 + seconds)
        }
        // H:MM:SS.mmm
        3 => {
            let hours = parse_component(parts[0])?;
            let minutes = parse_component(parts[1])?;
            let seconds = parse_component(parts[2])?;
            Some(hours * 3600.0 + minutes * 60.0 + seconds)
        }
        _ => None,
    }
}

/// Cue times are non-negative; a negative or non-finite component rejects
/// the whole timestamp.
fn parse_component(part: &str) -> Option<f64> {
    let value: f64 = part.parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

// =============================================================================
// Embedding Vectors
// =============================================================================

/// Encodes a fixed-width numeric vector as compact JSON text.
///
/// The encoding is the portable text form embedded in sentinel-annotated
/// caption files; values round-trip exactly through [`decode_vector`].
pub fn encode_vector(values: &[f32]) -> CoreResult<String> {
    Ok(serde_json::to_string(values)?)
}

/// Decodes a numeric vector from its portable text form.
pub fn decode_vector(text: &str) -> CoreResult<Vec<f32>> {
    Ok(serde_json::from_str(text)?)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Timestamp Formatting Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0.0), "00:00:00.000");
        assert_eq!(format_timestamp(1.5), "00:00:01.500");
        assert_eq!(format_timestamp(90.0), "00:01:30.000");
        assert_eq!(format_timestamp(5400.0), "01:30:00.000");
        assert_eq!(format_timestamp(0.1), "00:00:00.100");
    }

    #[test]
    fn test_format_timestamp_rounds_to_milliseconds() {
        assert_eq!(format_timestamp(1.0005), "00:00:01.001");
        assert_eq!(format_timestamp(1.0004), "00:00:01.000");
    }

    // -------------------------------------------------------------------------
    // Timestamp Parsing Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_parse_timestamp_full_form() {
        assert_eq!(parse_timestamp("00:00:01.500"), Some(1.5));
        assert_eq!(parse_timestamp("01:30:00.000"), Some(5400.0));
        // Single-digit hour is accepted
        assert_eq!(parse_timestamp("1:00:00.000"), Some(3600.0));
    }

    #[test]
    fn test_parse_timestamp_short_form() {
        assert_eq!(parse_timestamp("01:23.456"), Some(83.456));
        assert_eq!(parse_timestamp("00:05.000"), Some(5.0));
    }

    #[test]
    fn test_parse_timestamp_bare_seconds() {
        assert_eq!(parse_timestamp("12.5"), Some(12.5));
        assert_eq!(parse_timestamp("0"), Some(0.0));
    }

    #[test]
    fn test_parse_timestamp_invalid() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("abc"), None);
        assert_eq!(parse_timestamp("00:00:xx.000"), None);
        assert_eq!(parse_timestamp("1:2:3:4"), None);
    }

    #[test]
    fn test_parse_timestamp_rejects_negative_components() {
        assert_eq!(parse_timestamp("-5"), None);
        assert_eq!(parse_timestamp("1:-30.0"), None);
        assert_eq!(parse_timestamp("-1:00:00.000"), None);
        assert_eq!(parse_timestamp("inf"), None);
    }

    #[test]
    fn test_timestamp_roundtrip() {
        for &seconds in &[0.0, 0.25, 61.061, 3723.5] {
            let formatted = format_timestamp(seconds);
            let parsed = parse_timestamp(&formatted).unwrap();
            assert!((parsed - seconds).abs() < 1e-9, "{seconds} -> {formatted} -> {parsed}");
        }
    }

    // -------------------------------------------------------------------------
    // Vector Codec Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_vector_roundtrip() {
        let values = vec![0.125f32, -1.5, 0.0, 42.0];
        let text = encode_vector(&values).unwrap();
        let decoded = decode_vector(&text).unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn test_vector_encoding_is_compact_json() {
        let text = encode_vector(&[1.0, 2.5]).unwrap();
        assert_eq!(text, "[1.0,2.5]");
    }

    #[test]
    fn test_vector_decode_invalid() {
        assert!(decode_vector("not json").is_err());
        assert!(decode_vector("{\"a\":1}").is_err());
    }
}
