//! Word-boundary segment splitting.
//!
//! Splitting only happens on a timed word boundary so both halves keep a
//! meaningful time span. Untimed or wordless segments cannot be split.

use tracing::debug;

use super::models::{Segment, Word};

/// Splits a segment into two at the given word index.
///
/// The word at `word_index` starts the second half; its ASR start time
/// becomes the boundary. Both halves get fresh ids and timestamps, rebuild
/// their text from their word halves, and keep the original's speaker and
/// rating. Verification state and ASR model attribution do not carry over.
///
/// Returns `None` when the split is not possible:
/// - the segment has no words
/// - `word_index` is 0 or out of range (both halves must be non-empty)
/// - the word at `word_index` has no start time
/// - the boundary time falls outside the segment's open interval
pub fn split_at_word(segment: &Segment, word_index: usize) -> Option<(Segment, Segment)> {
    let words = match segment.words.as_deref() {
        Some(words) if !words.is_empty() => words,
        _ => {
            debug!(segment_id = %segment.id, "Cannot split segment without words");
            return None;
        }
    };

    if word_index == 0 || word_index >= words.len() {
        debug!(
            segment_id = %segment.id,
            word_index,
            word_count = words.len(),
            "Split index would produce an empty half"
        );
        return None;
    }

    let split_time = match words[word_index].start_time {
        Some(t) => t,
        None => {
            debug!(
                segment_id = %segment.id,
                word_index,
                "Split word has no start time"
            );
            return None;
        }
    };

    if split_time <= segment.start_time || split_time >= segment.end_time {
        debug!(
            segment_id = %segment.id,
            split_time,
            "Split time falls outside the segment span"
        );
        return None;
    }

    let (first_words, second_words) = words.split_at(word_index);
    let join = |ws: &[Word]| ws.iter().map(|w| w.text.as_str()).collect::<Vec<_>>().join(" ");

    let mut first = Segment::new(segment.start_time, split_time, &join(first_words))
        .with_words(first_words.to_vec());
    let mut second = Segment::new(split_time, segment.end_time, &join(second_words))
        .with_words(second_words.to_vec());

    first.speaker_name = segment.speaker_name.clone();
    second.speaker_name = segment.speaker_name.clone();
    first.rating = segment.rating;
    second.rating = segment.rating;

    Some((first, second))
}

// =============================================================================
// Tests
// =============================================================================
