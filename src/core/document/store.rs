//! Document Store
//!
//! Pure mutators and queries over a [`Document`]. Every mutator takes `&self`
//! and returns a fresh value; the input document is never modified. Unknown
//! ids and unmet preconditions are silent no-ops, while bad time ranges on
//! update are hard validation errors the caller must surface.

use tracing::{debug, warn};

use crate::core::align::realign_words;
use crate::core::{CoreError, CoreResult, SegmentId, TimeSec};

use super::models::{Document, HistoryAction, HistoryEntry, Segment};
use super::split::split_at_word;

// =============================================================================
// Segment Update
// =============================================================================

/// Partial update applied to a single segment.
///
/// Absent fields leave the segment's current value untouched.
#[derive(Clone, Debug, Default)]
pub struct SegmentUpdate {
    pub start_time: Option<TimeSec>,
    pub end_time: Option<TimeSec>,
    pub text: Option<String>,
    pub speaker_name: Option<String>,
    pub rating: Option<u8>,
    pub verified: Option<bool>,
}

impl SegmentUpdate {
    pub fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            ..Self::default()
        }
    }

    pub fn times(start_time: TimeSec, end_time: TimeSec) -> Self {
        Self {
            start_time: Some(start_time),
            end_time: Some(end_time),
            ..Self::default()
        }
    }
}

// =============================================================================
// Store Operations
// =============================================================================

impl Document {
    /// Adds a segment, keeping the collection sorted.
    ///
    /// A segment whose id already exists is rejected and the document is
    /// returned unchanged.
    pub fn add_segment(&self, segment: Segment) -> Document {
        let mut doc = self.clone();
        if doc.segments.iter().any(|s| s.id == segment.id) {
            warn!(segment_id = %segment.id, "Ignoring add of duplicate segment id");
            return doc;
        }
        doc.segments.push(segment);
        doc.sort_segments();
        doc
    }

    /// Applies a partial update to the segment with the given id.
    ///
    /// Unknown ids are a no-op. Time changes are validated against each other
    /// and against the segment's existing bounds; a violation returns
    /// [`CoreError::InvalidTimeRange`] and the document is not modified. When
    /// the text changes on a segment that carries words, the words are
    /// realigned onto the new text; an empty alignment clears them.
    pub fn update_segment(&self, id: &str, update: SegmentUpdate) -> CoreResult<Document> {
        let mut doc = self.clone();
        let index = match doc.segments.iter().position(|s| s.id == id) {
            Some(index) => index,
            None => {
                debug!(segment_id = %id, "Update targets unknown segment id");
                return Ok(doc);
            }
        };

        {
            let segment = &doc.segments[index];
            match (update.start_time, update.end_time) {
                (Some(start), Some(end)) if end <= start => {
                    return Err(CoreError::InvalidTimeRange(start, end));
                }
                (Some(start), None) if start >= segment.end_time => {
                    return Err(CoreError::InvalidTimeRange(start, segment.end_time));
                }
                (None, Some(end)) if end <= segment.start_time => {
                    return Err(CoreError::InvalidTimeRange(segment.start_time, end));
                }
                _ => {}
            }
        }

        let snapshot = doc.segments[index].clone();
        doc.push_history(HistoryEntry::new(HistoryAction::Modified, snapshot));

        let segment = &mut doc.segments[index];
        if let Some(start) = update.start_time {
            segment.start_time = start;
        }
        if let Some(end) = update.end_time {
            segment.end_time = end;
        }
        if let Some(text) = update.text {
            if text != segment.text {
                if let Some(words) = segment.words.take().filter(|w| !w.is_empty()) {
                    let realigned = realign_words(&words, &text);
                    segment.words = (!realigned.is_empty()).then_some(realigned);
                }
            }
            segment.text = text;
        }
        if let Some(speaker_name) = update.speaker_name {
            segment.speaker_name = Some(speaker_name);
        }
        if let Some(rating) = update.rating {
            segment.rating = Some(rating);
        }
        if let Some(verified) = update.verified {
            segment.verified = Some(verified);
        }
        segment.timestamp = Some(chrono::Utc::now().to_rfc3339());

        doc.sort_segments();
        Ok(doc)
    }

    /// Removes the segment with the given id, recording a Deleted history
    /// entry. Unknown ids are a no-op.
    pub fn delete_segment(&self, id: &str) -> Document {
        let mut doc = self.clone();
        let index = match doc.segments.iter().position(|s| s.id == id) {
            Some(index) => index,
            None => {
                debug!(segment_id = %id, "Delete targets unknown segment id");
                return doc;
            }
        };

        let removed = doc.segments.remove(index);
        doc.push_history(HistoryEntry::new(HistoryAction::Deleted, removed));
        doc
    }

    /// Rewrites every segment whose speaker matches `old_name`.
    ///
    /// Pre-change snapshots are recorded for all matches before any segment is
    /// rewritten, so the history reflects one consistent before-state.
    pub fn rename_speaker(&self, old_name: &str, new_name: &str) -> Document {
        let mut doc = self.clone();
        let matches: Vec<usize> = doc
            .segments
            .iter()
            .enumerate()
            .filter(|(_, s)| s.speaker_name.as_deref() == Some(old_name))
            .map(|(i, _)| i)
            .collect();

        if matches.is_empty() {
            return doc;
        }

        for &index in &matches {
            let snapshot = doc.segments[index].clone();
            doc.push_history(HistoryEntry::new(HistoryAction::SpeakerRenamed, snapshot));
        }

        let now = chrono::Utc::now().to_rfc3339();
        for &index in &matches {
            let segment = &mut doc.segments[index];
            segment.speaker_name = Some(new_name.to_string());
            segment.timestamp = Some(now.clone());
        }
        doc
    }

    /// Splits the segment with the given id at a word boundary.
    ///
    /// Delegates the boundary math to [`split_at_word`]; any precondition
    /// failure there leaves the document unchanged.
    pub fn split_segment(&self, id: &str, word_index: usize) -> Document {
        let mut doc = self.clone();
        let index = match doc.segments.iter().position(|s| s.id == id) {
            Some(index) => index,
            None => {
                debug!(segment_id = %id, "Split targets unknown segment id");
                return doc;
            }
        };

        let (first, second) = match split_at_word(&doc.segments[index], word_index) {
            Some(halves) => halves,
            None => return doc,
        };

        let original = doc.segments.remove(index);
        doc.push_history(HistoryEntry::new(HistoryAction::Modified, original));
        doc.segments.push(first);
        doc.segments.push(second);
        doc.sort_segments();
        doc
    }

    /// Merges segments that are contiguous in the document's sorted order
    /// into a single segment spanning them all.
    ///
    /// The given id order is irrelevant; ordinals in the current sorted order
    /// decide everything. Fewer than two ids, an unknown id, or a
    /// non-contiguous run all leave the document unchanged.
    pub fn merge_adjacent_segments(&self, ids: &[SegmentId]) -> Document {
        let mut doc = self.clone();
        if ids.len() < 2 {
            debug!(count = ids.len(), "Merge requires at least two segments");
            return doc;
        }

        let mut ordinals = Vec::with_capacity(ids.len());
        for id in ids {
            match doc.segments.iter().position(|s| &s.id == id) {
                Some(ordinal) => ordinals.push(ordinal),
                None => {
                    warn!(segment_id = %id, "Merge references unknown segment id");
                    return doc;
                }
            }
        }
        ordinals.sort_unstable();

        if ordinals.windows(2).any(|pair| pair[1] != pair[0] + 1) {
            debug!(?ordinals, "Merge segments are not contiguous in document order");
            return doc;
        }

        let first = ordinals[0];
        let last = ordinals[ordinals.len() - 1];
        let originals: Vec<Segment> = doc.segments.drain(first..=last).collect();

        let words: Vec<_> = originals
            .iter()
            .filter_map(|s| s.words.as_ref())
            .flatten()
            .cloned()
            .collect();
        let text = originals
            .iter()
            .map(|s| s.text.as_str())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let speaker = originals
            .iter()
            .find_map(|s| s.speaker_name.as_deref().filter(|name| !name.is_empty()));
        let rating = originals.iter().filter_map(|s| s.rating).max();

        let mut merged = Segment::new(
            originals[0].start_time,
            originals[originals.len() - 1].end_time,
            &text,
        );
        merged.words = (!words.is_empty()).then_some(words);
        merged.speaker_name = speaker.map(str::to_string);
        merged.rating = rating;

        for original in originals {
            doc.push_history(HistoryEntry::new(HistoryAction::Modified, original));
        }
        doc.segments.push(merged);
        doc.sort_segments();
        doc
    }

    /// Returns the segment covering the given time, earliest in sorted order
    /// when several overlap.
    pub fn segment_at_time(&self, time_sec: TimeSec) -> Option<&Segment> {
        self.segments.iter().find(|s| s.contains_time(time_sec))
    }

    pub(crate) fn sort_segments(&mut self) {
        self.segments.sort_by(|a, b| {
            a.start_time
                .total_cmp(&b.start_time)
                .then(a.end_time.total_cmp(&b.end_time))
        });
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::document::Word;

    fn doc_with(segments: Vec<Segment>) -> Document {
        let mut doc = Document::new();
        for segment in segments {
            doc = doc.add_segment(segment);
        }
        doc
    }

    fn history_len(doc: &Document) -> usize {
        doc.history.as_ref().map_or(0, Vec::len)
    }

    fn assert_sorted(doc: &Document) {
        for pair in doc.segments.windows(2) {
            assert!(
                pair[0].start_time < pair[1].start_time
                    || (pair[0].start_time == pair[1].start_time
                        && pair[0].end_time <= pair[1].end_time),
                "segments out of order"
            );
        }
    }

    // -------------------------------------------------------------------------
    // Add
    // -------------------------------------------------------------------------

    #[test]
    fn test_add_keeps_segments_sorted() {
        let doc = doc_with(vec![
            Segment::new(5.0, 8.0, "late"),
            Segment::new(0.0, 2.0, "early"),
            Segment::new(2.0, 3.0, "middle"),
        ]);
        assert_eq!(doc.segments.len(), 3);
        assert_eq!(doc.segments[0].text, "early");
        assert_eq!(doc.segments[2].text, "late");
        assert_sorted(&doc);
    }

    #[test]
    fn test_add_rejects_duplicate_id() {
        let segment = Segment::new(0.0, 1.0, "one");
        let doc = doc_with(vec![segment.clone()]);
        let doc = doc.add_segment(segment);
        assert_eq!(doc.segments.len(), 1);
    }

    #[test]
    fn test_add_does_not_mutate_input() {
        let original = Document::new();
        let updated = original.add_segment(Segment::new(0.0, 1.0, "x"));
        assert!(original.segments.is_empty());
        assert_eq!(updated.segments.len(), 1);
    }

    // -------------------------------------------------------------------------
    // Update
    // -------------------------------------------------------------------------

    #[test]
    fn test_update_unknown_id_is_noop() {
        let doc = doc_with(vec![Segment::new(0.0, 1.0, "x")]);
        let updated = doc.update_segment("missing", SegmentUpdate::text("y")).unwrap();
        assert_eq!(updated.segments[0].text, "x");
        assert_eq!(history_len(&updated), 0);
    }

    #[test]
    fn test_update_text_and_fields() {
        let segment = Segment::new(0.0, 2.0, "old text");
        let id = segment.id.clone();
        let doc = doc_with(vec![segment]);

        let update = SegmentUpdate {
            text: Some("new text".to_string()),
            speaker_name: Some("Alice".to_string()),
            rating: Some(5),
            verified: Some(true),
            ..SegmentUpdate::default()
        };
        let updated = doc.update_segment(&id, update).unwrap();

        let segment = &updated.segments[0];
        assert_eq!(segment.text, "new text");
        assert_eq!(segment.speaker_name.as_deref(), Some("Alice"));
        assert_eq!(segment.rating, Some(5));
        assert_eq!(segment.verified, Some(true));
        assert_eq!(history_len(&updated), 1);
        assert_eq!(updated.history.as_ref().unwrap()[0].segment.text, "old text");
    }

    #[test]
    fn test_update_invalid_combined_range_fails() {
        let segment = Segment::new(0.0, 2.0, "x");
        let id = segment.id.clone();
        let doc = doc_with(vec![segment]);

        match doc.update_segment(&id, SegmentUpdate::times(3.0, 1.0)) {
            Err(CoreError::InvalidTimeRange(start, end)) => {
                assert_eq!(start, 3.0);
                assert_eq!(end, 1.0);
            }
            other => panic!("expected InvalidTimeRange, got {other:?}"),
        }
    }

    #[test]
    fn test_update_start_must_stay_below_existing_end() {
        let segment = Segment::new(0.0, 2.0, "x");
        let id = segment.id.clone();
        let doc = doc_with(vec![segment]);

        let update = SegmentUpdate {
            start_time: Some(2.0),
            ..SegmentUpdate::default()
        };
        assert!(doc.update_segment(&id, update).is_err());
        // Failure leaves the document untouched.
        assert_eq!(doc.segments[0].start_time, 0.0);
        assert_eq!(history_len(&doc), 0);
    }

    #[test]
    fn test_update_end_must_stay_above_existing_start() {
        let segment = Segment::new(1.0, 2.0, "x");
        let id = segment.id.clone();
        let doc = doc_with(vec![segment]);

        let update = SegmentUpdate {
            end_time: Some(1.0),
            ..SegmentUpdate::default()
        };
        assert!(doc.update_segment(&id, update).is_err());
    }

    #[test]
    fn test_update_text_realigns_words() {
        let segment = Segment::new(0.0, 2.0, "Hello world").with_words(vec![
            Word::timed("Hello", 0.0, 0.5),
            Word::timed("world", 0.6, 1.0),
        ]);
        let id = segment.id.clone();
        let doc = doc_with(vec![segment]);

        let updated = doc
            .update_segment(&id, SegmentUpdate::text("Hello beautiful world"))
            .unwrap();
        let words = updated.segments[0].words.as_ref().unwrap();
        assert_eq!(words.len(), 3);
        assert_eq!(words[0].start_time, Some(0.0));
        assert_eq!(words[1].start_time, None);
        assert_eq!(words[2].end_time, Some(1.0));
    }

    #[test]
    fn test_update_blank_text_clears_words() {
        let segment =
            Segment::new(0.0, 2.0, "Hello").with_words(vec![Word::timed("Hello", 0.0, 0.5)]);
        let id = segment.id.clone();
        let doc = doc_with(vec![segment]);

        let updated = doc.update_segment(&id, SegmentUpdate::text("")).unwrap();
        assert_eq!(updated.segments[0].words, None);
    }

    #[test]
    fn test_update_resorts_after_time_change() {
        let a = Segment::new(0.0, 1.0, "a");
        let b = Segment::new(2.0, 3.0, "b");
        let a_id = a.id.clone();
        let doc = doc_with(vec![a, b]);

        let updated = doc.update_segment(&a_id, SegmentUpdate::times(4.0, 5.0)).unwrap();
        assert_eq!(updated.segments[0].text, "b");
        assert_eq!(updated.segments[1].text, "a");
        assert_sorted(&updated);
    }

    // -------------------------------------------------------------------------
    // Delete
    // -------------------------------------------------------------------------

    #[test]
    fn test_delete_records_history() {
        let segment = Segment::new(0.0, 1.0, "doomed");
        let id = segment.id.clone();
        let doc = doc_with(vec![segment]);

        let updated = doc.delete_segment(&id);
        assert!(updated.segments.is_empty());
        let history = updated.history.as_ref().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].action, HistoryAction::Deleted);
        assert_eq!(history[0].segment.text, "doomed");
    }

    #[test]
    fn test_delete_unknown_id_is_noop() {
        let doc = doc_with(vec![Segment::new(0.0, 1.0, "x")]);
        let updated = doc.delete_segment("missing");
        assert_eq!(updated.segments.len(), 1);
        assert_eq!(history_len(&updated), 0);
    }

    // -------------------------------------------------------------------------
    // Rename Speaker
    // -------------------------------------------------------------------------

    #[test]
    fn test_rename_speaker_rewrites_all_matches() {
        let doc = doc_with(vec![
            Segment::new(0.0, 1.0, "a").with_speaker("Bob"),
            Segment::new(1.0, 2.0, "b").with_speaker("Alice"),
            Segment::new(2.0, 3.0, "c").with_speaker("Bob"),
        ]);

        let updated = doc.rename_speaker("Bob", "Robert");
        let speakers: Vec<_> = updated
            .segments
            .iter()
            .map(|s| s.speaker_name.as_deref().unwrap())
            .collect();
        assert_eq!(speakers, vec!["Robert", "Alice", "Robert"]);

        let history = updated.history.as_ref().unwrap();
        assert_eq!(history.len(), 2);
        assert!(history.iter().all(|e| e.action == HistoryAction::SpeakerRenamed));
        assert!(history.iter().all(|e| e.segment.speaker_name.as_deref() == Some("Bob")));
    }

    #[test]
    fn test_rename_speaker_no_matches_is_noop() {
        let doc = doc_with(vec![Segment::new(0.0, 1.0, "a").with_speaker("Alice")]);
        let updated = doc.rename_speaker("Bob", "Robert");
        assert_eq!(history_len(&updated), 0);
    }

    // -------------------------------------------------------------------------
    // Split
    // -------------------------------------------------------------------------

    #[test]
    fn test_split_segment_replaces_original() {
        let segment = Segment::new(0.0, 2.0, "hello world").with_words(vec![
            Word::timed("hello", 0.0, 0.8),
            Word::timed("world", 1.0, 1.8),
        ]);
        let id = segment.id.clone();
        let doc = doc_with(vec![segment]);

        let updated = doc.split_segment(&id, 1);
        assert_eq!(updated.segments.len(), 2);
        assert!(updated.segments.iter().all(|s| s.id != id));
        assert_eq!(updated.segments[0].end_time, 1.0);
        assert_eq!(updated.segments[1].start_time, 1.0);
        assert_sorted(&updated);

        let history = updated.history.as_ref().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].segment.id, id);
    }

    #[test]
    fn test_split_precondition_failure_is_noop() {
        let segment = Segment::new(0.0, 2.0, "no words");
        let id = segment.id.clone();
        let doc = doc_with(vec![segment]);

        let updated = doc.split_segment(&id, 1);
        assert_eq!(updated.segments.len(), 1);
        assert_eq!(history_len(&updated), 0);
    }

    // -------------------------------------------------------------------------
    // Merge
    // -------------------------------------------------------------------------

    fn mergeable_doc() -> (Document, Vec<SegmentId>) {
        let a = Segment::new(0.0, 1.0, "one")
            .with_rating(2)
            .with_words(vec![Word::timed("one", 0.0, 0.9)]);
        let b = Segment::new(1.0, 2.0, "two")
            .with_speaker("Alice")
            .with_rating(4);
        let c = Segment::new(2.0, 3.0, "three").with_words(vec![Word::timed("three", 2.0, 2.9)]);
        let ids = vec![a.id.clone(), b.id.clone(), c.id.clone()];
        (doc_with(vec![a, b, c]), ids)
    }

    #[test]
    fn test_merge_combines_contiguous_segments() {
        let (doc, ids) = mergeable_doc();
        let merged = doc.merge_adjacent_segments(&ids);

        assert_eq!(merged.segments.len(), 1);
        let segment = &merged.segments[0];
        assert_eq!(segment.start_time, 0.0);
        assert_eq!(segment.end_time, 3.0);
        assert_eq!(segment.text, "one two three");
        assert_eq!(segment.speaker_name.as_deref(), Some("Alice"));
        assert_eq!(segment.rating, Some(4));
        assert_eq!(segment.words.as_ref().unwrap().len(), 2);
        assert!(!ids.contains(&segment.id));
        assert_eq!(segment.verified, None);

        let history = merged.history.as_ref().unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].segment.text, "one");
        assert_eq!(history[2].segment.text, "three");
    }

    #[test]
    fn test_merge_is_invariant_to_id_order() {
        let (doc, ids) = mergeable_doc();
        let shuffled = vec![ids[2].clone(), ids[0].clone(), ids[1].clone()];
        let merged = doc.merge_adjacent_segments(&shuffled);
        assert_eq!(merged.segments.len(), 1);
        assert_eq!(merged.segments[0].text, "one two three");
    }

    #[test]
    fn test_merge_rejects_non_contiguous() {
        let (doc, ids) = mergeable_doc();
        let gapped = vec![ids[0].clone(), ids[2].clone()];
        let merged = doc.merge_adjacent_segments(&gapped);
        assert_eq!(merged.segments.len(), 3);
        assert_eq!(history_len(&merged), 0);
    }

    #[test]
    fn test_merge_rejects_unknown_and_short_lists() {
        let (doc, ids) = mergeable_doc();
        assert_eq!(doc.merge_adjacent_segments(&[]).segments.len(), 3);
        assert_eq!(doc.merge_adjacent_segments(&[ids[0].clone()]).segments.len(), 3);

        let with_unknown = vec![ids[0].clone(), "missing".to_string()];
        assert_eq!(doc.merge_adjacent_segments(&with_unknown).segments.len(), 3);
    }

    #[test]
    fn test_merge_skips_empty_texts_in_join() {
        let a = Segment::new(0.0, 1.0, "one");
        let b = Segment::new(1.0, 2.0, "");
        let c = Segment::new(2.0, 3.0, "three");
        let ids = vec![a.id.clone(), b.id.clone(), c.id.clone()];
        let merged = doc_with(vec![a, b, c]).merge_adjacent_segments(&ids);
        assert_eq!(merged.segments[0].text, "one three");
    }

    #[test]
    fn test_merge_without_ratings_or_words() {
        let a = Segment::new(0.0, 1.0, "a");
        let b = Segment::new(1.0, 2.0, "b");
        let ids = vec![a.id.clone(), b.id.clone()];
        let merged = doc_with(vec![a, b]).merge_adjacent_segments(&ids);

        let segment = &merged.segments[0];
        assert_eq!(segment.rating, None);
        assert_eq!(segment.words, None);
        assert_eq!(segment.speaker_name, None);
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    #[test]
    fn test_segment_at_time() {
        let doc = doc_with(vec![
            Segment::new(0.0, 2.0, "first"),
            Segment::new(5.0, 8.0, "second"),
        ]);

        assert_eq!(doc.segment_at_time(1.0).unwrap().text, "first");
        assert!(doc.segment_at_time(3.0).is_none());
        assert_eq!(doc.segment_at_time(5.0).unwrap().text, "second");
        assert!(doc.segment_at_time(8.0).is_none());
    }

    #[test]
    fn test_segment_at_time_prefers_earliest_overlap() {
        let doc = doc_with(vec![
            Segment::new(0.0, 10.0, "outer"),
            Segment::new(2.0, 4.0, "inner"),
        ]);
        assert_eq!(doc.segment_at_time(3.0).unwrap().text, "outer");
    }
}
