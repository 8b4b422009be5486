//! Playback Sequencer
//!
//! State machine for ordered segment playback. The sequencer owns no
//! document state; it records a frozen playlist of segment ids and resolves
//! them against the caller's current document on every transition. Media
//! control goes through the [`MediaSurface`] trait so the engine never
//! touches a decoder directly.
//!
//! States:
//! - `Stopped` (initial)
//! - `MediaPlaying` for free-running playback
//! - `SegmentsPlaying` while a playlist drives the playhead

use tracing::debug;

use crate::core::document::Document;
use crate::core::{SegmentId, TimeSec};

// =============================================================================
// Media Surface
// =============================================================================

/// Minimal playback surface the host exposes to the sequencer.
pub trait MediaSurface {
    /// Moves the playhead to the given time.
    fn seek(&mut self, time_sec: TimeSec);
    /// Starts or pauses playback.
    fn set_playing(&mut self, playing: bool);
    /// Current playhead position.
    fn current_time(&self) -> TimeSec;
}

// =============================================================================
// Sequencer
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    MediaPlaying,
    SegmentsPlaying,
}

/// Drives ordered playback of an explicit segment id list.
///
/// The playlist is a snapshot: document mutations never rewrite it. When a
/// recorded id no longer resolves (the segment was merged away or deleted),
/// advancing past it skips the seek while index bookkeeping continues.
#[derive(Debug, Default)]
pub struct PlaybackSequencer {
    state: PlaybackState,
    playlist: Vec<SegmentId>,
    current_index: usize,
    return_index: usize,
    selected_segment_id: Option<SegmentId>,
}

impl PlaybackSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn playlist(&self) -> &[SegmentId] {
        &self.playlist
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Segment most recently selected by a playback transition.
    pub fn selected_segment_id(&self) -> Option<&str> {
        self.selected_segment_id.as_deref()
    }

    /// Begins playlist playback from `start_index`.
    ///
    /// Always transitions to `SegmentsPlaying`; an empty playlist is a valid
    /// state, not an error. The id order is stored verbatim, independent of
    /// the document's own time order.
    pub fn start_playlist_playback(
        &mut self,
        doc: &Document,
        media: &mut impl MediaSurface,
        ids: Vec<SegmentId>,
        start_index: usize,
    ) {
        self.state = PlaybackState::SegmentsPlaying;
        self.playlist = ids;
        self.current_index = start_index;
        self.return_index = start_index;
        self.seek_to_index(doc, media, start_index, true);
    }

    /// Advances to the next playlist entry.
    ///
    /// Returns `true` while playback continues. Advancing past the end stops
    /// playback, returns the playhead to the start-index segment, and yields
    /// `false`. A no-op returning `false` outside `SegmentsPlaying`.
    pub fn next_playlist_segment(&mut self, doc: &Document, media: &mut impl MediaSurface) -> bool {
        if self.state != PlaybackState::SegmentsPlaying {
            return false;
        }

        let next = self.current_index + 1;
        if next < self.playlist.len() {
            self.current_index = next;
            self.seek_to_index(doc, media, next, true);
            true
        } else {
            self.stop_playlist_playback(doc, media, true);
            false
        }
    }

    /// Stops playlist playback, optionally returning the playhead to the
    /// segment playback started from.
    pub fn stop_playlist_playback(
        &mut self,
        doc: &Document,
        media: &mut impl MediaSurface,
        return_to_start: bool,
    ) {
        if return_to_start && !self.playlist.is_empty() {
            self.seek_to_index(doc, media, self.return_index, false);
        }
        media.set_playing(false);
        self.clear_playlist();
    }

    /// Abandons playlist playback without touching the media surface.
    ///
    /// Used when an external action (manual scrubbing, say) takes over the
    /// playhead; the current time must stay wherever the user put it.
    pub fn cancel_playlist_playback(&mut self) {
        self.clear_playlist();
    }

    /// Starts free-running playback.
    pub fn play_media(&mut self, media: &mut impl MediaSurface) {
        self.state = PlaybackState::MediaPlaying;
        media.set_playing(true);
    }

    /// Pauses free-running playback.
    pub fn pause_media(&mut self, media: &mut impl MediaSurface) {
        media.set_playing(false);
        if self.state == PlaybackState::MediaPlaying {
            self.state = PlaybackState::Stopped;
        }
    }

    fn clear_playlist(&mut self) {
        self.state = PlaybackState::Stopped;
        self.playlist.clear();
        self.current_index = 0;
        self.return_index = 0;
    }

    /// Seeks to the segment recorded at a playlist index, if it still
    /// resolves in the document. Returns whether a seek happened.
    fn seek_to_index(
        &mut self,
        doc: &Document,
        media: &mut impl MediaSurface,
        index: usize,
        play: bool,
    ) -> bool {
        let id = match self.playlist.get(index) {
            Some(id) => id,
            None => return false,
        };
        let segment = match doc.segments.iter().find(|s| &s.id == id) {
            Some(segment) => segment,
            None => {
                debug!(segment_id = %id, "Playlist entry no longer resolves to a segment");
                return false;
            }
        };

        media.seek(segment.start_time);
        if play {
            media.set_playing(true);
        }
        self.selected_segment_id = Some(segment.id.clone());
        true
    }
}

// =============================================================================
// Tests
// =============================================================================
