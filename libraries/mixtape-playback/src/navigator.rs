//! Playlist navigator
//!
//! Owns the loaded tracks, the current index, and the shuffle/repeat modes.
//!
//! ```text
//! base order:    [A, B, C, D]        (insertion order, owns the tracks)
//! permutation:   [2, 0, 3, 1]        (only while shuffled)
//! active order:  [C, A, D, B]        (what next/previous walk)
//! ```
//!
//! Indices handed out by the navigator always refer to the active order.

use crate::error::{PlaybackError, Result};
use crate::shuffle::{self, IndexPicker, RandomPicker};
use crate::types::{EndedAction, NavigatorState, Track, TrackId};
use std::fmt;
use tracing::debug;

/// Playlist navigator
pub struct Navigator<M> {
    /// Tracks in insertion order
    tracks: Vec<Track<M>>,

    /// Positions into `tracks`; `Some` iff shuffle is enabled
    permutation: Option<Vec<usize>>,

    /// Index into the active order; `None` iff `tracks` is empty
    current: Option<usize>,

    repeat: bool,

    picker: Box<dyn IndexPicker>,
}

impl<M> Navigator<M> {
    /// Create an empty navigator with a randomly seeded shuffle
    pub fn new() -> Self {
        Self::with_picker(RandomPicker::new())
    }

    /// Create an empty navigator with a specific random source
    pub fn with_picker(picker: impl IndexPicker + 'static) -> Self {
        Self {
            tracks: Vec::new(),
            permutation: None,
            current: None,
            repeat: false,
            picker: Box::new(picker),
        }
    }

    // ===== Loading =====

    /// Append tracks to the playlist
    ///
    /// While shuffled, new tracks are appended to the shuffled order in the
    /// same relative order rather than mixed into earlier positions. An
    /// empty shuffled playlist shuffles its first tracks instead. The
    /// current track is unchanged unless the playlist was empty, in which
    /// case the first track of the active order becomes current.
    pub fn add_tracks(&mut self, tracks: Vec<Track<M>>) {
        if tracks.is_empty() {
            return;
        }

        let start = self.tracks.len();
        let added = tracks.len();
        self.tracks.extend(tracks);

        if start == 0 && self.is_shuffled() {
            // Shuffle was enabled while empty: nothing to keep in place yet
            self.reshuffle();
        } else if let Some(permutation) = self.permutation.as_mut() {
            permutation.extend(start..start + added);
        }

        if self.current.is_none() {
            self.current = Some(0);
        }

        debug!(added, total = self.tracks.len(), "Tracks added to playlist");
    }

    /// Remove a track by id and hand it back to the caller
    ///
    /// Dropping the returned track releases its media. Removing a track
    /// before the current one keeps the same track current; removing the
    /// current track makes the following one current (wrapping to the
    /// start past the end).
    pub fn remove_track(&mut self, id: TrackId) -> Result<Track<M>> {
        let base = self
            .tracks
            .iter()
            .position(|t| t.id == id)
            .ok_or(PlaybackError::TrackNotFound(id))?;
        let active = self.active_position(base);

        let track = self.tracks.remove(base);

        if let Some(permutation) = self.permutation.as_mut() {
            permutation.retain(|&p| p != base);
            for p in permutation.iter_mut() {
                if *p > base {
                    *p -= 1;
                }
            }
        }

        let len = self.tracks.len();
        self.current = match self.current {
            _ if len == 0 => None,
            Some(current) if active < current => Some(current - 1),
            Some(current) if current >= len => Some(0),
            other => other,
        };

        debug!(track_id = %id, remaining = len, "Track removed from playlist");
        Ok(track)
    }

    /// Remove every track, returning them in insertion order
    ///
    /// The navigator goes back to `Empty`; shuffle and repeat flags stay.
    pub fn clear(&mut self) -> Vec<Track<M>> {
        if let Some(permutation) = self.permutation.as_mut() {
            permutation.clear();
        }
        self.current = None;

        debug!("Playlist cleared");
        std::mem::take(&mut self.tracks)
    }

    // ===== Navigation =====

    /// Track at the current index
    pub fn current(&self) -> Result<&Track<M>> {
        let index = self.current.ok_or(PlaybackError::EmptyPlaylist)?;
        Ok(&self.tracks[self.base_position(index)])
    }

    /// Mutable access to the current track (for driving its media)
    pub fn current_mut(&mut self) -> Result<&mut Track<M>> {
        let index = self.current.ok_or(PlaybackError::EmptyPlaylist)?;
        let base = self.base_position(index);
        Ok(&mut self.tracks[base])
    }

    /// Advance circularly; returns the index that was current before
    pub fn next(&mut self) -> Result<usize> {
        let previous = self.current.ok_or(PlaybackError::EmptyPlaylist)?;
        let len = self.tracks.len();

        self.current = Some((previous + 1) % len);
        debug!(from = previous, to = (previous + 1) % len, "Next track");
        Ok(previous)
    }

    /// Retreat circularly; returns the index that was current before
    pub fn previous(&mut self) -> Result<usize> {
        let previous = self.current.ok_or(PlaybackError::EmptyPlaylist)?;
        let len = self.tracks.len();

        self.current = Some((previous + len - 1) % len);
        debug!(from = previous, to = (previous + len - 1) % len, "Previous track");
        Ok(previous)
    }

    /// Make the track at `index` of the active order current
    pub fn select_index(&mut self, index: usize) -> Result<()> {
        let len = self.tracks.len();
        if index >= len {
            return Err(PlaybackError::IndexOutOfRange { index, len });
        }

        self.current = Some(index);
        debug!(index, "Track selected");
        Ok(())
    }

    /// Transition for a "playback finished" event
    ///
    /// With repeat on, the index stays put and the host replays it.
    /// Otherwise this is exactly [`next`](Self::next).
    pub fn on_track_ended(&mut self) -> Result<EndedAction> {
        if self.repeat {
            let index = self.current.ok_or(PlaybackError::EmptyPlaylist)?;
            return Ok(EndedAction::Replay { index });
        }

        let from = self.next()?;
        let to = self.current.ok_or(PlaybackError::EmptyPlaylist)?;
        Ok(EndedAction::Advance { from, to })
    }

    // ===== Shuffle & Repeat =====

    /// Enable or disable shuffle
    ///
    /// Enabling draws a fresh permutation of the base order; disabling drops
    /// it. Either way playback restarts from the first track of the new
    /// order. Asking for the mode already in effect changes nothing.
    pub fn set_shuffle(&mut self, enabled: bool) {
        if self.is_shuffled() == enabled {
            return;
        }

        if enabled {
            self.reshuffle();
        } else {
            self.permutation = None;
            self.restart();
            debug!("Shuffle disabled");
        }
    }

    /// Draw a new permutation and restart from its first track
    ///
    /// Enables shuffle if it was off.
    pub fn reshuffle(&mut self) {
        let permutation = shuffle::permutation(self.tracks.len(), self.picker.as_mut());
        self.permutation = Some(permutation);
        self.restart();
        debug!(len = self.tracks.len(), "Shuffle permutation drawn");
    }

    /// Enable or disable repeat of the current track
    pub fn set_repeat(&mut self, enabled: bool) {
        self.repeat = enabled;
    }

    /// Whether shuffle is enabled
    pub fn is_shuffled(&self) -> bool {
        self.permutation.is_some()
    }

    /// Whether repeat is enabled
    pub fn is_repeat(&self) -> bool {
        self.repeat
    }

    // ===== Queries =====

    /// Current index into the active order
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// State machine view of the navigator
    pub fn state(&self) -> NavigatorState {
        match self.current {
            Some(index) => NavigatorState::Loaded(index),
            None => NavigatorState::Empty,
        }
    }

    /// Tracks in the order next/previous walk them
    pub fn active_order(&self) -> Vec<&Track<M>> {
        match &self.permutation {
            Some(permutation) => permutation.iter().map(|&p| &self.tracks[p]).collect(),
            None => self.tracks.iter().collect(),
        }
    }

    /// Tracks in insertion order
    pub fn base_order(&self) -> &[Track<M>] {
        &self.tracks
    }

    /// Track at `index` of the active order
    pub fn get(&self, index: usize) -> Option<&Track<M>> {
        if index >= self.tracks.len() {
            return None;
        }
        self.tracks.get(self.base_position(index))
    }

    /// Track with this id, wherever it sits
    pub fn track(&self, id: TrackId) -> Option<&Track<M>> {
        self.tracks.iter().find(|t| t.id == id)
    }

    /// Mutable track lookup by id
    pub fn track_mut(&mut self, id: TrackId) -> Option<&mut Track<M>> {
        self.tracks.iter_mut().find(|t| t.id == id)
    }

    /// Index of the track with this id in the active order
    pub fn position_of(&self, id: TrackId) -> Option<usize> {
        let base = self.tracks.iter().position(|t| t.id == id)?;
        Some(self.active_position(base))
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether no tracks are loaded
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    // ===== Internal =====

    fn restart(&mut self) {
        self.current = if self.tracks.is_empty() { None } else { Some(0) };
    }

    fn base_position(&self, active: usize) -> usize {
        match &self.permutation {
            Some(permutation) => permutation[active],
            None => active,
        }
    }

    fn active_position(&self, base: usize) -> usize {
        match &self.permutation {
            Some(permutation) => permutation
                .iter()
                .position(|&p| p == base)
                .unwrap_or(base),
            None => base,
        }
    }
}

impl<M> Default for Navigator<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> fmt::Debug for Navigator<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("len", &self.tracks.len())
            .field("current", &self.current)
            .field("permutation", &self.permutation)
            .field("repeat", &self.repeat)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: u64, name: &str) -> Track<()> {
        Track::new(TrackId::new(id), name, ())
    }

    fn names(nav: &Navigator<()>) -> Vec<String> {
        nav.active_order().iter().map(|t| t.name.clone()).collect()
    }

    fn abc() -> Navigator<()> {
        let mut nav = Navigator::new();
        nav.add_tracks(vec![track(1, "A"), track(2, "B"), track(3, "C")]);
        nav
    }

    #[test]
    fn starts_empty() {
        let nav: Navigator<()> = Navigator::new();
        assert_eq!(nav.state(), NavigatorState::Empty);
        assert_eq!(nav.current_index(), None);
        assert!(nav.is_empty());
    }

    #[test]
    fn navigation_on_empty_playlist_fails() {
        let mut nav: Navigator<()> = Navigator::new();

        assert_eq!(nav.current().unwrap_err(), PlaybackError::EmptyPlaylist);
        assert_eq!(nav.next().unwrap_err(), PlaybackError::EmptyPlaylist);
        assert_eq!(nav.previous().unwrap_err(), PlaybackError::EmptyPlaylist);
        assert_eq!(nav.on_track_ended().unwrap_err(), PlaybackError::EmptyPlaylist);
    }

    #[test]
    fn first_batch_selects_index_zero() {
        let nav = abc();
        assert_eq!(nav.state(), NavigatorState::Loaded(0));
        assert_eq!(nav.current().unwrap().name, "A");
    }

    #[test]
    fn empty_add_is_noop() {
        let mut nav: Navigator<()> = Navigator::new();
        nav.add_tracks(Vec::new());
        assert_eq!(nav.state(), NavigatorState::Empty);
    }

    #[test]
    fn appending_keeps_current_track() {
        let mut nav = abc();
        nav.select_index(2).unwrap();

        nav.add_tracks(vec![track(4, "D")]);

        assert_eq!(nav.current_index(), Some(2));
        assert_eq!(nav.current().unwrap().name, "C");
        assert_eq!(nav.len(), 4);
    }

    #[test]
    fn next_returns_previous_index_and_wraps() {
        let mut nav = abc();

        assert_eq!(nav.next().unwrap(), 0);
        assert_eq!(nav.current().unwrap().name, "B");
        assert_eq!(nav.next().unwrap(), 1);
        assert_eq!(nav.next().unwrap(), 2);
        assert_eq!(nav.current_index(), Some(0));
    }

    #[test]
    fn previous_wraps_to_last() {
        let mut nav = abc();

        assert_eq!(nav.previous().unwrap(), 0);
        assert_eq!(nav.current().unwrap().name, "C");
    }

    #[test]
    fn select_out_of_range_fails_without_clamping() {
        let mut nav = abc();
        nav.select_index(1).unwrap();

        let err = nav.select_index(3).unwrap_err();
        assert_eq!(err, PlaybackError::IndexOutOfRange { index: 3, len: 3 });
        assert_eq!(nav.current_index(), Some(1));
    }

    #[test]
    fn scripted_shuffle_restarts_at_first_of_new_order() {
        let mut picks = vec![1, 0].into_iter();
        let mut nav = Navigator::with_picker(move |_upper: usize| picks.next().unwrap_or(0));
        nav.add_tracks(vec![track(1, "A"), track(2, "B"), track(3, "C")]);
        nav.select_index(2).unwrap();

        nav.set_shuffle(true);

        assert_eq!(names(&nav), vec!["C", "A", "B"]);
        assert_eq!(nav.current_index(), Some(0));
        assert_eq!(nav.current().unwrap().name, "C");
    }

    #[test]
    fn unshuffle_restores_base_order() {
        let mut nav = abc();
        nav.set_shuffle(true);
        nav.set_shuffle(false);

        assert!(!nav.is_shuffled());
        assert_eq!(names(&nav), vec!["A", "B", "C"]);
        assert_eq!(nav.current_index(), Some(0));
    }

    #[test]
    fn reasserting_shuffle_keeps_permutation() {
        let mut nav = Navigator::with_picker(RandomPicker::seeded(3));
        nav.add_tracks((0..10).map(|i| track(i, &i.to_string())).collect());
        nav.set_shuffle(true);
        nav.next().unwrap();
        let before = names(&nav);

        nav.set_shuffle(true);

        assert_eq!(names(&nav), before);
        assert_eq!(nav.current_index(), Some(1));
    }

    #[test]
    fn shuffled_append_goes_to_the_end() {
        let mut picks = vec![1, 0].into_iter();
        let mut nav = Navigator::with_picker(move |_upper: usize| picks.next().unwrap_or(0));
        nav.add_tracks(vec![track(1, "A"), track(2, "B"), track(3, "C")]);
        nav.set_shuffle(true);
        nav.next().unwrap();

        nav.add_tracks(vec![track(4, "D"), track(5, "E")]);

        assert_eq!(names(&nav), vec!["C", "A", "B", "D", "E"]);
        assert_eq!(nav.current().unwrap().name, "A");

        nav.set_shuffle(false);
        assert_eq!(names(&nav), vec!["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn shuffle_on_empty_playlist_stays_empty() {
        let mut nav: Navigator<()> = Navigator::new();
        nav.set_shuffle(true);

        assert!(nav.is_shuffled());
        assert_eq!(nav.state(), NavigatorState::Empty);

        nav.add_tracks(vec![track(1, "A")]);
        assert_eq!(nav.current().unwrap().name, "A");
    }

    #[test]
    fn first_tracks_of_shuffled_playlist_are_shuffled() {
        let mut picks = vec![1, 0].into_iter();
        let mut nav = Navigator::with_picker(move |_upper: usize| picks.next().unwrap_or(0));
        nav.set_shuffle(true);

        nav.add_tracks(vec![track(1, "A"), track(2, "B"), track(3, "C")]);

        assert_eq!(names(&nav), vec!["C", "A", "B"]);
        assert_eq!(nav.current().unwrap().name, "C");

        nav.set_shuffle(false);
        assert_eq!(names(&nav), vec!["A", "B", "C"]);
    }

    #[test]
    fn cleared_shuffled_playlist_reshuffles_next_batch() {
        let mut picks = vec![0, 0, 1, 0].into_iter();
        let mut nav = Navigator::with_picker(move |_upper: usize| picks.next().unwrap_or(0));
        nav.add_tracks(vec![track(1, "A"), track(2, "B"), track(3, "C")]);
        nav.set_shuffle(true);
        drop(nav.clear());

        nav.add_tracks(vec![track(4, "D"), track(5, "E"), track(6, "F")]);

        assert!(nav.is_shuffled());
        assert_eq!(names(&nav), vec!["F", "D", "E"]);
    }

    #[test]
    fn repeat_replays_same_index() {
        let mut nav = abc();
        nav.select_index(1).unwrap();
        nav.set_repeat(true);

        assert_eq!(nav.on_track_ended().unwrap(), EndedAction::Replay { index: 1 });
        assert_eq!(nav.current_index(), Some(1));
    }

    #[test]
    fn ended_on_last_track_wraps() {
        let mut nav = abc();
        nav.select_index(2).unwrap();

        assert_eq!(
            nav.on_track_ended().unwrap(),
            EndedAction::Advance { from: 2, to: 0 }
        );
        assert_eq!(nav.current().unwrap().name, "A");
    }

    #[test]
    fn remove_before_current_keeps_current_track() {
        let mut nav = abc();
        nav.select_index(2).unwrap();

        let removed = nav.remove_track(TrackId::new(1)).unwrap();

        assert_eq!(removed.name, "A");
        assert_eq!(nav.current_index(), Some(1));
        assert_eq!(nav.current().unwrap().name, "C");
    }

    #[test]
    fn remove_current_moves_to_following_track() {
        let mut nav = abc();
        nav.select_index(1).unwrap();

        nav.remove_track(TrackId::new(2)).unwrap();
        assert_eq!(nav.current().unwrap().name, "C");

        nav.remove_track(TrackId::new(3)).unwrap();
        assert_eq!(nav.current().unwrap().name, "A");
    }

    #[test]
    fn remove_last_track_returns_to_empty() {
        let mut nav = Navigator::new();
        nav.add_tracks(vec![track(1, "A")]);

        nav.remove_track(TrackId::new(1)).unwrap();

        assert_eq!(nav.state(), NavigatorState::Empty);
    }

    #[test]
    fn remove_unknown_track_fails() {
        let mut nav = abc();
        let err = nav.remove_track(TrackId::new(99)).unwrap_err();
        assert_eq!(err, PlaybackError::TrackNotFound(TrackId::new(99)));
        assert_eq!(nav.len(), 3);
    }

    #[test]
    fn remove_while_shuffled_keeps_permutation_consistent() {
        let mut picks = vec![1, 0].into_iter();
        let mut nav = Navigator::with_picker(move |_upper: usize| picks.next().unwrap_or(0));
        nav.add_tracks(vec![track(1, "A"), track(2, "B"), track(3, "C")]);
        nav.set_shuffle(true);
        nav.select_index(2).unwrap();

        nav.remove_track(TrackId::new(1)).unwrap();

        assert_eq!(names(&nav), vec!["C", "B"]);
        assert_eq!(nav.current().unwrap().name, "B");

        nav.set_shuffle(false);
        assert_eq!(names(&nav), vec!["B", "C"]);
    }

    #[test]
    fn clear_returns_all_tracks() {
        let mut nav = abc();
        nav.set_repeat(true);

        let removed = nav.clear();

        assert_eq!(removed.len(), 3);
        assert_eq!(nav.state(), NavigatorState::Empty);
        assert!(nav.is_repeat());
    }

    #[test]
    fn lookups_by_id_follow_active_order() {
        let mut picks = vec![1, 0].into_iter();
        let mut nav = Navigator::with_picker(move |_upper: usize| picks.next().unwrap_or(0));
        nav.add_tracks(vec![track(1, "A"), track(2, "B"), track(3, "C")]);
        nav.set_shuffle(true);

        assert_eq!(nav.position_of(TrackId::new(3)), Some(0));
        assert_eq!(nav.position_of(TrackId::new(2)), Some(2));
        assert_eq!(nav.track(TrackId::new(2)).unwrap().name, "B");
        assert_eq!(nav.get(1).unwrap().name, "A");
        assert!(nav.get(3).is_none());
        assert_eq!(nav.base_order()[0].name, "A");
    }
}
