//! Player controller
//!
//! Wires the navigator, the seek and volume sliders, and the batch loader to
//! the host's media handles. The host owns one `Player` and forwards its
//! events into it:
//!
//! ```text
//! file input change     -> select_files
//! canplaythrough/error  -> decode_finished (while the file is loading)
//! timeupdate            -> time_update
//! ended                 -> track_ended
//! button clicks         -> play / pause / next / previous / select / set_shuffle / set_repeat
//! slider pointer events -> seek_* / volume_*
//! ```
//!
//! After each call the host drains [`PlayerEvent`]s and redraws.
//!
//! Each handle is loaded once, when its file is selected. Switching tracks
//! only pauses, rewinds and plays handles, so a committed track never fires
//! another decode event for the host to forward.

use crate::error::{PlaybackError, Result};
use crate::events::PlayerEvent;
use crate::loader::{BatchId, BatchOutcome, BatchProgress, DecodeOutcome, PendingBatches};
use crate::media::MediaHandle;
use crate::navigator::Navigator;
use crate::slider::{SeekSlider, SliderEvent};
use crate::types::{EndedAction, PlayerConfig, TrackId};
use crate::view::{PlaylistSnapshot, SliderSnapshot};
use crate::volume::Volume;
use tracing::{debug, warn};

/// Playlist player driving host media handles
#[derive(Debug)]
pub struct Player<M: MediaHandle> {
    navigator: Navigator<M>,

    // Selections still decoding
    batches: PendingBatches<M>,

    seek: SeekSlider,

    volume_slider: SeekSlider,

    volume: Volume,

    playing: bool,

    // Event queue for UI synchronization
    pending_events: Vec<PlayerEvent>,
}

impl<M: MediaHandle> Player<M> {
    /// Create a player with a randomly seeded shuffle
    pub fn new(config: PlayerConfig) -> Result<Self> {
        Self::with_navigator(config, Navigator::new())
    }

    /// Create a player around an existing (usually empty) navigator
    ///
    /// Lets callers inject the shuffle picker.
    pub fn with_navigator(config: PlayerConfig, mut navigator: Navigator<M>) -> Result<Self> {
        let mut seek = SeekSlider::new(0.0, 1.0, config.seek_step_secs)?;
        seek.set_range(0.0, 0.0)?;

        let mut volume_slider = SeekSlider::new(0.0, 100.0, f64::from(config.volume_step))?;
        let volume = Volume::new(config.volume);
        volume_slider.set_value(f64::from(volume.level()));

        navigator.set_shuffle(config.shuffle);
        navigator.set_repeat(config.repeat);

        Ok(Self {
            navigator,
            batches: PendingBatches::new(),
            seek,
            volume_slider,
            volume,
            playing: false,
            pending_events: Vec::new(),
        })
    }

    // ===== Loading =====

    /// Start loading files selected together
    ///
    /// Each handle is asked to load; the host reports back through
    /// [`decode_finished`](Self::decode_finished) using the track ids of the
    /// returned batch (see [`pending_ids`](Self::pending_ids)).
    pub fn select_files<S>(&mut self, files: impl IntoIterator<Item = (S, M)>) -> BatchId
    where
        S: Into<String>,
    {
        let id = self.batches.begin(files);

        for track in self.batches.pending_mut(id) {
            track.media.load();
        }

        // Empty selection: nothing to wait for
        self.commit_settled();
        id
    }

    /// Track ids reserved by an in-flight batch, in selection order
    pub fn pending_ids(&self, batch: BatchId) -> Vec<TrackId> {
        self.batches.ids(batch)
    }

    /// Report the terminal decode event for one selected file
    ///
    /// When this settles the last file of its batch, the batch's decoded
    /// tracks are appended to the playlist in selection order.
    pub fn decode_finished(&mut self, id: TrackId, outcome: DecodeOutcome) -> Result<BatchProgress> {
        let progress = self.batches.resolve(id, outcome)?;
        self.commit_settled();
        Ok(progress)
    }

    fn commit_settled(&mut self) {
        for outcome in self.batches.take_settled() {
            self.commit(outcome);
        }
    }

    fn commit(&mut self, outcome: BatchOutcome<M>) {
        for error in outcome.errors {
            self.push_event(PlayerEvent::DecodeFailed {
                track_id: error.id,
                name: error.name,
                message: error.message,
            });
        }

        if outcome.tracks.is_empty() {
            return;
        }

        let was_empty = self.navigator.is_empty();
        self.navigator.add_tracks(outcome.tracks);
        self.push_event(PlayerEvent::PlaylistChanged {
            length: self.navigator.len(),
        });

        if was_empty {
            if let Err(error) = self.enter_current(None) {
                warn!(%error, "Could not prepare first track");
            }
        }
    }

    // ===== Playback Control =====

    /// Start or resume the current track
    pub fn play(&mut self) -> Result<()> {
        let gain = self.volume.gain();
        let track = self.navigator.current_mut()?;
        track.media.set_volume(gain);

        if let Err(e) = track.media.play() {
            return Err(self.fail(e));
        }

        if !self.playing {
            self.playing = true;
            debug!("Playback started");
            self.push_event(PlayerEvent::StateChanged { playing: true });
        }
        Ok(())
    }

    /// Pause the current track
    pub fn pause(&mut self) {
        if let Ok(track) = self.navigator.current_mut() {
            track.media.pause();
        }

        if self.playing {
            self.playing = false;
            debug!("Playback paused");
            self.push_event(PlayerEvent::StateChanged { playing: false });
        }
    }

    /// Play if paused, pause if playing
    pub fn toggle_play(&mut self) -> Result<()> {
        if self.playing {
            self.pause();
            Ok(())
        } else {
            self.play()
        }
    }

    /// Skip to the next track (wrapping)
    pub fn next(&mut self) -> Result<()> {
        let previous = self.current_id();
        self.navigator.next()?;
        self.enter_current(previous)
    }

    /// Go back to the previous track (wrapping)
    pub fn previous(&mut self) -> Result<()> {
        let previous = self.current_id();
        self.navigator.previous()?;
        self.enter_current(previous)
    }

    /// Jump to a song list entry
    pub fn select(&mut self, index: usize) -> Result<()> {
        let previous = self.current_id();
        self.navigator.select_index(index)?;
        self.enter_current(previous)
    }

    /// Jump to a track by id
    pub fn select_track(&mut self, id: TrackId) -> Result<()> {
        let index = self
            .navigator
            .position_of(id)
            .ok_or(PlaybackError::TrackNotFound(id))?;
        self.select(index)
    }

    /// Host reported that the current track played to the end
    pub fn track_ended(&mut self) -> Result<EndedAction> {
        let previous = self.current_id();
        let action = self.navigator.on_track_ended()?;
        if !self.playing {
            self.playing = true;
            self.push_event(PlayerEvent::StateChanged { playing: true });
        }

        match action {
            EndedAction::Replay { .. } => {
                let track = self.navigator.current_mut()?;
                track.media.rewind();
                if let Err(e) = track.media.play() {
                    return Err(self.fail(e));
                }
                self.seek.set_value(0.0);
            }
            EndedAction::Advance { .. } => self.enter_current(previous)?,
        }

        Ok(action)
    }

    // ===== Shuffle & Repeat =====

    /// Enable or disable shuffle; restarts from the first track of the new order
    pub fn set_shuffle(&mut self, enabled: bool) -> Result<()> {
        if self.navigator.is_shuffled() == enabled {
            return Ok(());
        }

        let previous = self.current_id();
        self.navigator.set_shuffle(enabled);
        self.mode_changed(previous)
    }

    /// Draw a new shuffle order (enabling shuffle if needed)
    pub fn reshuffle(&mut self) -> Result<()> {
        let previous = self.current_id();
        self.navigator.reshuffle();
        self.mode_changed(previous)
    }

    /// Enable or disable repeat of the current track
    pub fn set_repeat(&mut self, enabled: bool) {
        if self.navigator.is_repeat() == enabled {
            return;
        }
        self.navigator.set_repeat(enabled);
        self.push_mode_event();
    }

    fn mode_changed(&mut self, previous: Option<TrackId>) -> Result<()> {
        self.push_mode_event();
        self.push_event(PlayerEvent::PlaylistChanged {
            length: self.navigator.len(),
        });

        if self.navigator.is_empty() {
            return Ok(());
        }
        self.enter_current(previous)
    }

    fn push_mode_event(&mut self) {
        self.push_event(PlayerEvent::ModeChanged {
            shuffle: self.navigator.is_shuffled(),
            repeat: self.navigator.is_repeat(),
        });
    }

    // ===== Seek Slider =====

    /// Host playback position tick
    ///
    /// Ignored by the slider while the user is dragging it.
    pub fn time_update(&mut self, position_secs: f64) {
        self.seek.set_value(position_secs);
    }

    pub fn seek_pointer_down(&mut self, ratio: f64) {
        let event = self.seek.pointer_down(ratio);
        self.apply_seek(Some(event));
    }

    pub fn seek_pointer_move(&mut self, ratio: f64) {
        let event = self.seek.pointer_move(ratio);
        self.apply_seek(event);
    }

    pub fn seek_pointer_up(&mut self) {
        let event = self.seek.pointer_up();
        self.apply_seek(event);
    }

    pub fn seek_click(&mut self, ratio: f64) {
        let event = self.seek.click(ratio);
        self.apply_seek(Some(event));
    }

    /// Seek by whole slider steps (arrow keys)
    pub fn seek_nudge(&mut self, steps: i32) {
        let event = self.seek.nudge(steps);
        self.apply_seek(event);
    }

    fn apply_seek(&mut self, event: Option<SliderEvent>) {
        match event {
            Some(SliderEvent::Live(position_secs)) => {
                self.push_event(PlayerEvent::SeekPreview { position_secs });
            }
            Some(SliderEvent::Commit(position_secs)) => {
                let Ok(track) = self.navigator.current_mut() else {
                    return;
                };
                track.media.set_current_time(position_secs);
                debug!(position_secs, "Seeked");
                self.push_event(PlayerEvent::Seeked { position_secs });
            }
            None => {}
        }
    }

    // ===== Volume =====

    /// Set volume (0-100)
    pub fn set_volume(&mut self, level: u8) {
        self.volume.set_level(level);
        self.volume_slider.set_value(f64::from(self.volume.level()));
        self.apply_volume();
    }

    pub fn toggle_mute(&mut self) {
        self.volume.toggle_mute();
        self.apply_volume();
    }

    pub fn volume_pointer_down(&mut self, ratio: f64) {
        let event = self.volume_slider.pointer_down(ratio);
        self.apply_volume_event(Some(event));
    }

    pub fn volume_pointer_move(&mut self, ratio: f64) {
        let event = self.volume_slider.pointer_move(ratio);
        self.apply_volume_event(event);
    }

    pub fn volume_pointer_up(&mut self) {
        let event = self.volume_slider.pointer_up();
        self.apply_volume_event(event);
    }

    pub fn volume_click(&mut self, ratio: f64) {
        let event = self.volume_slider.click(ratio);
        self.apply_volume_event(Some(event));
    }

    // Volume is audible feedback, so live drag values apply immediately
    fn apply_volume_event(&mut self, event: Option<SliderEvent>) {
        if let Some(event) = event {
            self.volume.set_from_slider(event.value());
            self.apply_volume();
        }
    }

    fn apply_volume(&mut self) {
        let gain = self.volume.gain();
        if let Ok(track) = self.navigator.current_mut() {
            track.media.set_volume(gain);
        }
        self.push_event(PlayerEvent::VolumeChanged {
            level: self.volume.level(),
            muted: self.volume.is_muted(),
        });
    }

    // ===== Playlist Editing =====

    /// Remove a track and release its media
    ///
    /// Removing the current track moves on to the following one, keeping
    /// playback going if it was playing.
    pub fn remove_track(&mut self, id: TrackId) -> Result<()> {
        let was_current = self.current_id() == Some(id);
        if was_current {
            if let Ok(track) = self.navigator.current_mut() {
                track.media.pause();
            }
        }

        drop(self.navigator.remove_track(id)?);
        self.push_event(PlayerEvent::PlaylistChanged {
            length: self.navigator.len(),
        });

        if !was_current {
            return Ok(());
        }

        if self.navigator.is_empty() {
            self.stopped();
            Ok(())
        } else {
            self.enter_current(None)
        }
    }

    /// Drop every track (the playlist goes back to empty)
    pub fn clear(&mut self) {
        if let Ok(track) = self.navigator.current_mut() {
            track.media.pause();
        }

        drop(self.navigator.clear());
        self.push_event(PlayerEvent::PlaylistChanged { length: 0 });
        self.stopped();
    }

    fn stopped(&mut self) {
        // A zero-length range is always accepted
        let _ = self.seek.set_range(0.0, 0.0);

        if self.playing {
            self.playing = false;
            self.push_event(PlayerEvent::StateChanged { playing: false });
        }
    }

    // ===== State Queries =====

    pub fn navigator(&self) -> &Navigator<M> {
        &self.navigator
    }

    pub fn seek_slider(&self) -> &SeekSlider {
        &self.seek
    }

    pub fn volume_slider(&self) -> &SeekSlider {
        &self.volume_slider
    }

    pub fn volume(&self) -> &Volume {
        &self.volume
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Number of selections still waiting on decode results
    pub fn pending_batches(&self) -> usize {
        self.batches.len()
    }

    pub fn playlist_snapshot(&self) -> PlaylistSnapshot {
        PlaylistSnapshot::capture(&self.navigator, self.playing)
    }

    pub fn seek_snapshot(&self) -> SliderSnapshot {
        SliderSnapshot::from(&self.seek)
    }

    pub fn volume_snapshot(&self) -> SliderSnapshot {
        SliderSnapshot::from(&self.volume_slider)
    }

    /// Take all events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // ===== Internal =====

    fn current_id(&self) -> Option<TrackId> {
        self.navigator.current().ok().map(|t| t.id)
    }

    /// Hand playback over from `previous` to the navigator's current track
    fn enter_current(&mut self, previous: Option<TrackId>) -> Result<()> {
        if let Some(id) = previous {
            if let Some(track) = self.navigator.track_mut(id) {
                track.media.pause();
                track.media.rewind();
            }
        }

        let index = self
            .navigator
            .current_index()
            .ok_or(PlaybackError::EmptyPlaylist)?;
        let gain = self.volume.gain();
        let playing = self.playing;

        let track = self.navigator.current_mut()?;
        let track_id = track.id;
        let duration = track.duration.map_or(0.0, |d| d.as_secs_f64());
        track.media.rewind();
        track.media.set_volume(gain);
        let started = if playing { track.media.play() } else { Ok(()) };

        self.seek.set_range(0.0, duration)?;
        self.seek.set_value(0.0);

        debug!(track_id = %track_id, index, "Current track changed");
        self.push_event(PlayerEvent::TrackChanged {
            track_id,
            previous_track_id: previous,
            index,
        });

        started.map_err(|e| self.fail(e))
    }

    /// Record a host refusal: playback stops and the UI hears about it
    fn fail(&mut self, error: PlaybackError) -> PlaybackError {
        warn!(%error, "Media refused playback");
        self.push_event(PlayerEvent::Error {
            message: error.to_string(),
        });
        if self.playing {
            self.playing = false;
            self.push_event(PlayerEvent::StateChanged { playing: false });
        }
        error
    }

    fn push_event(&mut self, event: PlayerEvent) {
        self.pending_events.push(event);
    }
}
