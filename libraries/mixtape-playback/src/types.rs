//! Core types for playlist management

use crate::error::{PlaybackError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Opaque, process-unique track identifier
///
/// Allocated by [`BatchLoader`](crate::BatchLoader) when a file is selected,
/// before decoding starts, so host callbacks can be keyed by id rather than
/// by list position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(u64);

impl TrackId {
    /// Wrap a raw id
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Parse an id handed back by a JS host as a plain number
    ///
    /// Only whole numbers in `0..=2^53 - 1` (exactly representable as
    /// `f64`) are accepted.
    pub fn from_f64(raw: f64) -> Result<Self> {
        const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

        if raw.is_finite() && raw >= 0.0 && raw.fract() == 0.0 && raw <= MAX_SAFE_INTEGER {
            Ok(Self(raw as u64))
        } else {
            Err(PlaybackError::InvalidTrackId(raw))
        }
    }

    /// Id as a JS number
    pub fn as_f64(self) -> f64 {
        self.0 as f64
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One loaded audio item
///
/// The track owns its media handle. Dropping the track releases the
/// handle's underlying resource.
#[derive(Debug, Clone, PartialEq)]
pub struct Track<M> {
    /// Unique track identifier
    pub id: TrackId,

    /// Name shown in the song list (usually the file name)
    pub name: String,

    /// Duration reported by the host once decoding finished
    pub duration: Option<Duration>,

    /// Host media resource
    pub media: M,
}

impl<M> Track<M> {
    /// Create a track with no known duration
    pub fn new(id: TrackId, name: impl Into<String>, media: M) -> Self {
        Self {
            id,
            name: name.into(),
            duration: None,
            media,
        }
    }

    /// Set the decoded duration
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }
}

/// Navigator state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigatorState {
    /// No tracks loaded
    Empty,

    /// Tracks loaded, current index into the active order
    Loaded(usize),
}

/// What the host should do after the current track finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndedAction {
    /// Repeat is on: rewind and play the same index again
    Replay { index: usize },

    /// Move on to `to` and start playing it
    Advance { from: usize, to: usize },
}

impl EndedAction {
    /// Index that should be playing after the transition
    pub fn index(self) -> usize {
        match self {
            EndedAction::Replay { index } => index,
            EndedAction::Advance { to, .. } => to,
        }
    }
}

/// Configuration for the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Initial volume (0-100, default: 80)
    pub volume: u8,

    /// Initial shuffle state (default: off)
    pub shuffle: bool,

    /// Initial repeat state (default: off)
    pub repeat: bool,

    /// Seek slider granularity in seconds (default: 1.0)
    pub seek_step_secs: f64,

    /// Volume slider granularity in percent (default: 1)
    pub volume_step: u8,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            volume: 80,
            shuffle: false,
            repeat: false,
            seek_step_secs: 1.0,
            volume_step: 1,
        }
    }
}
