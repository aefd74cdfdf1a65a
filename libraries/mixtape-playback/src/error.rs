//! Error types for playlist navigation and slider control

use crate::types::TrackId;
use thiserror::Error;

/// A file whose media resource could not be prepared for playback
///
/// Decode failures are per-item: the failed file is dropped from its batch
/// and the remaining files still load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to decode {name}: {message}")]
pub struct DecodeError {
    /// Track id that was reserved for the file
    pub id: TrackId,

    /// Display name of the file
    pub name: String,

    /// Host-reported reason
    pub message: String,
}

/// Playback errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlaybackError {
    /// Navigation attempted on a playlist with no tracks
    #[error("Playlist is empty")]
    EmptyPlaylist,

    /// Explicit selection of an index outside the active order
    #[error("Index {index} out of range for playlist of {len} tracks")]
    IndexOutOfRange { index: usize, len: usize },

    /// No track with this id is in the playlist
    #[error("Track not found: {0}")]
    TrackNotFound(TrackId),

    /// Decode outcome reported for an id that no open batch is waiting on
    #[error("No pending load for track {0}")]
    UnknownBatchItem(TrackId),

    /// Numeric id from a host that is not a whole, non-negative number
    #[error("Invalid track id: {0}")]
    InvalidTrackId(f64),

    /// Media resource could not be prepared
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Slider bounds or step are unusable
    #[error("Invalid slider range: min={min}, max={max}, step={step}")]
    InvalidRange { min: f64, max: f64, step: f64 },

    /// Host media handle rejected a request
    #[error("Media error: {0}")]
    Media(String),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
