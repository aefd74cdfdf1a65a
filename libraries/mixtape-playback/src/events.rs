//! Player events
//!
//! Emitted by [`Player`](crate::Player) for the rendering layer, which
//! drains them after each handled host event and redraws what changed.

use crate::types::TrackId;
use serde::{Deserialize, Serialize};

/// Events emitted by the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerEvent {
    /// Playing/paused changed
    StateChanged {
        /// Whether audio is now playing
        playing: bool,
    },

    /// A different track became current (or the same one was restarted)
    TrackChanged {
        /// ID of the new current track
        track_id: TrackId,
        /// ID of the track that was current before, if any
        previous_track_id: Option<TrackId>,
        /// Index of the new track in the active order
        index: usize,
    },

    /// Tracks were added, removed, or reordered
    PlaylistChanged {
        /// New playlist length
        length: usize,
    },

    /// Shuffle or repeat toggled
    ModeChanged { shuffle: bool, repeat: bool },

    /// A selected file could not be decoded and was skipped
    DecodeFailed {
        track_id: TrackId,
        name: String,
        message: String,
    },

    /// Seek slider dragged (visual only, media untouched)
    SeekPreview { position_secs: f64 },

    /// Media position moved by the user
    Seeked { position_secs: f64 },

    /// Volume changed
    VolumeChanged {
        /// New volume level (0-100)
        level: u8,
        /// Whether audio is muted
        muted: bool,
    },

    /// Host media refused a request
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_variant_tags() {
        let event = PlayerEvent::TrackChanged {
            track_id: TrackId::new(4),
            previous_track_id: None,
            index: 2,
        };

        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["TrackChanged"]["track_id"], 4);
        assert_eq!(json["TrackChanged"]["index"], 2);
        assert!(json["TrackChanged"]["previous_track_id"].is_null());
    }
}
