//! Mixtape - Playlist Playback Core
//!
//! Platform-agnostic state for a playlist audio widget.
//!
//! This crate provides:
//! - Playlist navigation (circular next/previous, direct selection)
//! - Shuffle (Fisher-Yates permutation over insertion order) and repeat
//! - A seek slider state machine (drag vs. click, live vs. commit)
//! - Atomic batch loading of selected files with per-file decode failures
//! - Volume control (perceptual 0-100%, mute/unmute)
//! - A `Player` controller wiring all of the above to host media handles
//!
//! # Architecture
//!
//! `mixtape-playback` never touches the DOM or decodes audio. The host
//! implements [`MediaHandle`] for its audio element, forwards its events
//! (file selection, decode results, time updates, ended, clicks, pointer
//! events) to a [`Player`], and redraws from the emitted [`PlayerEvent`]s and
//! the snapshot types in [`view`].
//!
//! # Example: Navigation
//!
//! ```rust
//! use mixtape_playback::{Navigator, Track, TrackId};
//!
//! let mut nav = Navigator::new();
//! nav.add_tracks(vec![
//!     Track::new(TrackId::new(1), "a.mp3", ()),
//!     Track::new(TrackId::new(2), "b.mp3", ()),
//! ]);
//!
//! assert_eq!(nav.current().unwrap().name, "a.mp3");
//! assert_eq!(nav.next().unwrap(), 0);
//! assert_eq!(nav.current().unwrap().name, "b.mp3");
//! nav.next().unwrap();
//! assert_eq!(nav.current_index(), Some(0));
//! ```
//!
//! # Example: Seek Slider
//!
//! ```rust
//! use mixtape_playback::{SeekSlider, SliderEvent};
//!
//! let mut slider = SeekSlider::new(0.0, 180.0, 1.0).unwrap();
//! slider.set_value(45.0);
//! assert_eq!(slider.fill_percent(), 25.0);
//!
//! slider.pointer_down(0.5);
//! slider.set_value(46.0); // playback tick while dragging: ignored
//! assert_eq!(slider.value(), 90.0);
//! assert_eq!(slider.pointer_up(), Some(SliderEvent::Commit(90.0)));
//! ```
//!
//! # Example: Platform Integration
//!
//! ```rust
//! use mixtape_playback::{DecodeOutcome, MediaHandle, Player, PlayerConfig, Result};
//!
//! // Implement MediaHandle for your platform's audio element
//! struct MyAudio {
//!     position: f64,
//! }
//!
//! impl MediaHandle for MyAudio {
//!     fn load(&mut self) {}
//!     fn play(&mut self) -> Result<()> {
//!         Ok(())
//!     }
//!     fn pause(&mut self) {}
//!     fn current_time(&self) -> f64 {
//!         self.position
//!     }
//!     fn set_current_time(&mut self, secs: f64) {
//!         self.position = secs;
//!     }
//!     fn set_volume(&mut self, _volume: f32) {}
//! }
//!
//! let mut player = Player::new(PlayerConfig::default()).unwrap();
//! let batch = player.select_files(vec![("song.mp3", MyAudio { position: 0.0 })]);
//!
//! // Host decode callbacks report back by track id
//! for id in player.pending_ids(batch) {
//!     player.decode_finished(id, DecodeOutcome::ready_secs(200.0)).unwrap();
//! }
//!
//! player.play().unwrap();
//! player.seek_click(0.5);
//! assert_eq!(player.navigator().current().unwrap().media.current_time(), 100.0);
//! ```

mod error;
mod events;
mod loader;
mod media;
mod navigator;
mod player;
mod shuffle;
mod slider;
pub mod types;
pub mod view;
mod volume;

#[cfg(feature = "wasm")]
pub mod wasm;

// Public exports
pub use error::{DecodeError, PlaybackError, Result};
pub use events::PlayerEvent;
pub use loader::{
    BatchId, BatchLoader, BatchOutcome, BatchProgress, DecodeOutcome, LoadBatch, PendingBatches,
};
pub use media::MediaHandle;
pub use navigator::Navigator;
pub use player::Player;
pub use shuffle::{permutation, IndexPicker, RandomPicker};
pub use slider::{fill_percent, pointer_ratio, SeekSlider, SliderEvent, SliderState};
pub use types::{EndedAction, NavigatorState, PlayerConfig, Track, TrackId};
pub use volume::Volume;
