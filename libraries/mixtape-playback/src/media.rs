//! Host media handle trait
//!
//! Abstracts the platform's audio element (one per track) so the player can
//! drive playback without knowing about the DOM.

use crate::error::Result;

/// Playback controls of one loaded media resource
///
/// Implementors wrap whatever the host uses to play a file. Dropping the
/// handle must release the underlying resource (object URL, decoder, ...).
pub trait MediaHandle {
    /// (Re)load the resource; resets position to the start
    fn load(&mut self);

    /// Start or resume playback
    ///
    /// # Returns
    /// * `Ok(())` - Playback started
    /// * `Err(_)` - Host refused (autoplay policy, lost resource, ...)
    fn play(&mut self) -> Result<()>;

    /// Pause, keeping the position
    fn pause(&mut self);

    /// Current position in seconds
    fn current_time(&self) -> f64;

    /// Move to a position in seconds
    fn set_current_time(&mut self, secs: f64);

    /// Linear output volume in [0, 1]
    fn set_volume(&mut self, volume: f32);

    /// Back to the start of the resource
    fn rewind(&mut self) {
        self.set_current_time(0.0);
    }
}

/// Recording media handle for unit tests
#[cfg(test)]
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct FakeMedia {
    pub playing: bool,
    pub position: f64,
    pub volume: f32,
    pub loads: usize,
    pub refuse_play: bool,
}

#[cfg(test)]
impl MediaHandle for FakeMedia {
    fn load(&mut self) {
        self.loads += 1;
        self.position = 0.0;
        self.playing = false;
    }

    fn play(&mut self) -> Result<()> {
        if self.refuse_play {
            return Err(crate::error::PlaybackError::Media("play() refused".to_string()));
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn current_time(&self) -> f64 {
        self.position
    }

    fn set_current_time(&mut self, secs: f64) {
        self.position = secs;
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }
}
