//! Seek slider state machine
//!
//! A range control that mirrors an external position (playback time,
//! volume) while letting the user override it with the pointer.
//!
//! ```text
//!            pointer_down
//!   Idle ──────────────────▶ Dragging ──┐ pointer_move: Live(v)
//!    ▲  │                        │  ◀───┘
//!    │  │ click: Commit(v)       │ pointer_up / click: Commit(v)
//!    │  └──▶ Idle                ▼
//!    └────────────────────────── Idle
//! ```
//!
//! External `set_value` calls only land while idle, so a playback tick never
//! yanks the thumb out from under the user's pointer.

use crate::error::{PlaybackError, Result};
use serde::{Deserialize, Serialize};

/// Slider state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SliderState {
    Idle,
    Dragging,
}

/// Value reported by pointer interaction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SliderEvent {
    /// Visual feedback while dragging; nothing should be applied yet
    Live(f64),

    /// User finalized a value (release or click)
    Commit(f64),
}

impl SliderEvent {
    /// Value carried by the event
    pub fn value(self) -> f64 {
        match self {
            SliderEvent::Live(v) | SliderEvent::Commit(v) => v,
        }
    }

    /// Whether this is a commit
    pub fn is_commit(self) -> bool {
        matches!(self, SliderEvent::Commit(_))
    }
}

/// Draggable range control
#[derive(Debug, Clone, PartialEq)]
pub struct SeekSlider {
    value: f64,
    min: f64,
    max: f64,
    step: f64,
    dragging: bool,
}

impl SeekSlider {
    /// Create a slider resting at `min`
    ///
    /// Fails with `InvalidRange` unless `min < max`, both are finite, and
    /// `step` is finite and positive.
    pub fn new(min: f64, max: f64, step: f64) -> Result<Self> {
        let valid_step = step.is_finite() && step > 0.0;
        if !(min.is_finite() && max.is_finite() && max > min && valid_step) {
            return Err(PlaybackError::InvalidRange { min, max, step });
        }

        Ok(Self {
            value: min,
            min,
            max,
            step,
            dragging: false,
        })
    }

    // ===== External updates =====

    /// Mirror an external position into the slider
    ///
    /// Clamped into `[min, max]`. Ignored while dragging, and for NaN.
    pub fn set_value(&mut self, value: f64) {
        if self.dragging || value.is_nan() {
            return;
        }
        self.value = value.clamp(self.min, self.max);
    }

    /// Change the bounds at runtime (e.g. a new track's duration)
    ///
    /// Unlike construction, `min == max` is accepted here: a track whose
    /// duration is not known yet gets an empty range and a zero fill. The
    /// value is re-clamped even mid-drag to keep it within the bounds.
    pub fn set_range(&mut self, min: f64, max: f64) -> Result<()> {
        if !(min.is_finite() && max.is_finite() && max >= min) {
            return Err(PlaybackError::InvalidRange {
                min,
                max,
                step: self.step,
            });
        }

        self.min = min;
        self.max = max;
        self.value = self.value.clamp(min, max);
        Ok(())
    }

    // ===== Pointer input =====

    /// Pointer pressed on the track at `ratio` (0.0 = start, 1.0 = end)
    pub fn pointer_down(&mut self, ratio: f64) -> SliderEvent {
        self.dragging = true;
        self.value = self.value_at(ratio);
        SliderEvent::Live(self.value)
    }

    /// Pointer moved; only reports while dragging
    pub fn pointer_move(&mut self, ratio: f64) -> Option<SliderEvent> {
        if !self.dragging {
            return None;
        }
        self.value = self.value_at(ratio);
        Some(SliderEvent::Live(self.value))
    }

    /// Pointer released; commits if a drag was in progress
    pub fn pointer_up(&mut self) -> Option<SliderEvent> {
        if !self.dragging {
            return None;
        }
        self.dragging = false;
        Some(SliderEvent::Commit(self.value))
    }

    /// Click on the track: immediate commit at `ratio`
    ///
    /// Ends a drag if one was in progress.
    pub fn click(&mut self, ratio: f64) -> SliderEvent {
        self.dragging = false;
        self.value = self.value_at(ratio);
        SliderEvent::Commit(self.value)
    }

    /// Keyboard-style adjustment by whole steps; commits immediately
    pub fn nudge(&mut self, steps: i32) -> Option<SliderEvent> {
        if self.dragging {
            return None;
        }
        let target = self.value + f64::from(steps) * self.step;
        self.value = target.clamp(self.min, self.max);
        Some(SliderEvent::Commit(self.value))
    }

    // ===== Queries =====

    /// Value a pointer at `ratio` maps to, snapped to `step`
    pub fn value_at(&self, ratio: f64) -> f64 {
        let ratio = if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) };
        let raw = self.min + ratio * (self.max - self.min);
        let snapped = self.min + ((raw - self.min) / self.step).round() * self.step;
        snapped.clamp(self.min, self.max)
    }

    /// Rendered fill of the track, 0-100
    pub fn fill_percent(&self) -> f64 {
        fill_percent(self.value, self.min, self.max)
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn state(&self) -> SliderState {
        if self.dragging {
            SliderState::Dragging
        } else {
            SliderState::Idle
        }
    }
}

/// Percentage of the range covered by `value`
///
/// An empty range (`max == min`) fills 0 % rather than producing NaN.
pub fn fill_percent(value: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    if span <= 0.0 || !span.is_finite() {
        return 0.0;
    }
    (value - min) / span * 100.0
}

/// Convert a pointer offset within a track of `width` into a ratio
///
/// Zero-width tracks (not laid out yet) map to 0.
pub fn pointer_ratio(offset: f64, width: f64) -> f64 {
    if width <= 0.0 || !width.is_finite() {
        return 0.0;
    }
    (offset / width).clamp(0.0, 1.0)
}
