//! Read-only snapshots for the rendering layer

use crate::navigator::Navigator;
use crate::slider::SeekSlider;
use crate::types::TrackId;
use serde::Serialize;
use std::time::Duration;

/// One row of the song list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackEntry {
    pub id: TrackId,
    pub name: String,
    /// `M:SS`, `H:MM:SS`, or `--:--` when unknown
    pub duration_label: String,
    pub is_current: bool,
}

/// Song list in active order plus transport flags
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaylistSnapshot {
    pub entries: Vec<TrackEntry>,
    pub current_index: Option<usize>,
    pub shuffle: bool,
    pub repeat: bool,
    pub playing: bool,
}

impl PlaylistSnapshot {
    pub fn capture<M>(navigator: &Navigator<M>, playing: bool) -> Self {
        let current_index = navigator.current_index();
        let entries = navigator
            .active_order()
            .into_iter()
            .enumerate()
            .map(|(index, track)| TrackEntry {
                id: track.id,
                name: track.name.clone(),
                duration_label: track
                    .duration
                    .map_or_else(|| "--:--".to_string(), format_duration),
                is_current: current_index == Some(index),
            })
            .collect();

        Self {
            entries,
            current_index,
            shuffle: navigator.is_shuffled(),
            repeat: navigator.is_repeat(),
            playing,
        }
    }
}

/// Slider geometry for drawing the thumb and fill
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SliderSnapshot {
    pub value: f64,
    pub min: f64,
    pub max: f64,
    /// Fill percentage, 0-100, never NaN
    pub filled: f64,
    pub dragging: bool,
}

impl From<&SeekSlider> for SliderSnapshot {
    fn from(slider: &SeekSlider) -> Self {
        Self {
            value: slider.value(),
            min: slider.min(),
            max: slider.max(),
            filled: slider.fill_percent(),
            dragging: slider.is_dragging(),
        }
    }
}

/// Formats a Duration as "M:SS" or "H:MM:SS".
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Track;

    #[test]
    fn formats_minutes_and_hours() {
        assert_eq!(format_duration(Duration::ZERO), "0:00");
        assert_eq!(format_duration(Duration::from_secs(65)), "1:05");
        assert_eq!(format_duration(Duration::from_millis(59_999)), "0:59");
        assert_eq!(format_duration(Duration::from_secs(3_725)), "1:02:05");
    }

    #[test]
    fn snapshot_marks_current_entry() {
        let mut nav = Navigator::new();
        nav.add_tracks(vec![
            Track::new(TrackId::new(1), "a.ogg", ()).with_duration(Duration::from_secs(125)),
            Track::new(TrackId::new(2), "b.ogg", ()),
        ]);
        nav.next().unwrap();

        let snapshot = PlaylistSnapshot::capture(&nav, true);

        assert_eq!(snapshot.current_index, Some(1));
        assert!(snapshot.playing);
        assert_eq!(snapshot.entries[0].duration_label, "2:05");
        assert_eq!(snapshot.entries[1].duration_label, "--:--");
        assert!(!snapshot.entries[0].is_current);
        assert!(snapshot.entries[1].is_current);
    }

    #[test]
    fn slider_snapshot_copies_geometry() {
        let mut slider = SeekSlider::new(0.0, 40.0, 1.0).unwrap();
        slider.set_value(10.0);

        let snapshot = SliderSnapshot::from(&slider);

        assert_eq!(snapshot.value, 10.0);
        assert_eq!(snapshot.max, 40.0);
        assert_eq!(snapshot.filled, 25.0);
        assert!(!snapshot.dragging);
    }
}
