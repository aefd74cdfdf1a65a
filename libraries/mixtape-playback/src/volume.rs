//! Volume level with perceptual scaling
//!
//! The host media element takes a linear volume in [0, 1]. Sliders are
//! easier to use when their travel is spread over decibels instead, so the
//! 0-100 level is mapped onto -60 dB..0 dB before it is handed over.

/// Lowest audible level on the curve
const FLOOR_DB: f32 = -60.0;

/// Volume level and mute state
#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    /// Level (0-100)
    level: u8,

    /// Mute preserves the level
    muted: bool,
}

impl Volume {
    /// Create a volume at `level` (clamped to 100)
    pub fn new(level: u8) -> Self {
        Self {
            level: level.min(100),
            muted: false,
        }
    }

    /// Set level (0-100, clamped)
    pub fn set_level(&mut self, level: u8) {
        self.level = level.min(100);
    }

    /// Set level from a slider position, rounding to the nearest percent
    pub fn set_from_slider(&mut self, value: f64) {
        let level = if value.is_nan() { 0.0 } else { value.round().clamp(0.0, 100.0) };
        self.level = level as u8;
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn mute(&mut self) {
        self.muted = true;
    }

    pub fn unmute(&mut self) {
        self.muted = false;
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Linear gain for the host's `volume` property, in [0, 1]
    ///
    /// `10^(dB / 20)` with `dB = (level - 100) * 0.6`; level 0 and mute are
    /// true silence rather than the -60 dB floor.
    pub fn gain(&self) -> f32 {
        if self.muted || self.level == 0 {
            return 0.0;
        }
        10.0_f32.powf(self.db() / 20.0)
    }

    /// Level on the dB curve (floor when muted or at 0)
    pub fn db(&self) -> f32 {
        if self.muted || self.level == 0 {
            return FLOOR_DB;
        }
        (f32::from(self.level) - 100.0) * (-FLOOR_DB / 100.0)
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(80)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_is_clamped() {
        let mut vol = Volume::new(150);
        assert_eq!(vol.level(), 100);

        vol.set_level(42);
        assert_eq!(vol.level(), 42);
    }

    #[test]
    fn slider_values_round_to_percent() {
        let mut vol = Volume::default();

        vol.set_from_slider(33.6);
        assert_eq!(vol.level(), 34);

        vol.set_from_slider(250.0);
        assert_eq!(vol.level(), 100);

        vol.set_from_slider(-4.0);
        assert_eq!(vol.level(), 0);
    }

    #[test]
    fn mute_keeps_level() {
        let mut vol = Volume::new(70);

        vol.toggle_mute();
        assert!(vol.is_muted());
        assert_eq!(vol.gain(), 0.0);
        assert_eq!(vol.level(), 70);

        vol.unmute();
        assert!(vol.gain() > 0.0);
    }

    #[test]
    fn gain_follows_db_curve() {
        assert_eq!(Volume::new(0).gain(), 0.0);
        assert!((Volume::new(100).gain() - 1.0).abs() < 1e-6);
        // 50% = -30 dB
        assert!((Volume::new(50).gain() - 0.0316).abs() < 0.001);
        // 80% = -12 dB
        assert!((Volume::new(80).gain() - 0.251).abs() < 0.01);
    }

    #[test]
    fn gain_stays_in_host_range() {
        for level in 0..=100 {
            let gain = Volume::new(level).gain();
            assert!((0.0..=1.0).contains(&gain), "level {level} gave {gain}");
        }
    }

    #[test]
    fn db_floor_when_silent() {
        assert_eq!(Volume::new(0).db(), -60.0);
        let mut vol = Volume::new(90);
        vol.mute();
        assert_eq!(vol.db(), -60.0);
        assert!((Volume::new(90).db() + 6.0).abs() < 1e-4);
    }
}
