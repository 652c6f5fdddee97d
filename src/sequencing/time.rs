//! Musical time in a fixed 4/4 grid of 16th-note steps.
//!
//! ```text
//! bar  = 4 beats  = 16 steps
//! beat = 60 / bpm seconds
//! step = beat / 4
//! ```

use log::warn;

pub const BEATS_PER_BAR: u32 = 4;
pub const STEPS_PER_BEAT: u32 = 4;
pub const STEPS_PER_BAR: u32 = BEATS_PER_BAR * STEPS_PER_BEAT;

#[inline]
pub fn seconds_per_beat(bpm: f64) -> f64 {
    60.0 / bpm
}

#[inline]
pub fn seconds_per_bar(bpm: f64) -> f64 {
    seconds_per_beat(bpm) * BEATS_PER_BAR as f64
}

#[inline]
pub fn seconds_per_step(bpm: f64) -> f64 {
    seconds_per_beat(bpm) / STEPS_PER_BEAT as f64
}

/// Clamp a host-supplied tempo to something the scheduler can divide by.
pub fn sanitize_bpm(bpm: f64, min_bpm: f64) -> f64 {
    if bpm.is_finite() && bpm >= min_bpm {
        bpm
    } else {
        warn!("tempo {bpm} is not usable, clamping to {min_bpm} bpm");
        min_bpm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tempo_law() {
        for bpm in [60.0, 90.0, 120.0, 174.0] {
            assert!((seconds_per_bar(bpm) - 60.0 / bpm * 4.0).abs() < 1e-12);
            assert!((seconds_per_step(bpm) * 16.0 - seconds_per_bar(bpm)).abs() < 1e-12);
        }
        assert_eq!(seconds_per_step(120.0), 0.125);
    }

    #[test]
    fn unusable_tempos_clamp_to_floor() {
        assert_eq!(sanitize_bpm(0.0, 1.0), 1.0);
        assert_eq!(sanitize_bpm(-20.0, 1.0), 1.0);
        assert_eq!(sanitize_bpm(f64::NAN, 1.0), 1.0);
        assert_eq!(sanitize_bpm(f64::INFINITY, 1.0), 1.0);
        assert_eq!(sanitize_bpm(128.0, 1.0), 128.0);
    }
}
