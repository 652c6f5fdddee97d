//! Engine and device configuration.
//!
//! Both structs are plain data with sensible defaults and builder-style
//! setters, so hosts only spell out what they change:
//!
//! ```
//! use std::time::Duration;
//! use stemseq::EngineConfig;
//!
//! let config = EngineConfig::default()
//!     .bpm(98.0)
//!     .schedule_ahead(0.12)
//!     .tick_interval(Duration::from_millis(20));
//! assert_eq!(config.initial_bpm, 98.0);
//! ```

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Lookahead window in seconds. Steps due before `now + schedule_ahead`
    /// are committed to the device on each tick.
    pub schedule_ahead: f64,
    /// How often the [`Player`](crate::Player) timer invokes the scheduler.
    pub tick_interval: Duration,
    /// Upper bound on steps committed by a single tick. A tick that would
    /// exceed it resynchronises to the device clock instead.
    pub max_steps_per_tick: usize,
    /// Tempo floor; non-positive or non-finite tempos clamp to this.
    pub min_bpm: f64,
    /// Tempo used until the host calls `set_bpm`.
    pub initial_bpm: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            schedule_ahead: 0.1,
            tick_interval: Duration::from_millis(25),
            max_steps_per_tick: 256,
            min_bpm: 1.0,
            initial_bpm: 120.0,
        }
    }
}

impl EngineConfig {
    pub fn schedule_ahead(mut self, seconds: f64) -> Self {
        self.schedule_ahead = seconds.max(0.0);
        self
    }

    pub fn tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn max_steps_per_tick(mut self, steps: usize) -> Self {
        self.max_steps_per_tick = steps.max(1);
        self
    }

    pub fn min_bpm(mut self, bpm: f64) -> Self {
        if bpm.is_finite() && bpm > 0.0 {
            self.min_bpm = bpm;
        }
        self
    }

    pub fn bpm(mut self, bpm: f64) -> Self {
        self.initial_bpm = bpm;
        self
    }
}

#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// Capacity of the control → audio command queue (cpal backend).
    pub command_capacity: usize,
    /// Sample rate used by [`OfflineDevice`](crate::OfflineDevice).
    pub sample_rate: f32,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            command_capacity: 1024,
            sample_rate: 48_000.0,
        }
    }
}

impl DeviceConfig {
    pub fn command_capacity(mut self, capacity: usize) -> Self {
        self.command_capacity = capacity.max(1);
        self
    }

    pub fn sample_rate(mut self, sample_rate: f32) -> Self {
        self.sample_rate = sample_rate;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_lookahead_design() {
        let config = EngineConfig::default();
        assert_eq!(config.schedule_ahead, 0.1);
        assert_eq!(config.tick_interval, Duration::from_millis(25));
        assert_eq!(config.initial_bpm, 120.0);
    }

    #[test]
    fn invalid_min_bpm_is_ignored() {
        let config = EngineConfig::default().min_bpm(-3.0).min_bpm(f64::NAN);
        assert_eq!(config.min_bpm, 1.0);
    }

    #[test]
    fn zero_capacity_is_raised() {
        assert_eq!(DeviceConfig::default().command_capacity(0).command_capacity, 1);
    }
}
