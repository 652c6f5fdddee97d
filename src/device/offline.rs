use log::{trace, warn};

use super::AudioDevice;
use crate::{
    config::DeviceConfig,
    error::DeviceError,
    render::{Renderer, ScheduledVoice},
};

/// A device whose clock only moves when it renders.
///
/// Tests drive it in lockstep with the engine tick; the bounce command renders
/// a whole arrangement to a buffer with it.
pub struct OfflineDevice {
    renderer: Renderer,
    available: bool,
    scheduled: Vec<(f64, usize)>,
}

impl OfflineDevice {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            renderer: Renderer::new(sample_rate),
            available: true,
            scheduled: Vec::new(),
        }
    }

    pub fn from_config(config: &DeviceConfig) -> Self {
        Self::new(config.sample_rate)
    }

    /// Render `frames` mono samples and advance the clock.
    pub fn render(&mut self, frames: usize) -> Vec<f32> {
        let mut out = vec![0.0; frames];
        self.render_into(&mut out);
        out
    }

    pub fn render_into(&mut self, out: &mut [f32]) {
        self.renderer.process_block(out);
    }

    /// Render until the clock reaches `seconds`.
    pub fn render_until(&mut self, seconds: f64) -> Vec<f32> {
        let target = (seconds.max(0.0) * self.renderer.sample_rate() as f64).round() as u64;
        let frames = target.saturating_sub(self.renderer.frame()) as usize;
        self.render(frames)
    }

    /// Make `resume` fail from now on, as a device that went away would.
    pub fn disconnect(&mut self) {
        self.available = false;
    }

    /// Start time and track of every voice handed over so far.
    pub fn scheduled(&self) -> &[(f64, usize)] {
        &self.scheduled
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }
}

impl AudioDevice for OfflineDevice {
    fn now(&self) -> f64 {
        self.renderer.now()
    }

    fn sample_rate(&self) -> f32 {
        self.renderer.sample_rate()
    }

    fn resume(&mut self) -> Result<(), DeviceError> {
        if self.available {
            Ok(())
        } else {
            Err(DeviceError::Suspended)
        }
    }

    fn schedule(&mut self, voice: ScheduledVoice) {
        trace!("offline voice at {:.4}s on track {}", voice.start(), voice.track());
        self.scheduled.push((voice.start(), voice.track()));
        if let Err(voice) = self.renderer.schedule(voice) {
            warn!("voice pool full, dropping voice at {:.3}s on track {}", voice.start(), voice.track());
        }
    }

    fn set_track_gain(&mut self, track: usize, gain: f32) {
        self.renderer.set_track_gain(track, gain);
    }
}
