//! Audio output devices.
//!
//! The engine talks to a device through [`AudioDevice`]: read its clock,
//! resume it, hand over voices, and set persistent track gains. Rendering
//! happens on the device side in a [`Renderer`](crate::render::Renderer).
//!
//! - [`OfflineDevice`] owns its renderer and only advances when asked to
//!   render. Used for tests and bounces.
//! - [`CpalDevice`] runs the renderer inside a cpal output callback and feeds
//!   it over a lock-free command queue.

mod cpal_backend;
mod offline;

pub use cpal_backend::{open, CpalDevice, OutputStream};
pub use offline::OfflineDevice;

use crate::{error::DeviceError, render::ScheduledVoice};

/// Control → audio thread messages.
#[derive(Debug)]
pub enum DeviceCommand {
    Schedule(ScheduledVoice),
    SetTrackGain { track: usize, gain: f32 },
}

pub trait AudioDevice {
    /// Monotonic device clock in seconds.
    fn now(&self) -> f64;

    fn sample_rate(&self) -> f32;

    /// Make sure the device is running before scheduling against its clock.
    fn resume(&mut self) -> Result<(), DeviceError>;

    /// Fire-and-forget hand-off of one voice.
    fn schedule(&mut self, voice: ScheduledVoice);

    /// Persistent gain stage of a track bus; applies to sounding voices.
    fn set_track_gain(&mut self, track: usize, gain: f32);
}
