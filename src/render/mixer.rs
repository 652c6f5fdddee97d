/*
Mix bus
=======

  voice × event gain ─┐
  voice × event gain ─┼─► track buffer × track gain ─┐
                      │                              ├─► Σ × master (0.8) ─► limiter ─► out
  voice × event gain ─┴─► track buffer × track gain ─┘

Track gains persist across voices: changing one affects every voice already
sounding on that track from the next block on.

All `MAX_TRACKS` track buffers are allocated up front, so the bus never
allocates on the audio thread. Voices on a track past the limit render into a
scratch buffer that is never mixed.
*/

use crate::{
    dsp::{
        amplify::{accumulate, apply_gain},
        limiter::Limiter,
    },
    MAX_BLOCK_SIZE,
};

pub const MASTER_GAIN: f32 = 0.8;

/// Track buses available on one mix bus.
pub const MAX_TRACKS: usize = 64;

struct Channel {
    gain: f32,
    buffer: Vec<f32>,
}

impl Channel {
    fn new(gain: f32) -> Self {
        Self {
            gain,
            buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }
}

pub struct MixBus {
    channels: Vec<Channel>,
    /// Channels touched so far; only these are cleared and summed.
    used: usize,
    discard: Vec<f32>,
    master_gain: f32,
    limiter: Limiter,
    peak: f32,
}

impl MixBus {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            channels: (0..MAX_TRACKS).map(|_| Channel::new(1.0)).collect(),
            used: 0,
            discard: vec![0.0; MAX_BLOCK_SIZE],
            master_gain: MASTER_GAIN,
            limiter: Limiter::new(sample_rate),
            peak: 0.0,
        }
    }

    fn channel(&mut self, track: usize) -> Option<&mut Channel> {
        let channel = self.channels.get_mut(track)?;
        self.used = self.used.max(track + 1);
        Some(channel)
    }

    /// Tracks past `MAX_TRACKS` are ignored.
    pub fn set_track_gain(&mut self, track: usize, gain: f32) {
        if let Some(channel) = self.channel(track) {
            channel.gain = if gain.is_finite() { gain.max(0.0) } else { 0.0 };
        }
    }

    pub fn track_gain(&self, track: usize) -> Option<f32> {
        self.channels[..self.used].get(track).map(|c| c.gain)
    }

    pub fn track_count(&self) -> usize {
        self.used
    }

    /// Zero the first `len` frames of every track buffer in use.
    pub fn begin(&mut self, len: usize) {
        for channel in &mut self.channels[..self.used] {
            channel.buffer[..len].fill(0.0);
        }
    }

    /// Track buffer voices on `track` accumulate into.
    pub fn track_buffer(&mut self, track: usize, len: usize) -> &mut [f32] {
        if track < self.channels.len() {
            self.used = self.used.max(track + 1);
            &mut self.channels[track].buffer[..len]
        } else {
            &mut self.discard[..len]
        }
    }

    /// Sum tracks into `out`, apply the master gain and limit.
    pub fn finish(&mut self, out: &mut [f32]) {
        let len = out.len();
        out.fill(0.0);
        for channel in &self.channels[..self.used] {
            accumulate(out, &channel.buffer[..len], channel.gain);
        }
        apply_gain(out, self.master_gain);
        self.limiter.process(out);
        self.peak = out.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
    }

    /// Peak of the last finished block, after limiting.
    pub fn peak(&self) -> f32 {
        self.peak
    }
}
