use std::fmt;

use crate::{
    dsp::amplify::accumulate,
    graph::node::{GraphNode, RenderCtx},
};

/// Where a voice is mixed and how loud.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Destination {
    pub track: usize,
    pub gain: f32,
}

/// A self-terminating sound handed to a device.
///
/// Times are absolute seconds on the device clock. The device starts the node
/// at `start`, sends it a note-off at `gate_off` (if any) and drops it at
/// `stop` at the latest.
pub struct ScheduledVoice {
    node: Box<dyn GraphNode>,
    frequency: f32,
    start: f64,
    gate_off: Option<f64>,
    stop: f64,
    destination: Destination,
}

impl ScheduledVoice {
    pub fn new(
        node: Box<dyn GraphNode>,
        frequency: f32,
        start: f64,
        stop: f64,
        destination: Destination,
    ) -> Self {
        Self {
            node,
            frequency,
            start,
            gate_off: None,
            stop: stop.max(start),
            destination,
        }
    }

    pub fn with_gate_off(mut self, time: f64) -> Self {
        self.gate_off = Some(time.clamp(self.start, self.stop));
        self
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Give up the synthesis graph, e.g. to free it off the audio thread.
    pub fn into_node(self) -> Box<dyn GraphNode> {
        self.node
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn gate_off(&self) -> Option<f64> {
        self.gate_off
    }

    pub fn stop(&self) -> f64 {
        self.stop
    }

    pub fn track(&self) -> usize {
        self.destination.track
    }

    pub fn gain(&self) -> f32 {
        self.destination.gain
    }
}

impl fmt::Debug for ScheduledVoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScheduledVoice")
            .field("frequency", &self.frequency)
            .field("start", &self.start)
            .field("gate_off", &self.gate_off)
            .field("stop", &self.stop)
            .field("destination", &self.destination)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Pending,
    Sounding,
    Releasing,
    Finished,
}

/// Device-side playback of a [`ScheduledVoice`] at frame resolution.
pub struct Voice {
    node: Box<dyn GraphNode>,
    frequency: f32,
    start_frame: u64,
    gate_frame: Option<u64>,
    stop_frame: u64,
    track: usize,
    gain: f32,
    state: VoiceState,
}

fn to_frame(seconds: f64, sample_rate: f32) -> u64 {
    (seconds.max(0.0) * sample_rate as f64).round() as u64
}

impl Voice {
    pub fn new(scheduled: ScheduledVoice, sample_rate: f32) -> Self {
        Self {
            node: scheduled.node,
            frequency: scheduled.frequency,
            start_frame: to_frame(scheduled.start, sample_rate),
            gate_frame: scheduled.gate_off.map(|t| to_frame(t, sample_rate)),
            stop_frame: to_frame(scheduled.stop, sample_rate),
            track: scheduled.destination.track,
            gain: scheduled.destination.gain,
            state: VoiceState::Pending,
        }
    }

    pub fn track(&self) -> usize {
        self.track
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == VoiceState::Finished
    }

    pub fn into_node(self) -> Box<dyn GraphNode> {
        self.node
    }

    /// Add this voice's output for frames `[block_start, block_start + out.len())`
    /// into `out`. `scratch` must be at least as long as `out`.
    pub fn render(&mut self, block_start: u64, out: &mut [f32], scratch: &mut [f32], sample_rate: f32) {
        let block_end = block_start + out.len() as u64;
        if self.state == VoiceState::Finished || self.start_frame >= block_end {
            return;
        }
        if self.stop_frame <= block_start.max(self.start_frame) {
            self.state = VoiceState::Finished;
            return;
        }

        let from = self.start_frame.max(block_start);
        let to = self.stop_frame.min(block_end);
        let time = from as f64 / sample_rate as f64;
        let ctx = RenderCtx::from_freq(sample_rate, self.frequency, 1.0).at(time);

        if self.state == VoiceState::Pending {
            self.node.note_on(&ctx);
            self.state = VoiceState::Sounding;
        }

        let mut cursor = from;
        if let Some(gate) = self.gate_frame {
            if self.state == VoiceState::Sounding && gate < to {
                let split = gate.max(cursor);
                self.render_segment(cursor, split, block_start, out, scratch, &ctx);
                self.node.note_off(&ctx);
                self.state = VoiceState::Releasing;
                cursor = split;
            }
        }
        self.render_segment(cursor, to, block_start, out, scratch, &ctx);

        let one_shot = self.gate_frame.is_none();
        if to >= self.stop_frame
            || ((self.state == VoiceState::Releasing || one_shot) && !self.node.is_active())
        {
            self.state = VoiceState::Finished;
        }
    }

    fn render_segment(
        &mut self,
        from: u64,
        to: u64,
        block_start: u64,
        out: &mut [f32],
        scratch: &mut [f32],
        ctx: &RenderCtx,
    ) {
        if to <= from {
            return;
        }
        let a = (from - block_start) as usize;
        let b = (to - block_start) as usize;
        let frames = &mut scratch[..b - a];
        self.node.render_block(frames, ctx);
        accumulate(&mut out[a..b], frames, self.gain);
    }
}
