use crate::{
    graph::node::GraphNode,
    render::{
        mixer::MixBus,
        voice::{ScheduledVoice, Voice},
    },
    MAX_BLOCK_SIZE,
};

/// Voices one renderer holds at once, pending ones included.
pub const VOICE_CAPACITY: usize = 256;

/// Device-side voice pool.
///
/// Owns a sample clock, the voices scheduled against it and the mix bus.
/// Runs inside the audio callback (cpal) or directly in the caller's thread
/// (offline). It never blocks and never allocates after construction: the
/// pool is capped at [`VOICE_CAPACITY`] and finished graphs are handed to a
/// retire callback so the caller decides where they are freed.
pub struct Renderer {
    sample_rate: f32,
    frame: u64,
    voices: Vec<Voice>,
    mix: MixBus,
    scratch: Vec<f32>,
}

impl Renderer {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            frame: 0,
            voices: Vec::with_capacity(VOICE_CAPACITY),
            mix: MixBus::new(sample_rate),
            scratch: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Frames rendered so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Clock in seconds: the time of the next frame to be rendered.
    pub fn now(&self) -> f64 {
        self.frame as f64 / self.sample_rate as f64
    }

    /// Add a voice to the pool. A full pool hands the voice back.
    pub fn schedule(&mut self, voice: ScheduledVoice) -> Result<(), ScheduledVoice> {
        if self.voices.len() >= VOICE_CAPACITY {
            return Err(voice);
        }
        self.voices.push(Voice::new(voice, self.sample_rate));
        Ok(())
    }

    pub fn set_track_gain(&mut self, track: usize, gain: f32) {
        self.mix.set_track_gain(track, gain);
    }

    pub fn track_gain(&self, track: usize) -> Option<f32> {
        self.mix.track_gain(track)
    }

    /// Voices scheduled and not yet finished, including ones still pending.
    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    pub fn peak(&self) -> f32 {
        self.mix.peak()
    }

    /// Render mono output and advance the clock by `out.len()` frames.
    /// Finished voices are dropped in place.
    pub fn process_block(&mut self, out: &mut [f32]) {
        self.process_block_with(out, drop);
    }

    /// Like [`process_block`](Self::process_block), passing the graph of
    /// every voice that finished to `retire`.
    pub fn process_block_with<F>(&mut self, out: &mut [f32], mut retire: F)
    where
        F: FnMut(Box<dyn GraphNode>),
    {
        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            self.render_chunk(chunk, &mut retire);
        }
    }

    fn render_chunk<F>(&mut self, out: &mut [f32], retire: &mut F)
    where
        F: FnMut(Box<dyn GraphNode>),
    {
        let len = out.len();
        self.mix.begin(len);

        let scratch = &mut self.scratch[..len];
        for voice in &mut self.voices {
            let buffer = self.mix.track_buffer(voice.track(), len);
            voice.render(self.frame, buffer, scratch, self.sample_rate);
        }

        let mut i = 0;
        while i < self.voices.len() {
            if self.voices[i].is_finished() {
                retire(self.voices.swap_remove(i).into_node());
            } else {
                i += 1;
            }
        }

        self.mix.finish(out);
        self.frame += len as u64;
    }
}
