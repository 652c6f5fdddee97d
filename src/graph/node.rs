use crate::sequencing::pitch::midi_to_frequency;

/// What a node is asked to render.
///
/// - `sample_rate`: output rate in Hz
/// - `frequency`: pitch of the voice in Hz (ignored by fixed-pitch nodes)
/// - `velocity`: event loudness, 0.0..=1.0
/// - `time`: renderer clock at the start of the block, in seconds
#[derive(Debug, Clone, Copy)]
pub struct RenderCtx {
    pub sample_rate: f32,
    pub frequency: f32,
    pub velocity: f32,
    pub time: f64,
}

impl RenderCtx {
    pub fn from_note(sample_rate: f32, note: u8, velocity: f32) -> Self {
        Self::from_freq(sample_rate, midi_to_frequency(note), velocity)
    }

    pub fn from_freq(sample_rate: f32, frequency: f32, velocity: f32) -> Self {
        Self {
            sample_rate,
            frequency,
            velocity,
            time: 0.0,
        }
    }

    pub fn at(self, time: f64) -> Self {
        Self { time, ..self }
    }
}

/// Nodes whose parameters can be driven by a modulation source.
///
/// `get_param` returns the unmodulated base value; `apply_modulation` sets the
/// effective value for the next block without touching the base, so repeated
/// modulation never drifts.
pub trait Modulatable: Send {
    type Param: Copy + Send;

    fn get_param(&self, param: Self::Param) -> f32;

    fn apply_modulation(&mut self, param: Self::Param, base: f32, modulation: f32);
}

/// A block-rendering audio node that reacts to note gates.
pub trait GraphNode: Send {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx);

    fn note_on(&mut self, _ctx: &RenderCtx) {}

    fn note_off(&mut self, _ctx: &RenderCtx) {}

    fn get_envelope_level(&self) -> Option<f32> {
        None
    }

    /// Whether the node still produces sound. Sources without an envelope
    /// never go quiet on their own.
    fn is_active(&self) -> bool {
        true
    }
}

impl GraphNode for Box<dyn GraphNode> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        (**self).render_block(out, ctx)
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        (**self).note_on(ctx)
    }

    fn note_off(&mut self, ctx: &RenderCtx) {
        (**self).note_off(ctx)
    }

    fn get_envelope_level(&self) -> Option<f32> {
        (**self).get_envelope_level()
    }

    fn is_active(&self) -> bool {
        (**self).is_active()
    }
}
