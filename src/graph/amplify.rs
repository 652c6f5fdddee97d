use crate::{
    dsp::amplify::{apply_gain, multiply_in_place},
    graph::node::{GraphNode, RenderCtx},
    MAX_BLOCK_SIZE,
};

/// `signal × modulator`, sample by sample. With an envelope as modulator this
/// is the amplitude stage of a voice, and the envelope decides when the voice
/// has gone quiet.
pub struct Amplify<N, M> {
    signal: N,
    modulator: M,
    scratch: Vec<f32>,
}

impl<N, M> Amplify<N, M> {
    pub fn new(signal: N, modulator: M) -> Self {
        Self {
            signal,
            modulator,
            scratch: vec![0.0; MAX_BLOCK_SIZE],
        }
    }
}

impl<N: GraphNode, M: GraphNode> GraphNode for Amplify<N, M> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.signal.render_block(out, ctx);

        let frames = &mut self.scratch[..out.len()];
        self.modulator.render_block(frames, ctx);
        multiply_in_place(out, frames);
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        self.signal.note_on(ctx);
        self.modulator.note_on(ctx);
    }

    fn note_off(&mut self, ctx: &RenderCtx) {
        self.signal.note_off(ctx);
        self.modulator.note_off(ctx);
    }

    fn get_envelope_level(&self) -> Option<f32> {
        self.modulator
            .get_envelope_level()
            .or_else(|| self.signal.get_envelope_level())
    }

    fn is_active(&self) -> bool {
        self.modulator.is_active() && self.signal.is_active()
    }
}

/// Constant gain stage.
pub struct Gain<N> {
    node: N,
    gain: f32,
}

impl<N> Gain<N> {
    pub fn new(node: N, gain: f32) -> Self {
        Self { node, gain }
    }
}

impl<N: GraphNode> GraphNode for Gain<N> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.node.render_block(out, ctx);
        apply_gain(out, self.gain);
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        self.node.note_on(ctx);
    }

    fn note_off(&mut self, ctx: &RenderCtx) {
        self.node.note_off(ctx);
    }

    fn get_envelope_level(&self) -> Option<f32> {
        self.node.get_envelope_level()
    }

    fn is_active(&self) -> bool {
        self.node.is_active()
    }
}
