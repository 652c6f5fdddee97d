use crate::{
    dsp::modulate::block_average,
    graph::node::{GraphNode, Modulatable, RenderCtx},
    MAX_BLOCK_SIZE,
};

/// Drives one parameter of `source` from a modulation signal, once per block:
/// `param = base + average(modulator) × depth`.
///
/// The modulator can be an [`LfoNode`](crate::graph::lfo::LfoNode) (vibrato,
/// wobble) or an [`EnvNode`](crate::graph::envelope::EnvNode) (filter sweep,
/// pitch drop); it receives the same note gates as the source.
pub struct Modulate<S, M>
where
    S: GraphNode + Modulatable,
    M: GraphNode,
{
    source: S,
    modulator: M,
    param: S::Param,
    depth: f32,
    scratch: Vec<f32>,
}

impl<S, M> Modulate<S, M>
where
    S: GraphNode + Modulatable,
    M: GraphNode,
{
    pub fn new(source: S, modulator: M, param: S::Param, depth: f32) -> Self {
        Self {
            source,
            modulator,
            param,
            depth,
            scratch: vec![0.0; MAX_BLOCK_SIZE],
        }
    }
}

impl<S, M> GraphNode for Modulate<S, M>
where
    S: GraphNode + Modulatable,
    M: GraphNode,
{
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let frames = &mut self.scratch[..out.len()];
        self.modulator.render_block(frames, ctx);
        let amount = block_average(frames) * self.depth;

        let base = self.source.get_param(self.param);
        self.source.apply_modulation(self.param, base, amount);
        self.source.render_block(out, ctx);
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        self.source.note_on(ctx);
        self.modulator.note_on(ctx);
    }

    fn note_off(&mut self, ctx: &RenderCtx) {
        self.source.note_off(ctx);
        self.modulator.note_off(ctx);
    }

    fn get_envelope_level(&self) -> Option<f32> {
        self.source.get_envelope_level()
    }

    fn is_active(&self) -> bool {
        self.source.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{
        envelope::EnvNode,
        extensions::NodeExt,
        filter::FilterParam,
        filter::FilterNode,
        lfo::LfoNode,
        oscillator::{OscNode, OscParam},
    };

    #[test]
    fn huge_depth_stays_finite() {
        let mut node = OscNode::sawtooth()
            .through(FilterNode::lowpass(1000.0).modulate(
                LfoNode::square(1.0),
                FilterParam::Cutoff,
                100_000.0,
            ));
        let mut buffer = vec![0.0; 1024];
        node.render_block(&mut buffer, &RenderCtx::from_freq(48_000.0, 110.0, 1.0));
        assert!(buffer.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn envelope_drives_pitch_drop() {
        let ctx = RenderCtx::from_freq(48_000.0, 0.0, 1.0);
        let mut kick = OscNode::sine()
            .with_frequency(50.0)
            .modulate(EnvNode::decay(0.05), OscParam::Frequency, 100.0);
        kick.note_on(&ctx);

        let mut buffer = vec![0.0; 256];
        kick.render_block(&mut buffer, &ctx);
        assert!(buffer.iter().any(|s| s.abs() > 0.1));
        assert!(kick.is_active());
    }
}
