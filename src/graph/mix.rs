use crate::{
    graph::node::{GraphNode, RenderCtx},
    MAX_BLOCK_SIZE,
};

/*
Linear crossfade of two sources rendered in parallel:

  out = a · (1 − balance) + b · balance

0.0 is all A, 1.0 is all B. Both sides receive the note gates, so gate the
mix with an envelope after mixing rather than before.
*/

pub struct Mix<A, B> {
    source_a: A,
    source_b: B,
    balance: f32,
    scratch: Vec<f32>,
}

impl<A, B> Mix<A, B> {
    pub fn new(source_a: A, source_b: B, balance: f32) -> Self {
        Self {
            source_a,
            source_b,
            balance: balance.clamp(0.0, 1.0),
            scratch: vec![0.0; MAX_BLOCK_SIZE],
        }
    }
}

impl<A: GraphNode, B: GraphNode> GraphNode for Mix<A, B> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.source_a.render_block(out, ctx);

        let frames = &mut self.scratch[..out.len()];
        self.source_b.render_block(frames, ctx);

        let weight_a = 1.0 - self.balance;
        let weight_b = self.balance;
        for (o, b) in out.iter_mut().zip(frames.iter()) {
            *o = *o * weight_a + *b * weight_b;
        }
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        self.source_a.note_on(ctx);
        self.source_b.note_on(ctx);
    }

    fn note_off(&mut self, ctx: &RenderCtx) {
        self.source_a.note_off(ctx);
        self.source_b.note_off(ctx);
    }

    fn is_active(&self) -> bool {
        self.source_a.is_active() || self.source_b.is_active()
    }

    fn get_envelope_level(&self) -> Option<f32> {
        match (
            self.source_a.get_envelope_level(),
            self.source_b.get_envelope_level(),
        ) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (level, None) | (None, level) => level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{extensions::NodeExt, oscillator::OscNode};

    fn render<N: GraphNode>(mut node: N) -> Vec<f32> {
        let mut buffer = vec![0.0; 8];
        node.render_block(&mut buffer, &RenderCtx::from_freq(8.0, 1.0, 1.0));
        buffer
    }

    #[test]
    fn balance_extremes_select_one_source() {
        let saw = render(OscNode::sawtooth());
        let square = render(OscNode::square());
        assert_eq!(render(OscNode::sawtooth().mix(OscNode::square(), 0.0)), saw);
        assert_eq!(render(OscNode::sawtooth().mix(OscNode::square(), 1.0)), square);
    }

    #[test]
    fn half_balance_averages() {
        let mixed = render(OscNode::square().mix(OscNode::square(), 0.5));
        assert_eq!(mixed, render(OscNode::square()));
    }
}
