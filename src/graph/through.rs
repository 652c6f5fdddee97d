use crate::graph::node::{GraphNode, RenderCtx};

/// Serial chain: render `source`, then process the block in place with
/// `effect` (oscillator → filter).
pub struct Through<S, F> {
    source: S,
    effect: F,
}

impl<S, F> Through<S, F> {
    pub fn new(source: S, effect: F) -> Self {
        Self { source, effect }
    }
}

impl<S: GraphNode, F: GraphNode> GraphNode for Through<S, F> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.source.render_block(out, ctx);
        self.effect.render_block(out, ctx);
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        self.source.note_on(ctx);
        self.effect.note_on(ctx);
    }

    fn note_off(&mut self, ctx: &RenderCtx) {
        self.source.note_off(ctx);
        self.effect.note_off(ctx);
    }

    fn get_envelope_level(&self) -> Option<f32> {
        self.source.get_envelope_level()
    }

    fn is_active(&self) -> bool {
        self.source.is_active()
    }
}
