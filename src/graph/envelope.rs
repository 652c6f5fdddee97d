use crate::{
    dsp::envelope::{DecayEnvelope, Envelope},
    graph::node::{GraphNode, RenderCtx},
};

enum Shape {
    Adsr(Envelope),
    Decay(DecayEnvelope),
}

/// Envelope generator as a graph node; usually the modulator of an
/// [`Amplify`](crate::graph::amplify::Amplify).
pub struct EnvNode {
    shape: Shape,
}

impl EnvNode {
    pub fn adsr(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            shape: Shape::Adsr(Envelope::adsr(attack, decay, sustain, release)),
        }
    }

    /// One-shot exponential decay; ignores note-off.
    pub fn decay(seconds: f32) -> Self {
        Self {
            shape: Shape::Decay(DecayEnvelope::new(seconds)),
        }
    }

    pub fn release_time(&self) -> f32 {
        match &self.shape {
            Shape::Adsr(env) => env.release_time(),
            Shape::Decay(env) => env.decay_time(),
        }
    }
}

impl GraphNode for EnvNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        match &mut self.shape {
            Shape::Adsr(env) => env.render(out, ctx),
            Shape::Decay(env) => env.render(out, ctx),
        }
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        match &mut self.shape {
            Shape::Adsr(env) => env.note_on(ctx),
            Shape::Decay(env) => env.note_on(ctx),
        }
    }

    fn note_off(&mut self, ctx: &RenderCtx) {
        if let Shape::Adsr(env) = &mut self.shape {
            env.note_off(ctx);
        }
    }

    fn get_envelope_level(&self) -> Option<f32> {
        Some(match &self.shape {
            Shape::Adsr(env) => env.level(),
            Shape::Decay(env) => env.level(),
        })
    }

    fn is_active(&self) -> bool {
        match &self.shape {
            Shape::Adsr(env) => env.is_active(),
            Shape::Decay(env) => env.is_active(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decay_node_ignores_note_off() {
        let ctx = RenderCtx::from_freq(1_000.0, 0.0, 1.0);
        let mut env = EnvNode::decay(0.5);
        env.note_on(&ctx);
        env.note_off(&ctx);
        let mut buffer = vec![0.0; 10];
        env.render_block(&mut buffer, &ctx);
        assert_eq!(buffer[0], 1.0);
        assert!(env.is_active());
    }

    #[test]
    fn adsr_node_reports_level() {
        let ctx = RenderCtx::from_freq(1_000.0, 0.0, 1.0);
        let mut env = EnvNode::adsr(0.01, 0.01, 0.5, 0.01);
        assert_eq!(env.get_envelope_level(), Some(0.0));
        env.note_on(&ctx);
        let mut buffer = vec![0.0; 5];
        env.render_block(&mut buffer, &ctx);
        assert!(env.get_envelope_level().unwrap_or_default() > 0.0);
    }
}
