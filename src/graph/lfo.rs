use crate::{
    dsp::oscillator::OscillatorBlock,
    graph::node::{GraphNode, RenderCtx},
};

/// Sub-audio oscillator for modulation. Runs at its own rate regardless of
/// the voice pitch and outputs a bipolar signal in [-1, 1]. Vibrato sits
/// around 5-7 Hz; filter sweeps are slower.
pub struct LfoNode {
    osc: OscillatorBlock,
    frequency: f32,
}

impl LfoNode {
    pub fn sine(frequency: f32) -> Self {
        Self {
            osc: OscillatorBlock::sine(),
            frequency,
        }
    }

    pub fn triangle(frequency: f32) -> Self {
        Self {
            osc: OscillatorBlock::triangle(),
            frequency,
        }
    }

    pub fn square(frequency: f32) -> Self {
        Self {
            osc: OscillatorBlock::square(),
            frequency,
        }
    }
}

impl GraphNode for LfoNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let lfo_ctx = RenderCtx {
            frequency: self.frequency,
            ..*ctx
        };
        self.osc.render(out, &lfo_ctx);
    }

    fn note_on(&mut self, _ctx: &RenderCtx) {
        self.osc.reset();
    }
}
