use crate::dsp::modulate::cents_to_ratio;
use crate::dsp::oscillator::OscillatorBlock;
use crate::graph::node::{GraphNode, Modulatable, RenderCtx};

/*
Audio oscillator node
=====================

Wraps an `OscillatorBlock` and decides which frequency it runs at:

  fixed     `with_frequency(hz)`: ignores the voice pitch (drum bodies)
  tracking  default: follows `ctx.frequency`

Detune is in cents on top of either. Both frequency and detune can be
modulated; modulation is stored as an offset next to the base value so the
base never moves.

  // two saws ±7 cents apart, the classic pad spread
  OscNode::sawtooth().with_detune(-7.0)
      .mix(OscNode::sawtooth().with_detune(7.0), 0.5)
*/

pub struct OscNode {
    osc: OscillatorBlock,
    base_frequency: Option<f32>,
    frequency_offset: f32,
    base_detune: f32,
    detune_offset: f32,
}

#[derive(Clone, Copy, Debug)]
pub enum OscParam {
    /// Frequency offset in Hz.
    Frequency,
    /// Detune in cents.
    Detune,
}

const MAX_FREQUENCY: f32 = 20_000.0;
const MAX_DETUNE_CENTS: f32 = 1200.0;

impl OscNode {
    fn new(osc: OscillatorBlock) -> Self {
        Self {
            osc,
            base_frequency: None,
            frequency_offset: 0.0,
            base_detune: 0.0,
            detune_offset: 0.0,
        }
    }

    pub fn sine() -> Self {
        Self::new(OscillatorBlock::sine())
    }

    pub fn sawtooth() -> Self {
        Self::new(OscillatorBlock::sawtooth())
    }

    pub fn square() -> Self {
        Self::new(OscillatorBlock::square())
    }

    pub fn triangle() -> Self {
        Self::new(OscillatorBlock::triangle())
    }

    pub fn noise() -> Self {
        Self::new(OscillatorBlock::noise())
    }

    pub fn with_frequency(mut self, freq: f32) -> Self {
        self.base_frequency = Some(freq);
        self
    }

    pub fn with_detune(mut self, cents: f32) -> Self {
        self.base_detune = cents;
        self
    }

    fn effective_frequency(&self, ctx: &RenderCtx) -> f32 {
        let base = self.base_frequency.unwrap_or(ctx.frequency);
        let detune = (self.base_detune + self.detune_offset)
            .clamp(-MAX_DETUNE_CENTS, MAX_DETUNE_CENTS);
        ((base + self.frequency_offset) * cents_to_ratio(detune)).clamp(0.0, MAX_FREQUENCY)
    }
}

impl GraphNode for OscNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let ctx = RenderCtx {
            frequency: self.effective_frequency(ctx),
            ..*ctx
        };
        self.osc.render(out, &ctx);
    }

    fn note_on(&mut self, _ctx: &RenderCtx) {
        self.osc.reset();
        self.frequency_offset = 0.0;
        self.detune_offset = 0.0;
    }
}

impl Modulatable for OscNode {
    type Param = OscParam;

    fn get_param(&self, param: Self::Param) -> f32 {
        match param {
            OscParam::Frequency => self.base_frequency.unwrap_or(0.0),
            OscParam::Detune => self.base_detune,
        }
    }

    fn apply_modulation(&mut self, param: Self::Param, _base: f32, modulation: f32) {
        match param {
            OscParam::Frequency => self.frequency_offset = modulation,
            OscParam::Detune => self.detune_offset = modulation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    #[test]
    fn sine_tracks_note_pitch() {
        let ctx = RenderCtx::from_note(48_000.0, 69, 1.0);
        let mut osc = OscNode::sine();
        let mut buffer = vec![0.0f32; 128];
        osc.render_block(&mut buffer, &ctx);

        let expected = (TAU * 440.0 * 12.0 / 48_000.0).sin();
        assert!((buffer[12] - expected).abs() < 1e-4);
    }

    #[test]
    fn fixed_frequency_ignores_context() {
        let mut a = OscNode::sine().with_frequency(100.0);
        let mut b = OscNode::sine().with_frequency(100.0);
        let mut out_a = vec![0.0; 64];
        let mut out_b = vec![0.0; 64];
        a.render_block(&mut out_a, &RenderCtx::from_freq(48_000.0, 440.0, 1.0));
        b.render_block(&mut out_b, &RenderCtx::from_freq(48_000.0, 880.0, 1.0));
        assert_eq!(out_a, out_b);
    }

    #[test]
    fn repeated_detune_modulation_does_not_drift() {
        let mut osc = OscNode::sawtooth().with_detune(7.0);
        for _ in 0..100 {
            let base = osc.get_param(OscParam::Detune);
            osc.apply_modulation(OscParam::Detune, base, 10.0);
        }
        assert_eq!(osc.get_param(OscParam::Detune), 7.0);
        let ctx = RenderCtx::from_freq(48_000.0, 440.0, 1.0);
        let expected = 440.0 * cents_to_ratio(17.0);
        assert!((osc.effective_frequency(&ctx) - expected).abs() < 1e-3);
    }
}
