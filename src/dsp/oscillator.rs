use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::graph::node::RenderCtx;

/*
Phase accumulator
=================

Every periodic waveform is a function of a normalised phase in [0, 1):

    phase += frequency / sample_rate      (wrap at 1.0)

  Sine      sin(2π·phase)
  Saw       2·phase − 1
  Square    +1 for the first half cycle, −1 for the second
  Triangle  1 − 4·|phase − 0.5|

Noise ignores phase and draws from a xorshift32 generator, which is cheap,
deterministic per instance and needs no allocation.

None of these are band-limited. At the pitches the stems use (bass up to a
few hundred Hz, pads filtered below 3 kHz) the aliasing is masked by the
filters that follow every oscillator.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OscillatorWaveform {
    Sine,
    Saw,
    Square,
    Triangle,
    Noise,
}

pub struct OscillatorBlock {
    waveform: OscillatorWaveform,
    phase: f32,
    noise_state: u32,
}

const NOISE_SEED: u32 = 0x9E37_79B9;

impl OscillatorBlock {
    pub fn new(waveform: OscillatorWaveform) -> Self {
        Self {
            waveform,
            phase: 0.0,
            noise_state: NOISE_SEED,
        }
    }

    pub fn sine() -> Self {
        Self::new(OscillatorWaveform::Sine)
    }

    pub fn sawtooth() -> Self {
        Self::new(OscillatorWaveform::Saw)
    }

    pub fn square() -> Self {
        Self::new(OscillatorWaveform::Square)
    }

    pub fn triangle() -> Self {
        Self::new(OscillatorWaveform::Triangle)
    }

    pub fn noise() -> Self {
        Self::new(OscillatorWaveform::Noise)
    }

    pub fn waveform(&self) -> OscillatorWaveform {
        self.waveform
    }

    /// Restart the cycle so retriggered notes begin at the same point.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    #[inline]
    fn next_noise(&mut self) -> f32 {
        let mut x = self.noise_state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.noise_state = x;
        (x as f32 / u32::MAX as f32) * 2.0 - 1.0
    }

    #[inline]
    pub fn next_sample(&mut self, increment: f32) -> f32 {
        let phase = self.phase;
        let value = match self.waveform {
            OscillatorWaveform::Sine => (TAU * phase).sin(),
            OscillatorWaveform::Saw => 2.0 * phase - 1.0,
            OscillatorWaveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            OscillatorWaveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
            OscillatorWaveform::Noise => self.next_noise(),
        };

        self.phase += increment;
        if self.phase >= 1.0 {
            self.phase -= self.phase.floor();
        }
        value
    }

    /// Fill `out` with the waveform at `ctx.frequency`.
    pub fn render(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let increment = (ctx.frequency / ctx.sample_rate).max(0.0);
        for sample in out.iter_mut() {
            *sample = self.next_sample(increment);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saw_ramps_from_minus_one() {
        let mut osc = OscillatorBlock::sawtooth();
        let ctx = RenderCtx::from_freq(8.0, 1.0, 1.0);
        let mut out = [0.0; 4];
        osc.render(&mut out, &ctx);
        assert_eq!(out, [-1.0, -0.75, -0.5, -0.25]);
    }

    #[test]
    fn square_flips_at_half_cycle() {
        let mut osc = OscillatorBlock::square();
        let ctx = RenderCtx::from_freq(4.0, 1.0, 1.0);
        let mut out = [0.0; 4];
        osc.render(&mut out, &ctx);
        assert_eq!(out, [1.0, 1.0, -1.0, -1.0]);
    }

    #[test]
    fn noise_stays_in_range_and_varies() {
        let mut osc = OscillatorBlock::noise();
        let ctx = RenderCtx::from_freq(48_000.0, 0.0, 1.0);
        let mut out = vec![0.0; 512];
        osc.render(&mut out, &ctx);
        assert!(out.iter().all(|s| (-1.0..=1.0).contains(s)));
        assert!(out.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn reset_restarts_phase() {
        let mut osc = OscillatorBlock::triangle();
        let ctx = RenderCtx::from_freq(48_000.0, 440.0, 1.0);
        let mut first = [0.0; 16];
        osc.render(&mut first, &ctx);
        osc.reset();
        let mut second = [0.0; 16];
        osc.render(&mut second, &ctx);
        assert_eq!(first, second);
    }
}
