use std::f32::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::graph::node::RenderCtx;

/*
Trapezoidal state-variable filter
=================================

One two-integrator core yields three responses from the same state:

| response  | output               | passes          |
| --------- | -------------------- | --------------- |
| low-pass  | v2                   | below cutoff    |
| band-pass | v1                   | around cutoff   |
| high-pass | x − k·v1 − v2        | above cutoff    |

  g = tan(π · fc / sr)
  k = 2 · (1 − resonance)

The cutoff is clamped to [10 Hz, 0.49·sr] so modulation can never push `tan`
past its pole, and resonance stops at 0.98 so k stays positive.
*/

const MIN_CUTOFF: f32 = 10.0;
const MAX_CUTOFF_RATIO: f32 = 0.49;
const MAX_RESONANCE: f32 = 0.98;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    LowPass,
    HighPass,
    BandPass,
}

pub struct SVFilter {
    ic1eq: f32,
    ic2eq: f32,
    cutoff_hz: f32,
    resonance: f32,
    filter_type: FilterType,
}

impl SVFilter {
    pub fn new(filter_type: FilterType, cutoff_hz: f32) -> Self {
        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            cutoff_hz,
            resonance: 0.0,
            filter_type,
        }
    }

    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::LowPass, cutoff_hz)
    }

    pub fn highpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::HighPass, cutoff_hz)
    }

    pub fn bandpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::BandPass, cutoff_hz)
    }

    #[inline]
    fn coefficients(&self, sample_rate: f32) -> (f32, f32) {
        let cutoff = self
            .cutoff_hz
            .clamp(MIN_CUTOFF, sample_rate * MAX_CUTOFF_RATIO);
        let g = (PI * cutoff / sample_rate).tan();
        let k = 2.0 * (1.0 - self.resonance.clamp(0.0, MAX_RESONANCE));
        (g, k)
    }

    pub fn render(&mut self, buffer: &mut [f32], ctx: &RenderCtx) {
        let (g, k) = self.coefficients(ctx.sample_rate);
        let h = 1.0 / (1.0 + g * (g + k));

        for sample in buffer.iter_mut() {
            let x = *sample;
            let v3 = x - self.ic2eq;
            let v1 = h * (self.ic1eq + g * v3);
            let v2 = self.ic2eq + g * v1;
            self.ic1eq = 2.0 * v1 - self.ic1eq;
            self.ic2eq = 2.0 * v2 - self.ic2eq;

            *sample = match self.filter_type {
                FilterType::LowPass => v2,
                FilterType::BandPass => v1,
                FilterType::HighPass => x - k * v1 - v2,
            };
        }
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff_hz
    }

    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        self.cutoff_hz = cutoff_hz;
    }

    pub fn resonance(&self) -> f32 {
        self.resonance
    }

    pub fn set_resonance(&mut self, resonance: f32) {
        self.resonance = resonance;
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }
}
