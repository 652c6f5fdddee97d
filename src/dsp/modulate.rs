//! Block-rate parameter modulation.
//!
//! A modulated parameter is recomputed once per rendered block as
//! `base + average(modulator) × depth`. With blocks of a few hundred samples
//! and modulators below 20 Hz (vibrato, filter sweeps) the stepping is
//! inaudible and filter coefficients are only recalculated per block.

#[inline]
pub fn apply_modulation(base: f32, modulator: f32, depth: f32) -> f32 {
    base + modulator * depth
}

/// Mean of a modulator block; zero for an empty block.
#[inline]
pub fn block_average(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f32>() / samples.len() as f32
}

/// Frequency ratio for a detune in cents (100 cents per semitone).
#[inline]
pub fn cents_to_ratio(cents: f32) -> f32 {
    2.0_f32.powf(cents / 1200.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modulation_is_centred_on_base() {
        assert_eq!(apply_modulation(1000.0, 0.0, 500.0), 1000.0);
        assert_eq!(apply_modulation(1000.0, -1.0, 500.0), 500.0);
        assert_eq!(apply_modulation(1000.0, 0.5, 500.0), 1250.0);
    }

    #[test]
    fn block_average_handles_empty() {
        assert_eq!(block_average(&[]), 0.0);
        assert_eq!(block_average(&[1.0, 2.0, 3.0, 4.0]), 2.5);
    }

    #[test]
    fn an_octave_is_twelve_hundred_cents() {
        assert!((cents_to_ratio(1200.0) - 2.0).abs() < 1e-6);
        assert_eq!(cents_to_ratio(0.0), 1.0);
    }
}
