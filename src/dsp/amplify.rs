//! Signal multiplication primitives.
//!
//! `output[i] = signal[i] × modulator[i]` covers envelope shaping, tremolo and
//! per-track gain stages alike. A constant gain is the degenerate case where
//! every modulator sample is the same.

/// Multiply a signal by a constant gain factor (in-place).
///
/// 0.0 is silence, 1.0 leaves the signal unchanged.
#[inline]
pub fn apply_gain(signal: &mut [f32], gain: f32) {
    for sample in signal.iter_mut() {
        *sample *= gain;
    }
}

/// Multiply a signal by a modulator, writing the result into the signal buffer.
#[inline]
pub fn multiply_in_place(signal: &mut [f32], modulator: &[f32]) {
    debug_assert_eq!(signal.len(), modulator.len());
    for (s, &m) in signal.iter_mut().zip(modulator.iter()) {
        *s *= m;
    }
}

/// Add `source × gain` into `dest`. This is how buses accumulate voices.
#[inline]
pub fn accumulate(dest: &mut [f32], source: &[f32], gain: f32) {
    debug_assert_eq!(dest.len(), source.len());
    for (d, &s) in dest.iter_mut().zip(source.iter()) {
        *d += s * gain;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_gain_scales_every_sample() {
        let mut signal = [1.0, -0.5, 0.25];
        apply_gain(&mut signal, 0.5);
        assert_eq!(signal, [0.5, -0.25, 0.125]);
    }

    #[test]
    fn multiply_in_place_is_sample_wise() {
        let mut signal = [1.0, 1.0, -1.0];
        multiply_in_place(&mut signal, &[0.0, 0.5, 1.0]);
        assert_eq!(signal, [0.0, 0.5, -1.0]);
    }

    #[test]
    fn accumulate_sums_scaled_source() {
        let mut dest = [0.1, 0.2];
        accumulate(&mut dest, &[1.0, 1.0], 0.5);
        assert!((dest[0] - 0.6).abs() < 1e-6);
        assert!((dest[1] - 0.7).abs() < 1e-6);
    }
}
