/*
Master limiter
==============

A feed-forward peak limiter sits at the end of the mix bus. It tracks the
signal's peak with separate attack and release smoothing and scales the
sample down whenever the tracked peak exceeds the threshold:

  env  ← |x| > env ? lerp(env, |x|, attack) : lerp(env, |x|, release)
  gain = env > threshold ? threshold / env : 1
  y    = clamp(x · gain, −ceiling, +ceiling)

The envelope lags a fast transient by a millisecond or so, so the final
clamp at the ceiling guarantees the output bound even on the first samples
of a hit. Everything after the clamp is inside [−1, 1].
*/

pub const DEFAULT_THRESHOLD: f32 = 0.9;
pub const DEFAULT_CEILING: f32 = 1.0;
const ATTACK_SECONDS: f32 = 0.001;
const RELEASE_SECONDS: f32 = 0.1;

#[inline]
pub fn hard_clip(sample: f32, ceiling: f32) -> f32 {
    sample.clamp(-ceiling, ceiling)
}

fn smoothing(seconds: f32, sample_rate: f32) -> f32 {
    1.0 - (-1.0 / (seconds * sample_rate).max(1.0)).exp()
}

pub struct Limiter {
    threshold: f32,
    ceiling: f32,
    attack: f32,
    release: f32,
    envelope: f32,
}

impl Limiter {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            ceiling: DEFAULT_CEILING,
            attack: smoothing(ATTACK_SECONDS, sample_rate),
            release: smoothing(RELEASE_SECONDS, sample_rate),
            envelope: 0.0,
        }
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold.clamp(0.01, self.ceiling);
        self
    }

    #[inline]
    pub fn next_sample(&mut self, sample: f32) -> f32 {
        let sample = if sample.is_finite() { sample } else { 0.0 };
        let level = sample.abs();
        let coeff = if level > self.envelope {
            self.attack
        } else {
            self.release
        };
        self.envelope += (level - self.envelope) * coeff;

        let gain = if self.envelope > self.threshold {
            self.threshold / self.envelope
        } else {
            1.0
        };
        hard_clip(sample * gain, self.ceiling)
    }

    pub fn process(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(*sample);
        }
    }

    /// Current gain reduction as a linear factor (1.0 = none).
    pub fn reduction(&self) -> f32 {
        if self.envelope > self.threshold {
            self.threshold / self.envelope
        } else {
            1.0
        }
    }

    pub fn reset(&mut self) {
        self.envelope = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_signal_passes_untouched() {
        let mut limiter = Limiter::new(48_000.0);
        let mut buffer = vec![0.25; 256];
        limiter.process(&mut buffer);
        assert!(buffer.iter().all(|&s| (s - 0.25).abs() < 1e-6));
    }

    #[test]
    fn hot_signal_never_exceeds_ceiling() {
        let mut limiter = Limiter::new(48_000.0);
        let mut buffer: Vec<f32> = (0..4800)
            .map(|i| if i % 2 == 0 { 8.0 } else { -8.0 })
            .collect();
        limiter.process(&mut buffer);
        assert!(buffer.iter().all(|s| s.abs() <= 1.0));
        assert!(limiter.reduction() < 0.2);
    }

    #[test]
    fn sustained_overload_settles_near_threshold() {
        let mut limiter = Limiter::new(48_000.0);
        let mut buffer = vec![2.0; 4800];
        limiter.process(&mut buffer);
        assert!((buffer[4799] - DEFAULT_THRESHOLD).abs() < 0.01);
    }

    #[test]
    fn non_finite_input_becomes_silence() {
        let mut limiter = Limiter::new(48_000.0);
        assert_eq!(limiter.next_sample(f32::NAN), 0.0);
        assert_eq!(limiter.next_sample(f32::INFINITY), 0.0);
    }

    #[test]
    fn hard_clip_is_symmetric() {
        assert_eq!(hard_clip(3.0, 1.0), 1.0);
        assert_eq!(hard_clip(-3.0, 1.0), -1.0);
        assert_eq!(hard_clip(0.5, 1.0), 0.5);
    }
}
