use crate::{graph::node::RenderCtx, MIN_TIME};

/*
Envelopes
=========

Two shapes cover every stem:

ADSR (sustained voices: bass, vocals, pads)

  level
    1.0 ┐   ╱╲
        │  ╱  ╲________
    S   │ ╱            ╲
    0.0 └╱──────────────╲──→ t
         A   D    S     R

  Linear segments. `note_on` restarts from zero; `note_off` releases from the
  current level, whatever stage the envelope is in, so an early gate never
  clicks.

Decay (drums)

  level = 0.001 ^ (t / decay)

  Starts at full level on `note_on` and falls by 60 dB over `decay` seconds.
  There is no gate: percussive hits ring out on their own. The envelope
  reports inactive once the level drops below -80 dB.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeState {
    Idle,
    Attack,
    Decay,
    Sustain,
    Release,
}

pub struct Envelope {
    attack: f32,
    decay: f32,
    sustain: f32,
    release: f32,

    stage: EnvelopeState,
    level: f32,

    release_from: f32,
    release_samples: u32,
    release_elapsed: u32,
}

impl Envelope {
    pub fn adsr(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            attack: attack.max(MIN_TIME),
            decay: decay.max(MIN_TIME),
            sustain: sustain.clamp(0.0, 1.0),
            release: release.max(MIN_TIME),
            stage: EnvelopeState::Idle,
            level: 0.0,
            release_from: 0.0,
            release_samples: 1,
            release_elapsed: 0,
        }
    }

    pub fn note_on(&mut self, _ctx: &RenderCtx) {
        self.level = 0.0;
        self.release_elapsed = 0;
        self.stage = EnvelopeState::Attack;
    }

    pub fn note_off(&mut self, ctx: &RenderCtx) {
        if self.stage == EnvelopeState::Idle {
            return;
        }
        self.release_from = self.level;
        self.release_samples = (self.release * ctx.sample_rate).round().max(1.0) as u32;
        self.release_elapsed = 0;
        self.stage = EnvelopeState::Release;
    }

    #[inline]
    pub fn next_sample(&mut self, ctx: &RenderCtx) -> f32 {
        match self.stage {
            EnvelopeState::Idle => self.level = 0.0,
            EnvelopeState::Attack => {
                self.level += 1.0 / (self.attack * ctx.sample_rate);
                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.stage = EnvelopeState::Decay;
                }
            }
            EnvelopeState::Decay => {
                self.level -= (1.0 - self.sustain) / (self.decay * ctx.sample_rate);
                if self.level <= self.sustain {
                    self.level = self.sustain;
                    self.stage = EnvelopeState::Sustain;
                }
            }
            EnvelopeState::Sustain => self.level = self.sustain,
            EnvelopeState::Release => {
                let progress = self.release_elapsed as f32 / self.release_samples as f32;
                self.level = (self.release_from * (1.0 - progress)).max(0.0);
                self.release_elapsed = self.release_elapsed.saturating_add(1);
                if self.release_elapsed >= self.release_samples {
                    self.level = 0.0;
                    self.stage = EnvelopeState::Idle;
                }
            }
        }
        self.level
    }

    pub fn render(&mut self, buffer: &mut [f32], ctx: &RenderCtx) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(ctx);
        }
    }

    pub fn is_active(&self) -> bool {
        self.stage != EnvelopeState::Idle
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn state(&self) -> EnvelopeState {
        self.stage
    }

    pub fn release_time(&self) -> f32 {
        self.release
    }
}

/// Level below which a decaying envelope counts as silent (-80 dB).
const SILENCE: f32 = 1e-4;

pub struct DecayEnvelope {
    decay: f32,
    level: f32,
    coefficient: f32,
    coefficient_rate: f32,
}

impl DecayEnvelope {
    pub fn new(decay: f32) -> Self {
        Self {
            decay: decay.max(MIN_TIME),
            level: 0.0,
            coefficient: 0.0,
            coefficient_rate: 0.0,
        }
    }

    fn coefficient_for(&mut self, sample_rate: f32) -> f32 {
        if self.coefficient_rate != sample_rate {
            self.coefficient = 0.001_f32.powf(1.0 / (self.decay * sample_rate));
            self.coefficient_rate = sample_rate;
        }
        self.coefficient
    }

    pub fn note_on(&mut self, ctx: &RenderCtx) {
        self.coefficient_for(ctx.sample_rate);
        self.level = 1.0;
    }

    pub fn render(&mut self, buffer: &mut [f32], ctx: &RenderCtx) {
        let coefficient = self.coefficient_for(ctx.sample_rate);
        for sample in buffer.iter_mut() {
            *sample = self.level;
            self.level *= coefficient;
        }
        if self.level < SILENCE {
            self.level = 0.0;
        }
    }

    pub fn is_active(&self) -> bool {
        self.level >= SILENCE
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn decay_time(&self) -> f32 {
        self.decay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 1_000.0;

    fn ctx() -> RenderCtx {
        RenderCtx::from_freq(SAMPLE_RATE, 440.0, 1.0)
    }

    fn advance(env: &mut Envelope, samples: usize) {
        let ctx = ctx();
        for _ in 0..samples {
            env.next_sample(&ctx);
        }
    }

    #[test]
    fn attack_then_decay_settles_on_sustain() {
        let mut env = Envelope::adsr(0.01, 0.05, 0.6, 0.2);
        env.note_on(&ctx());
        advance(&mut env, 10);
        assert!(env.level() > 0.99);

        advance(&mut env, 60);
        assert_eq!(env.state(), EnvelopeState::Sustain);
        assert!((env.level() - 0.6).abs() < 1e-3);
    }

    #[test]
    fn release_from_attack_reaches_idle() {
        let mut env = Envelope::adsr(0.1, 0.05, 0.5, 0.03);
        env.note_on(&ctx());
        advance(&mut env, 20);
        let before = env.level();
        assert!(before > 0.0 && before < 1.0);

        env.note_off(&ctx());
        advance(&mut env, 31);
        assert_eq!(env.state(), EnvelopeState::Idle);
        assert_eq!(env.level(), 0.0);
    }

    #[test]
    fn note_off_while_idle_is_ignored() {
        let mut env = Envelope::adsr(0.01, 0.01, 0.5, 0.01);
        env.note_off(&ctx());
        assert!(!env.is_active());
    }

    #[test]
    fn decay_falls_sixty_db_over_decay_time() {
        let mut env = DecayEnvelope::new(0.1);
        env.note_on(&ctx());
        let mut buffer = vec![0.0; 100];
        env.render(&mut buffer, &ctx());
        assert_eq!(buffer[0], 1.0);
        assert!((env.level() - 0.001).abs() < 1e-4);
        assert!(buffer.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn decay_goes_inactive_below_silence() {
        let mut env = DecayEnvelope::new(0.05);
        env.note_on(&ctx());
        assert!(env.is_active());
        let mut buffer = vec![0.0; 200];
        env.render(&mut buffer, &ctx());
        assert!(!env.is_active());
    }
}
