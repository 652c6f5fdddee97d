//! Low-level DSP primitives used by the graph nodes and the mix bus.
//!
//! Everything here is allocation-free and realtime-safe so it can live inside
//! voices rendered on the audio thread.

/// Gain and signal multiplication.
pub mod amplify;
/// ADSR and one-shot exponential envelopes.
pub mod envelope;
/// Peak limiter for the master bus.
pub mod limiter;
/// Block-rate modulation helpers.
pub mod modulate;
/// State-variable filter implementation with multiple responses.
pub mod filter;
/// Oscillator waveforms and noise sources.
pub mod oscillator;

pub use envelope::EnvelopeState;
