//! Composable building blocks for voice graphs.
//!
//! Graph nodes wrap the DSP primitives with note gates, parameter modulation
//! and block rendering. [`extensions::NodeExt`] adds the fluent combinators
//! the stem voices are written with.

/// Signal × modulator, and constant gain.
pub mod amplify;
/// Envelope generator node.
pub mod envelope;
/// Fluent combinators (`.amplify()`, `.through()`, ...).
pub mod extensions;
/// State-variable filter node.
pub mod filter;
/// Low frequency oscillators for modulation.
pub mod lfo;
/// Linear crossfade of parallel sources.
pub mod mix;
/// Block-rate parameter modulation.
pub mod modulate;
/// Core traits shared by all nodes.
pub mod node;
/// Audio-band oscillators and noise.
pub mod oscillator;
/// Serial chaining of two nodes.
pub mod through;
