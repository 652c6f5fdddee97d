//! Kick drum.
//!
//! # How It Works
//!
//! 1. Sine body fixed at 50 Hz
//! 2. A fast decay adds up to 100 Hz on top of the body: the pitch drop
//!    that gives the kick its punch
//! 3. Exponential amplitude decay, 0.4 s to -60 dB
//! 4. Low-pass removes the click of the first cycle

use crate::graph::{
    envelope::EnvNode,
    extensions::NodeExt,
    filter::FilterNode,
    node::GraphNode,
    oscillator::{OscNode, OscParam},
};

pub(super) const BODY_HZ: f32 = 50.0;

pub fn kick() -> impl GraphNode {
    OscNode::sine()
        .with_frequency(BODY_HZ)
        .modulate(EnvNode::decay(0.06), OscParam::Frequency, 100.0)
        .amplify(EnvNode::decay(0.4))
        .through(FilterNode::lowpass(400.0))
}
