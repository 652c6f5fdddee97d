//! Closed hi-hat.
//!
//! Noise with everything below 7 kHz removed and a very short decay. The
//! slight resonance at the cutoff gives it a metallic edge.

use crate::graph::{
    envelope::EnvNode, extensions::NodeExt, filter::FilterNode, node::GraphNode,
    oscillator::OscNode,
};

pub(super) const CUTOFF_HZ: f32 = 7_000.0;

pub fn hihat() -> impl GraphNode {
    OscNode::noise()
        .through(FilterNode::highpass(CUTOFF_HZ).with_resonance(0.3))
        .amplify(EnvNode::decay(0.06))
        .gain(0.6)
}
