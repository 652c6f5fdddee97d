use crate::graph::{
    envelope::EnvNode, extensions::NodeExt, filter::FilterNode, node::GraphNode,
    oscillator::OscNode,
};

pub(super) const CENTER_HZ: f32 = 1_200.0;

/// Band-passed noise burst around 1.2 kHz.
pub fn clap() -> impl GraphNode {
    OscNode::noise()
        .through(FilterNode::bandpass(CENTER_HZ).with_resonance(0.4))
        .amplify(EnvNode::decay(0.15))
        .gain(1.4)
}
