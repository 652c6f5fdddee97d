//! Snare drum: high-passed noise for the wires over a short tonal body.

use crate::graph::{
    envelope::EnvNode, extensions::NodeExt, filter::FilterNode, node::GraphNode,
    oscillator::OscNode,
};

pub(super) const BODY_HZ: f32 = 185.0;

pub fn snare() -> impl GraphNode {
    let wires = OscNode::noise().through(FilterNode::highpass(1_500.0));
    let body = OscNode::triangle()
        .with_frequency(BODY_HZ)
        .amplify(EnvNode::decay(0.08));

    wires.mix(body, 0.35).amplify(EnvNode::decay(0.2))
}
