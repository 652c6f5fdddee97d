//! Pad for everything that is not drums, bass or vocals.
//!
//! Two sawtooths detuned ±7 cents beat slowly against each other; a gentle
//! low-pass takes the edge off and a slow attack lets the chord swell in.

use crate::graph::{
    envelope::EnvNode, extensions::NodeExt, filter::FilterNode, node::GraphNode,
    oscillator::OscNode,
};

pub(super) const RELEASE: f32 = 0.4;

const DETUNE_CENTS: f32 = 7.0;

pub fn pad(release: f32) -> impl GraphNode {
    OscNode::sawtooth()
        .with_detune(-DETUNE_CENTS)
        .mix(OscNode::sawtooth().with_detune(DETUNE_CENTS), 0.5)
        .through(FilterNode::lowpass(2_200.0).with_resonance(0.1))
        .amplify(EnvNode::adsr(0.12, 0.3, 0.7, release))
        .gain(0.6)
}
