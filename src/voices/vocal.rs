//! Vocal-like lead.
//!
//! A sine and a quieter sawtooth share a 5.5 Hz vibrato and pass through a
//! band-pass "formant" around 900 Hz, which gives the open-vowel colour.

use crate::graph::{
    envelope::EnvNode,
    extensions::NodeExt,
    filter::FilterNode,
    lfo::LfoNode,
    node::GraphNode,
    oscillator::{OscNode, OscParam},
};

pub(super) const RELEASE: f32 = 0.15;

const VIBRATO_HZ: f32 = 5.5;
const VIBRATO_CENTS: f32 = 30.0;
const FORMANT_HZ: f32 = 900.0;

fn vibrato(osc: OscNode) -> impl GraphNode {
    // Both oscillators restart their LFO on note-on, so the two stay in phase.
    osc.modulate(LfoNode::sine(VIBRATO_HZ), OscParam::Detune, VIBRATO_CENTS)
}

pub fn vocal(release: f32) -> impl GraphNode {
    vibrato(OscNode::sine())
        .mix(vibrato(OscNode::sawtooth()), 0.4)
        .through(FilterNode::bandpass(FORMANT_HZ).with_resonance(0.5))
        .amplify(EnvNode::adsr(0.04, 0.1, 0.8, release))
        .gain(1.6)
}
