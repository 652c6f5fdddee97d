//! Resonant bass.
//!
//! A sawtooth through a resonant low-pass. A second envelope opens the
//! filter at the start of each note and lets it close again, the squelchy
//! acid-style sweep, while the amplitude envelope holds for the note.
//!
//! # How It Works
//!
//! 1. Sawtooth tracks the note pitch
//! 2. Low-pass at 180 Hz with resonance 0.55
//! 3. Filter envelope adds up to +1.4 kHz of cutoff and decays in 0.2 s
//! 4. Snappy amplitude envelope; release is supplied per note

use crate::graph::{
    envelope::EnvNode,
    extensions::NodeExt,
    filter::{FilterNode, FilterParam},
    node::GraphNode,
    oscillator::OscNode,
};

pub(super) const RELEASE: f32 = 0.08;

const CUTOFF_HZ: f32 = 180.0;
const SWEEP_HZ: f32 = 1_400.0;

pub fn bass(release: f32) -> impl GraphNode {
    let filter = FilterNode::lowpass(CUTOFF_HZ).with_resonance(0.55).modulate(
        EnvNode::adsr(0.002, 0.2, 0.0, release),
        FilterParam::Cutoff,
        SWEEP_HZ,
    );

    OscNode::sawtooth()
        .through(filter)
        .amplify(EnvNode::adsr(0.005, 0.15, 0.75, release))
        .gain(0.9)
}
