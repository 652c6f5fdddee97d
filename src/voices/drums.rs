use log::debug;

use super::{clap, hihat, kick, snare, PERCUSSIVE_TAIL};
use crate::{
    graph::node::GraphNode,
    render::{Destination, ScheduledVoice},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrumKind {
    Kick,
    Snare,
    HiHat,
    Clap,
}

impl DrumKind {
    /// Map an event label to a drum. Unknown labels play a kick.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "kick" | "bd" => DrumKind::Kick,
            "snare" | "sd" => DrumKind::Snare,
            "hihat" | "hi-hat" | "hat" | "hh" => DrumKind::HiHat,
            "clap" | "cp" => DrumKind::Clap,
            other => {
                debug!("unknown drum label {other:?}, playing kick");
                DrumKind::Kick
            }
        }
    }

    /// Nominal body frequency, reported on the scheduled voice.
    pub fn frequency(self) -> f32 {
        match self {
            DrumKind::Kick => kick::BODY_HZ,
            DrumKind::Snare => snare::BODY_HZ,
            DrumKind::HiHat => hihat::CUTOFF_HZ,
            DrumKind::Clap => clap::CENTER_HZ,
        }
    }
}

fn graph(kind: DrumKind) -> Box<dyn GraphNode> {
    match kind {
        DrumKind::Kick => Box::new(kick()),
        DrumKind::Snare => Box::new(snare()),
        DrumKind::HiHat => Box::new(hihat()),
        DrumKind::Clap => Box::new(clap()),
    }
}

pub(super) fn voice(kind: DrumKind, start: f64, destination: Destination) -> ScheduledVoice {
    ScheduledVoice::new(
        graph(kind),
        kind.frequency(),
        start,
        start + PERCUSSIVE_TAIL,
        destination,
    )
}
