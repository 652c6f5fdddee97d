//! One synthesis routine per stem.
//!
//! Each routine is a pure function from an event's sound source to a
//! [`ScheduledVoice`]: it builds a node graph and the voice's gate and stop
//! times, and touches no engine state.
//!
//! | Stem     | Routine                                          |
//! | -------- | ------------------------------------------------ |
//! | `Drums`  | label → kick / snare / hihat / clap, fixed decay |
//! | `Bass`   | saw → resonant low-pass with a cutoff sweep      |
//! | `Vocals` | sine + saw with 5.5 Hz vibrato → 900 Hz band-pass |
//! | `Other`  | two saws ±7 cents → gentle low-pass              |
//!
//! ```
//! use stemseq::{render::Destination, voices, Stem};
//!
//! let voice = voices::synthesize(Stem::Bass, "E1", 0.25, 4.0, Destination { track: 1, gain: 0.8 });
//! assert_eq!(voice.start(), 4.0);
//! assert!(voice.stop() <= 4.0 + 0.25 + voices::RELEASE_TAIL);
//! ```

mod bass;
mod clap;
mod drums;
mod hihat;
mod kick;
mod pad;
mod snare;
mod vocal;

pub use bass::bass;
pub use clap::clap;
pub use drums::DrumKind;
pub use hihat::hihat;
pub use kick::kick;
pub use pad::pad;
pub use snare::snare;
pub use vocal::vocal;

use crate::{
    graph::node::GraphNode,
    render::{Destination, ScheduledVoice},
    sequencing::{pitch::resolve_frequency, Stem},
};

/// Lifetime of a percussive voice, independent of the event's duration.
pub const PERCUSSIVE_TAIL: f64 = 0.6;
/// Extra time a sustained voice may sound after its release should be done.
pub const RELEASE_TAIL: f64 = 0.05;

/// Build the voice for one dispatched event. Never fails: unknown drum labels
/// play a kick and unparseable pitches play middle C.
pub fn synthesize(
    stem: Stem,
    pitch: &str,
    duration: f64,
    start: f64,
    destination: Destination,
) -> ScheduledVoice {
    let duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
    match stem {
        Stem::Drums => drums::voice(DrumKind::from_label(pitch), start, destination),
        Stem::Bass => {
            let release = release_for(duration, bass::RELEASE);
            sustained(bass(release), resolve_frequency(pitch), release, duration, start, destination)
        }
        Stem::Vocals => {
            let release = release_for(duration, vocal::RELEASE);
            sustained(vocal(release), resolve_frequency(pitch), release, duration, start, destination)
        }
        Stem::Other => {
            let release = release_for(duration, pad::RELEASE);
            sustained(pad(release), resolve_frequency(pitch), release, duration, start, destination)
        }
    }
}

/// A sustained voice's release may take at most half the note.
fn release_for(duration: f64, preferred: f32) -> f32 {
    (preferred as f64).min(duration / 2.0) as f32
}

/// Gate off early enough that the release ends on `start + duration`, and
/// hard-stop shortly after.
fn sustained(
    node: impl GraphNode + 'static,
    frequency: f32,
    release: f32,
    duration: f64,
    start: f64,
    destination: Destination,
) -> ScheduledVoice {
    let end = start + duration;
    ScheduledVoice::new(Box::new(node), frequency, start, end + RELEASE_TAIL, destination)
        .with_gate_off(end - release as f64)
}
