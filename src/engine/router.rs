use log::trace;

use crate::sequencing::{
    any_soloed,
    clip::ClipResolver,
    project::clamp_unit,
    time::seconds_per_step,
    Stem, Track,
};

/// One event leaving the router, ready for synthesis.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatch {
    pub track: usize,
    pub stem: Stem,
    pub pitch: String,
    pub step: u64,
    pub time: f64,
    pub duration: f64,
    pub gain: f32,
}

/// Receiver of routed events.
pub trait DispatchSink {
    fn dispatch(&mut self, dispatch: Dispatch);
}

impl DispatchSink for Vec<Dispatch> {
    fn dispatch(&mut self, dispatch: Dispatch) {
        self.push(dispatch);
    }
}

/// Collects dispatches instead of playing them.
pub type RecordingSink = Vec<Dispatch>;

/// Route every event firing at `step` to `sink`. Returns how many were sent.
///
/// Muted tracks are skipped, and so is every unsoloed track while any track
/// is soloed. Gain is `volume × velocity`, both clamped to [0, 1]; duration is
/// at least one step.
pub fn route<S: DispatchSink + ?Sized>(
    tracks: &[Track],
    resolver: &ClipResolver,
    step: u64,
    time: f64,
    bpm: f64,
    sink: &mut S,
) -> usize {
    let soloing = any_soloed(tracks);
    let step_seconds = seconds_per_step(bpm);
    let mut sent = 0;

    for (index, track) in tracks.iter().enumerate() {
        if !track.is_audible(soloing) {
            continue;
        }
        for event in resolver.triggered(track, step) {
            let dispatch = Dispatch {
                track: index,
                stem: track.stem,
                pitch: event.pitch.clone(),
                step,
                time,
                duration: event.duration_steps.max(1) as f64 * step_seconds,
                gain: track.gain() * clamp_unit(event.velocity),
            };
            trace!(
                target: "Router",
                "step {step} track {index} ({}) {} at {time:.4}s",
                track.stem,
                dispatch.pitch
            );
            sink.dispatch(dispatch);
            sent += 1;
        }
    }
    sent
}
