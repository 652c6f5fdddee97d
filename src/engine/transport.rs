use crate::sequencing::time::seconds_per_bar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    Stopped,
    Playing,
}

/// Maps device time to a fractional bar position.
///
/// ```text
/// bar = start_bar + (now − epoch) / seconds_per_bar(bpm)
/// ```
///
/// A tempo change while playing re-anchors the mapping on a point the caller
/// names, normally the next uncommitted step, so the playhead follows the
/// audible step grid. The epoch may lie slightly in the future; until then the
/// bar is extrapolated backwards at the new tempo. Stopping freezes the
/// position where it was. The bar never reads below zero.
#[derive(Debug, Clone)]
pub struct Transport {
    state: TransportState,
    start_bar: f64,
    epoch: f64,
    bpm: f64,
}

impl Transport {
    pub fn new(bpm: f64) -> Self {
        Self {
            state: TransportState::Stopped,
            start_bar: 0.0,
            epoch: 0.0,
            bpm,
        }
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == TransportState::Playing
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    pub fn start(&mut self, now: f64, at_bar: f64) {
        self.start_bar = at_bar;
        self.epoch = now;
        self.state = TransportState::Playing;
    }

    pub fn stop(&mut self, now: f64) {
        if self.is_playing() {
            self.start_bar = self.current_bar(now);
            self.state = TransportState::Stopped;
        }
    }

    pub fn current_bar(&self, now: f64) -> f64 {
        match self.state {
            TransportState::Stopped => self.start_bar,
            TransportState::Playing => {
                let elapsed = now - self.epoch;
                (self.start_bar + elapsed / seconds_per_bar(self.bpm)).max(0.0)
            }
        }
    }

    /// Change tempo so that `bar` falls on device time `at`. While stopped
    /// only the tempo changes.
    pub fn set_bpm(&mut self, at: f64, bar: f64, bpm: f64) {
        if self.is_playing() {
            self.start_bar = bar;
            self.epoch = at;
        }
        self.bpm = bpm;
    }
}
