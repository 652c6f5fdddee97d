use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::time::STEPS_PER_BAR;

/// Instrument category of a track. Selects the synthesis routine.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stem {
    Drums,
    Bass,
    Vocals,
    Other,
}

impl Stem {
    pub const ALL: [Stem; 4] = [Stem::Drums, Stem::Bass, Stem::Vocals, Stem::Other];

    pub fn label(self) -> &'static str {
        match self {
            Stem::Drums => "drums",
            Stem::Bass => "bass",
            Stem::Vocals => "vocals",
            Stem::Other => "other",
        }
    }
}

impl fmt::Display for Stem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One symbolic trigger inside a region.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// 16th-note index local to the region.
    pub step: u32,
    /// Drum label (`kick`, `snare`, ...) or pitch name (`C4`, `F#3`).
    pub pitch: String,
    pub duration_steps: u32,
    pub velocity: f32,
    /// Marked by the editor as a suggestion. Plays like any other event.
    #[cfg_attr(feature = "serde", serde(default))]
    pub tentative: bool,
}

impl Event {
    pub fn new(step: u32, pitch: impl Into<String>) -> Self {
        Self {
            step,
            pitch: pitch.into(),
            duration_steps: 1,
            velocity: 1.0,
            tentative: false,
        }
    }

    pub fn with_duration(mut self, steps: u32) -> Self {
        self.duration_steps = steps;
        self
    }

    pub fn with_velocity(mut self, velocity: f32) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn tentative(mut self) -> Self {
        self.tentative = true;
        self
    }
}

/// A loopable placement of events on a track, measured in whole bars.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Region {
    pub start_bar: u32,
    pub length_bars: u32,
    pub events: Vec<Event>,
}

impl Region {
    pub fn new(start_bar: u32, length_bars: u32) -> Self {
        Self {
            start_bar,
            length_bars,
            events: Vec::new(),
        }
    }

    pub fn with_event(mut self, event: Event) -> Self {
        self.events.push(event);
        self
    }

    pub fn with_events(mut self, events: impl IntoIterator<Item = Event>) -> Self {
        self.events.extend(events);
        self
    }

    /// First bar after the region. Saturates instead of overflowing.
    pub fn end_bar(&self) -> u32 {
        self.start_bar.saturating_add(self.length_bars)
    }

    pub fn contains_bar(&self, bar: u32) -> bool {
        self.length_bars > 0 && self.start_bar <= bar && bar < self.end_bar()
    }

    /// Loop length in steps; zero for an empty region.
    pub fn loop_steps(&self) -> u32 {
        self.length_bars.saturating_mul(STEPS_PER_BAR)
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub name: String,
    pub stem: Stem,
    pub volume: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub muted: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub soloed: bool,
    pub regions: Vec<Region>,
}

impl Track {
    pub fn new(name: impl Into<String>, stem: Stem) -> Self {
        Self {
            name: name.into(),
            stem,
            volume: 1.0,
            muted: false,
            soloed: false,
            regions: Vec::new(),
        }
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume;
        self
    }

    pub fn muted(mut self, muted: bool) -> Self {
        self.muted = muted;
        self
    }

    pub fn soloed(mut self, soloed: bool) -> Self {
        self.soloed = soloed;
        self
    }

    pub fn with_region(mut self, region: Region) -> Self {
        self.regions.push(region);
        self
    }

    /// Volume clamped for use as a gain multiplier. NaN counts as silence.
    pub fn gain(&self) -> f32 {
        clamp_unit(self.volume)
    }

    /// Whether this track passes the mute/solo policy given the whole list.
    pub fn is_audible(&self, any_soloed: bool) -> bool {
        !self.muted && (!any_soloed || self.soloed)
    }
}

pub fn any_soloed(tracks: &[Track]) -> bool {
    tracks.iter().any(|t| t.soloed)
}

#[inline]
pub(crate) fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
