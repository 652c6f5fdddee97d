//! Which region is playing, and where in its loop.
//!
//! The arrangement loops as a whole: its length is the end of the last
//! region across all tracks, and global steps wrap modulo that length before
//! any lookup. Within the arrangement a region is active for the bars it
//! covers, and its local step is taken modulo its own loop length:
//!
//! ```text
//! step  = global % arrangement_steps
//! bar   = step / 16
//! local = (step − start·16) % (length·16)
//! ```
//!
//! An empty arrangement, or a region of zero length, resolves to nothing.

use super::project::{Event, Region, Track};
use super::time::STEPS_PER_BAR;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveRegion<'a> {
    pub index: usize,
    pub region: &'a Region,
    pub local_step: u32,
}

impl<'a> ActiveRegion<'a> {
    /// Events whose step matches the current local step.
    pub fn triggered(&self) -> impl Iterator<Item = &'a Event> + 'a {
        let (region, local) = (self.region, self.local_step);
        region.events.iter().filter(move |e| e.step == local)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClipResolver {
    loop_steps: u64,
}

impl ClipResolver {
    pub fn new(tracks: &[Track]) -> Self {
        let end_bar = tracks
            .iter()
            .flat_map(|t| t.regions.iter())
            .filter(|r| r.length_bars > 0)
            .map(|r| r.end_bar())
            .max()
            .unwrap_or(0);
        Self {
            loop_steps: end_bar as u64 * STEPS_PER_BAR as u64,
        }
    }

    /// Length of the arrangement loop in steps.
    pub fn loop_steps(&self) -> u64 {
        self.loop_steps
    }

    pub fn loop_bars(&self) -> u64 {
        self.loop_steps / STEPS_PER_BAR as u64
    }

    /// Global step folded into the arrangement, or `None` when it is empty.
    pub fn wrap(&self, global_step: u64) -> Option<u32> {
        if self.loop_steps == 0 {
            return None;
        }
        u32::try_from(global_step % self.loop_steps).ok()
    }

    pub fn resolve<'a>(&self, track: &'a Track, global_step: u64) -> Option<ActiveRegion<'a>> {
        let step = self.wrap(global_step)?;
        let bar = step / STEPS_PER_BAR;

        let (index, region) = track
            .regions
            .iter()
            .enumerate()
            .find(|(_, r)| r.contains_bar(bar))?;

        let loop_steps = region.loop_steps();
        if loop_steps == 0 {
            return None;
        }
        let offset = step - region.start_bar * STEPS_PER_BAR;
        Some(ActiveRegion {
            index,
            region,
            local_step: offset % loop_steps,
        })
    }

    /// Events of `track` that fire at `global_step`.
    pub fn triggered<'a>(
        &self,
        track: &'a Track,
        global_step: u64,
    ) -> impl Iterator<Item = &'a Event> + 'a {
        self.resolve(track, global_step)
            .into_iter()
            .flat_map(|active| active.triggered())
    }
}
