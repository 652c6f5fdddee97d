/*
Lookahead scheduling
====================

A coarse timer (~25 ms) cannot trigger sounds on time by itself. Instead,
every tick commits all 16th-note steps that fall inside a short window
ahead of the device clock, with their exact device timestamps:

  device clock ──────────●────────────────────────────►
                        now        now + schedule_ahead
                         │◄──────── window ────────►│
  steps            ·   ·   ·   ·   ·   ·   ·   ·   ·
                         ▲ committed this tick ▲

  while next_time < now + schedule_ahead:
      emit(cursor, next_time)
      next_time += step_seconds(bpm)
      cursor    += 1

The device starts each voice on its exact sample, so timer jitter only has
to stay below the window. Tempo is read fresh on every step, so a change
applies from the next uncommitted step on and never retimes committed ones.

A restart while playing anchors the new position at the end of the
committed window, so a seek neither repeats nor drops a step.

If the host stalls long enough that more than `max_steps` would be due at
once, the stale steps are skipped and the cursor jumps to the first step at
or after `now`.
*/

use log::{debug, warn};

use crate::sequencing::time::{seconds_per_step, STEPS_PER_BAR};

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    next_time: f64,
    cursor: u64,
}

fn first_step(at_bar: f64) -> (u64, f64) {
    let exact = at_bar.max(0.0) * STEPS_PER_BAR as f64;
    let cursor = exact.ceil();
    (cursor as u64, cursor - exact)
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Step index of the next step to be committed.
    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    /// Device time of the next step to be committed.
    pub fn next_time(&self) -> f64 {
        self.next_time
    }

    /// Align to the first step boundary at or after `at_bar`.
    pub fn reset(&mut self, now: f64, at_bar: f64, bpm: f64) {
        let (cursor, fraction) = first_step(at_bar);
        self.cursor = cursor;
        self.next_time = now + fraction * seconds_per_step(bpm);
        debug!(target: "Scheduler", "reset to step {} at {:.4}s", self.cursor, self.next_time);
    }

    /// Like [`reset`](Self::reset), but anchored at the end of the already
    /// committed window instead of at `now`. No step plays twice and the step
    /// at `at_bar` is not lost. Returns the device time `at_bar` maps to.
    pub fn restart(&mut self, now: f64, at_bar: f64, bpm: f64) -> f64 {
        let anchor = self.next_time.max(now);
        self.reset(anchor, at_bar, bpm);
        anchor
    }

    /// Commit every step due before `now + schedule_ahead`. Returns the
    /// number of steps emitted.
    pub fn tick<F>(&mut self, now: f64, bpm: f64, schedule_ahead: f64, max_steps: usize, mut emit: F) -> usize
    where
        F: FnMut(u64, f64),
    {
        let step = seconds_per_step(bpm);
        let horizon = now + schedule_ahead;

        let due = ((horizon - self.next_time) / step).ceil();
        if due > max_steps as f64 {
            let skipped = ((now - self.next_time) / step).ceil().max(0.0);
            warn!(
                target: "Scheduler",
                "{due} steps due at once, skipping {skipped} stale steps to resync"
            );
            self.cursor += skipped as u64;
            self.next_time += skipped * step;
        }

        let mut emitted = 0;
        while self.next_time < horizon && emitted < max_steps {
            emit(self.cursor, self.next_time);
            self.next_time += step;
            self.cursor += 1;
            emitted += 1;
        }
        emitted
    }
}
