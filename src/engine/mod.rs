//! Control-side sequencing engine.
//!
//! [`Engine`] owns the transport, the lookahead [`Scheduler`] and the current
//! arrangement, and hands synthesized voices to an [`AudioDevice`]. It is
//! driven by calling [`Engine::tick`]; [`Player`] does that from a background
//! timer thread.
//!
//! ```
//! use stemseq::{Engine, EngineConfig, Event, OfflineDevice, Region, Stem, Track};
//!
//! let mut engine = Engine::new(OfflineDevice::new(48_000.0), EngineConfig::default());
//! engine.set_tracks(vec![Track::new("Drums", Stem::Drums)
//!     .with_region(Region::new(0, 1).with_event(Event::new(0, "kick")))]);
//! engine.start(0.0).unwrap();
//! assert_eq!(engine.device().scheduled().len(), 1);
//! ```

pub mod player;
pub mod router;
pub mod scheduler;
pub mod ticker;
pub mod transport;

pub use player::Player;
pub use router::{Dispatch, DispatchSink, RecordingSink};
pub use scheduler::Scheduler;
pub use transport::{Transport, TransportState};

use std::sync::Arc;

use log::{debug, info, warn};

use crate::{
    config::EngineConfig,
    device::AudioDevice,
    error::DeviceError,
    render::{mixer::MAX_TRACKS, Destination},
    sequencing::{
        any_soloed,
        time::{sanitize_bpm, STEPS_PER_BAR},
        ClipResolver, Track,
    },
    voices,
};

/// Turns routed events into voices on a device.
pub struct SynthSink<'a, D: ?Sized> {
    device: &'a mut D,
}

impl<'a, D: AudioDevice + ?Sized> SynthSink<'a, D> {
    pub fn new(device: &'a mut D) -> Self {
        Self { device }
    }
}

impl<D: AudioDevice + ?Sized> DispatchSink for SynthSink<'_, D> {
    fn dispatch(&mut self, dispatch: Dispatch) {
        let voice = voices::synthesize(
            dispatch.stem,
            &dispatch.pitch,
            dispatch.duration,
            dispatch.time,
            Destination {
                track: dispatch.track,
                gain: dispatch.gain,
            },
        );
        self.device.schedule(voice);
    }
}

pub struct Engine<D: AudioDevice> {
    device: D,
    config: EngineConfig,
    tracks: Arc<[Track]>,
    resolver: ClipResolver,
    transport: Transport,
    scheduler: Scheduler,
}

impl<D: AudioDevice> Engine<D> {
    pub fn new(device: D, config: EngineConfig) -> Self {
        let bpm = sanitize_bpm(config.initial_bpm, config.min_bpm);
        Self {
            device,
            config,
            tracks: Arc::from(Vec::new()),
            resolver: ClipResolver::default(),
            transport: Transport::new(bpm),
            scheduler: Scheduler::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Length of the arrangement loop in bars.
    pub fn loop_bars(&self) -> u64 {
        self.resolver.loop_bars()
    }

    /// Replace the arrangement. Takes effect from the next uncommitted step;
    /// track bus gains update right away, so a mute also silences voices that
    /// are already sounding.
    pub fn set_tracks(&mut self, tracks: impl Into<Arc<[Track]>>) {
        let tracks = tracks.into();
        let soloing = any_soloed(&tracks);
        if tracks.len() > MAX_TRACKS {
            warn!(
                target: "Engine",
                "{} tracks exceed the {MAX_TRACKS} mix buses, extra tracks are silent",
                tracks.len()
            );
        }

        for (index, track) in tracks.iter().enumerate() {
            let gain = if track.is_audible(soloing) { track.gain() } else { 0.0 };
            self.device.set_track_gain(index, gain);
        }
        for index in tracks.len()..self.tracks.len() {
            self.device.set_track_gain(index, 0.0);
        }

        self.resolver = ClipResolver::new(&tracks);
        debug!(
            target: "Engine",
            "arrangement updated: {} track(s), {} bar loop",
            tracks.len(),
            self.resolver.loop_bars()
        );
        self.tracks = tracks;
    }

    pub fn bpm(&self) -> f64 {
        self.transport.bpm()
    }

    pub fn set_bpm(&mut self, bpm: f64) {
        let bpm = sanitize_bpm(bpm, self.config.min_bpm);
        // Steps before the scheduler cursor already sound at the old tempo,
        // so the new tempo takes over at the next uncommitted step.
        let (at, bar) = if self.transport.is_playing() {
            let steps = self.scheduler.cursor() as f64 / STEPS_PER_BAR as f64;
            (self.scheduler.next_time(), steps)
        } else {
            let now = self.device.now();
            (now, self.transport.current_bar(now))
        };
        self.transport.set_bpm(at, bar, bpm);
        debug!(target: "Engine", "tempo set to {bpm} bpm");
    }

    /// Start playback at `at_bar`. While already playing the new position
    /// begins where the committed window ends, so no step repeats or drops.
    ///
    /// If the device cannot be resumed, the transport ends up Stopped and the
    /// error is returned.
    pub fn start(&mut self, at_bar: f64) -> Result<(), DeviceError> {
        let at_bar = if at_bar.is_finite() { at_bar.max(0.0) } else { 0.0 };

        if let Err(err) = self.device.resume() {
            warn!(target: "Engine", "cannot start playback: {err}");
            self.stop();
            return Err(err);
        }

        let now = self.device.now();
        let bpm = self.transport.bpm();
        let anchor = if self.transport.is_playing() {
            self.scheduler.restart(now, at_bar, bpm)
        } else {
            self.scheduler.reset(now, at_bar, bpm);
            now
        };
        self.transport.start(anchor, at_bar);
        info!(target: "Engine", "playing from bar {at_bar:.2} at {bpm} bpm");

        self.tick();
        Ok(())
    }

    /// Stop scheduling. Voices already handed to the device play out.
    pub fn stop(&mut self) {
        if !self.transport.is_playing() {
            return;
        }
        let now = self.device.now();
        self.transport.stop(now);
        info!(target: "Engine", "stopped at bar {:.2}", self.transport.current_bar(now));
    }

    pub fn is_playing(&self) -> bool {
        self.transport.is_playing()
    }

    pub fn state(&self) -> TransportState {
        self.transport.state()
    }

    pub fn current_bar(&self) -> f64 {
        self.transport.current_bar(self.device.now())
    }

    /// Commit every step inside the lookahead window. Returns how many
    /// events were dispatched.
    pub fn tick(&mut self) -> usize {
        if !self.transport.is_playing() {
            return 0;
        }

        let Self {
            device,
            config,
            tracks,
            resolver,
            transport,
            scheduler,
        } = self;

        let tracks: &[Track] = tracks;
        let resolver: &ClipResolver = resolver;
        let now = device.now();
        let bpm = transport.bpm();
        let mut sink = SynthSink::new(device);
        let mut dispatched = 0;
        scheduler.tick(
            now,
            bpm,
            config.schedule_ahead,
            config.max_steps_per_tick,
            |step, time| {
                dispatched += router::route(tracks, resolver, step, time, bpm, &mut sink);
            },
        );
        dispatched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{device::OfflineDevice, sequencing::{Event, Region, Stem}};

    fn drums(events: &[u32]) -> Track {
        Track::new("Drums", Stem::Drums).with_region(
            Region::new(0, 1).with_events(events.iter().map(|&s| Event::new(s, "kick"))),
        )
    }

    fn engine() -> Engine<OfflineDevice> {
        Engine::new(OfflineDevice::new(8_000.0), EngineConfig::default())
    }

    #[test]
    fn tick_while_stopped_does_nothing() {
        let mut engine = engine();
        engine.set_tracks(vec![drums(&[0])]);
        assert_eq!(engine.tick(), 0);
        assert!(engine.device().scheduled().is_empty());
    }

    #[test]
    fn start_schedules_first_window() {
        let mut engine = engine();
        engine.set_tracks(vec![drums(&[0, 4])]);
        engine.start(0.0).unwrap();
        assert!(engine.is_playing());
        assert_eq!(engine.device().scheduled(), &[(0.0, 0)]);
    }

    #[test]
    fn disconnected_device_stays_stopped() {
        let mut engine = engine();
        engine.device_mut().disconnect();
        assert!(matches!(engine.start(0.0), Err(DeviceError::Suspended)));
        assert_eq!(engine.state(), TransportState::Stopped);
    }

    #[test]
    fn failed_restart_stops_playback() {
        let mut engine = engine();
        engine.start(0.0).unwrap();
        engine.device_mut().disconnect();
        assert!(engine.start(1.0).is_err());
        assert!(!engine.is_playing());
    }

    #[test]
    fn set_tracks_pushes_bus_gains() {
        let mut engine = engine();
        engine.set_tracks(vec![
            drums(&[0]).with_volume(0.5),
            drums(&[0]).muted(true),
            drums(&[0]).with_volume(2.0),
        ]);
        let renderer = engine.device().renderer();
        assert_eq!(renderer.track_gain(0), Some(0.5));
        assert_eq!(renderer.track_gain(1), Some(0.0));
        assert_eq!(renderer.track_gain(2), Some(1.0));

        engine.set_tracks(vec![drums(&[0])]);
        assert_eq!(engine.device().renderer().track_gain(2), Some(0.0));
    }

    #[test]
    fn invalid_tempo_clamps() {
        let mut engine = engine();
        engine.set_bpm(-20.0);
        assert_eq!(engine.bpm(), 1.0);
        engine.set_bpm(f64::NAN);
        assert_eq!(engine.bpm(), 1.0);
        engine.set_bpm(140.0);
        assert_eq!(engine.bpm(), 140.0);
    }

    #[test]
    fn negative_start_bar_starts_at_zero() {
        let mut engine = engine();
        engine.start(-3.0).unwrap();
        assert_eq!(engine.current_bar(), 0.0);
    }

    #[test]
    fn tempo_change_anchors_on_committed_step() {
        let mut engine = engine();
        engine.set_tracks(vec![drums(&[0])]);
        engine.start(0.0).unwrap();
        engine.device_mut().render_until(0.5);
        engine.tick();
        // steps up to 0.5 s committed, next is step 5 at 0.625 s
        engine.set_bpm(60.0);
        engine.device_mut().render_until(0.625);
        assert!((engine.current_bar() - 5.0 / 16.0).abs() < 1e-9);
    }

    #[test]
    fn stop_keeps_bar() {
        let mut engine = engine();
        engine.start(2.0).unwrap();
        engine.device_mut().render_until(1.0);
        engine.stop();
        assert!((engine.current_bar() - 2.5).abs() < 1e-9);
        engine.stop();
        assert!(!engine.is_playing());
    }
}
