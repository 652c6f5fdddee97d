//! End-to-end playback against an offline device driven in lockstep with the
//! scheduler tick.

use stemseq::{
    AudioDevice, DeviceError, Engine, EngineConfig, Event, OfflineDevice, Region, Stem, Track,
};

const SAMPLE_RATE: f32 = 8_000.0;
const TICK_FRAMES: usize = 200; // 25 ms

fn engine(bpm: f64) -> Engine<OfflineDevice> {
    Engine::new(OfflineDevice::new(SAMPLE_RATE), EngineConfig::default().bpm(bpm))
}

/// Tick, then advance the device by one timer interval, until `seconds`.
fn run_until(engine: &mut Engine<OfflineDevice>, seconds: f64) -> Vec<f32> {
    let mut out = Vec::new();
    loop {
        engine.tick();
        if engine.device().now() >= seconds {
            return out;
        }
        out.extend(engine.device_mut().render(TICK_FRAMES));
    }
}

fn start_times(engine: &Engine<OfflineDevice>) -> Vec<f64> {
    engine.device().scheduled().iter().map(|&(t, _)| t).collect()
}

fn drum_track(region: Region) -> Track {
    Track::new("Drums", Stem::Drums).with_region(region)
}

#[test]
fn two_bar_drum_loop_triggers_once_per_bar() {
    let mut engine = engine(120.0);
    engine.set_tracks(vec![drum_track(
        Region::new(0, 2)
            .with_event(Event::new(0, "kick"))
            .with_event(Event::new(16, "kick")),
    )]);

    engine.start(0.0).expect("offline device starts");
    run_until(&mut engine, 6.1);

    // steps 0, 16, 32, 48 at two seconds per bar
    assert_eq!(start_times(&engine), vec![0.0, 2.0, 4.0, 6.0]);
}

#[test]
fn full_mix_stays_under_ceiling() {
    let loud = |stem, pitch: &str| {
        Track::new(format!("{stem}"), stem).with_region(
            Region::new(0, 1).with_events((0..16).map(|s| Event::new(s, pitch).with_duration(4))),
        )
    };
    let mut engine = engine(140.0);
    engine.set_tracks(vec![
        loud(Stem::Drums, "kick"),
        loud(Stem::Drums, "snare"),
        loud(Stem::Bass, "C1"),
        loud(Stem::Vocals, "C5"),
        loud(Stem::Other, "E4"),
        loud(Stem::Other, "G4"),
    ]);

    engine.start(0.0).expect("offline device starts");
    let audio = run_until(&mut engine, 3.0);

    assert!(audio.iter().all(|s| s.is_finite() && s.abs() <= 1.0));
    assert!(audio.iter().any(|s| s.abs() > 0.1));
}

#[test]
fn unavailable_device_keeps_transport_stopped() {
    let mut engine = engine(120.0);
    engine.set_tracks(vec![drum_track(Region::new(0, 1).with_event(Event::new(0, "kick")))]);
    engine.device_mut().disconnect();

    assert!(matches!(engine.start(0.0), Err(DeviceError::Suspended)));
    assert!(!engine.is_playing());
    assert_eq!(engine.tick(), 0);
    assert!(engine.device().scheduled().is_empty());
}

#[test]
fn tempo_change_applies_from_next_step() {
    let mut engine = engine(120.0);
    engine.set_tracks(vec![drum_track(
        Region::new(0, 1).with_events((0..4).map(|beat| Event::new(beat * 4, "hihat"))),
    )]);

    engine.start(0.0).expect("offline device starts");
    run_until(&mut engine, 1.0);
    assert!((engine.current_bar() - 0.5).abs() < 1e-9);

    engine.set_bpm(60.0);
    run_until(&mut engine, 3.0);

    // Three beats committed at 120 bpm. The cursor resumes at 1.125 s and
    // later steps advance a quarter second each.
    assert_eq!(start_times(&engine), vec![0.0, 0.5, 1.0, 1.875, 2.875]);
    // the downbeat at 2.875 s is bar 1, an eighth of a beat earlier than now
    assert!((engine.current_bar() - 1.03125).abs() < 1e-9);
}

#[test]
fn playhead_stays_on_the_step_grid_across_tempo_changes() {
    let mut engine = engine(120.0);
    engine.set_tracks(vec![drum_track(
        Region::new(0, 4).with_events((0..4).map(|bar| Event::new(bar * 16, "kick"))),
    )]);

    engine.start(0.0).expect("offline device starts");
    for change in 1..=6 {
        run_until(&mut engine, change as f64 * 0.5);
        engine.set_bpm(120.0 - 15.0 * change as f64);
    }

    // Walk the device onto each downbeat as soon as it is committed and read
    // the playhead there.
    let mut checked = 0;
    while engine.device().now() < 40.0 {
        let seen = engine.device().scheduled().len();
        engine.tick();
        let fresh: Vec<f64> = start_times(&engine)[seen..].to_vec();
        for time in fresh {
            engine.device_mut().render_until(time);
            let bar = engine.current_bar();
            assert!((bar - bar.round()).abs() < 1e-3, "playhead at {bar} bars on a downbeat");
            checked += 1;
        }
        engine.device_mut().render(TICK_FRAMES);
    }
    assert!(checked >= 3, "only {checked} downbeats after the tempo changes");
}

#[test]
fn restart_while_playing_never_double_schedules() {
    let mut engine = engine(120.0);
    engine.set_tracks(vec![drum_track(
        Region::new(0, 1).with_events((0..16).map(|s| Event::new(s, "hihat"))),
    )]);

    engine.start(0.0).expect("offline device starts");
    run_until(&mut engine, 0.5);
    engine.start(0.0).expect("restart");
    run_until(&mut engine, 1.0);

    let times = start_times(&engine);
    assert!(times.windows(2).all(|w| w[1] > w[0]), "duplicate start in {times:?}");
    // bar 0 restarts where the committed window ended, downbeat included
    assert_eq!(&times[5..], &[0.625, 0.75, 0.875, 1.0]);
    assert!((engine.current_bar() - 0.1875).abs() < 1e-9);
}

#[test]
fn edits_during_playback_apply_on_the_next_pass() {
    let mut engine = engine(120.0);
    let drums = |events: &[u32]| {
        drum_track(Region::new(0, 1).with_events(events.iter().map(|&s| Event::new(s, "snare"))))
    };
    engine.set_tracks(vec![drums(&[0])]);

    engine.start(0.0).expect("offline device starts");
    run_until(&mut engine, 0.5);
    // step 2 is already committed, step 8 is not
    engine.set_tracks(vec![drums(&[0, 2, 8])]);
    run_until(&mut engine, 2.3);

    assert_eq!(start_times(&engine), vec![0.0, 1.0, 2.0, 2.25]);
}

#[test]
fn stop_schedules_nothing_new() {
    let mut engine = engine(120.0);
    engine.set_tracks(vec![drum_track(
        Region::new(0, 1).with_events((0..16).map(|s| Event::new(s, "kick"))),
    )]);

    engine.start(0.0).expect("offline device starts");
    run_until(&mut engine, 0.5);
    engine.stop();
    let count = engine.device().scheduled().len();
    let bar = engine.current_bar();

    run_until(&mut engine, 2.0);
    assert_eq!(engine.device().scheduled().len(), count);
    assert_eq!(engine.current_bar(), bar);
}

#[test]
fn muting_silences_sounding_voices() {
    let pad = Track::new("Pad", Stem::Other)
        .with_region(Region::new(0, 1).with_event(Event::new(0, "C4").with_duration(16)));
    let mut engine = engine(120.0);
    engine.set_tracks(vec![pad.clone()]);

    engine.start(0.0).expect("offline device starts");
    let audio = run_until(&mut engine, 0.5);
    assert!(audio.iter().any(|s| s.abs() > 0.01));

    engine.set_tracks(vec![pad.muted(true)]);
    let after = engine.device_mut().render(TICK_FRAMES);
    assert!(after.iter().all(|&s| s == 0.0));
}

#[test]
fn empty_arrangement_plays_silence() {
    let mut engine = engine(120.0);
    engine.start(0.0).expect("offline device starts");
    let audio = run_until(&mut engine, 1.0);
    assert!(engine.device().scheduled().is_empty());
    assert!(audio.iter().all(|&s| s == 0.0));
}
