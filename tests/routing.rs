//! Arrangement resolution and routing through the public API.

use stemseq::{
    engine::{router::route, RecordingSink},
    render::Destination,
    sequencing::{pitch::DEFAULT_FREQUENCY, time::STEPS_PER_BAR, ClipResolver},
    voices, Event, Region, Stem, Track,
};

fn arrangement() -> Vec<Track> {
    vec![
        Track::new("Drums", Stem::Drums)
            .with_region(Region::new(0, 1).with_events([Event::new(0, "kick"), Event::new(8, "snare")])),
        Track::new("Bass", Stem::Bass)
            .with_volume(0.5)
            .with_region(Region::new(1, 2).with_event(Event::new(5, "E1").with_velocity(0.8))),
        Track::new("Keys", Stem::Other).with_region(Region::new(3, 0).with_event(Event::new(0, "C4"))),
    ]
}

fn route_range(tracks: &[Track], steps: std::ops::Range<u64>) -> RecordingSink {
    let resolver = ClipResolver::new(tracks);
    let mut sink = RecordingSink::new();
    for step in steps {
        route(tracks, &resolver, step, step as f64 * 0.125, 120.0, &mut sink);
    }
    sink
}

#[test]
fn arrangement_loops_at_last_region_end() {
    let tracks = arrangement();
    assert_eq!(ClipResolver::new(&tracks).loop_bars(), 3);

    let loop_steps = 3 * STEPS_PER_BAR as u64;
    let once = route_range(&tracks, 0..loop_steps);
    let twice = route_range(&tracks, 0..2 * loop_steps);
    assert_eq!(twice.len(), 2 * once.len());

    let steps: Vec<u64> = once.iter().map(|d| d.step).collect();
    // drums in bar 0, the two-bar bass region once at 16 + 5
    assert_eq!(steps, vec![0, 8, 21]);
}

#[test]
fn zero_length_region_never_plays() {
    let sent = route_range(&arrangement(), 0..200);
    assert!(sent.iter().all(|d| d.track != 2));
}

#[test]
fn bass_gain_and_duration() {
    let sent = route_range(&arrangement(), 0..48);
    let bass: Vec<_> = sent.iter().filter(|d| d.stem == Stem::Bass).collect();
    assert_eq!(bass.len(), 1);
    assert!((bass[0].gain - 0.4).abs() < 1e-6);
    assert_eq!(bass[0].duration, 0.125);
    assert_eq!(bass[0].time, 21.0 * 0.125);
}

#[test]
fn malformed_event_synthesizes_default_pitch() {
    let tracks = vec![Track::new("Lead", Stem::Vocals)
        .with_region(Region::new(0, 1).with_event(Event::new(0, "???").with_duration(0)))];
    let sent = route_range(&tracks, 0..1);
    assert_eq!(sent.len(), 1);

    let dispatch = &sent[0];
    let voice = voices::synthesize(
        dispatch.stem,
        &dispatch.pitch,
        dispatch.duration,
        dispatch.time,
        Destination { track: dispatch.track, gain: dispatch.gain },
    );
    assert_eq!(voice.frequency(), DEFAULT_FREQUENCY);
    assert!(voice.stop() > voice.start());
    assert!(voice.stop() <= dispatch.duration + voices::RELEASE_TAIL + 1e-9);
}

#[test]
fn solo_on_muted_track_stays_silent() {
    let tracks = vec![
        Track::new("A", Stem::Drums)
            .soloed(true)
            .muted(true)
            .with_region(Region::new(0, 1).with_event(Event::new(0, "kick"))),
        Track::new("B", Stem::Drums).with_region(Region::new(0, 1).with_event(Event::new(0, "kick"))),
    ];
    assert!(route_range(&tracks, 0..16).is_empty());
}
