//! Demo arrangement built in code

use stemseq::{Event, Region, Stem, Track};

fn drum_loop() -> Region {
    let mut region = Region::new(0, 4);
    for bar in 0..4 {
        let at = bar * 16;
        for beat in 0..4 {
            let accent = if beat == 0 { 1.0 } else { 0.85 };
            region = region
                .with_event(Event::new(at + beat * 4, "kick").with_velocity(accent))
                .with_event(Event::new(at + beat * 4 + 2, "hihat").with_velocity(0.5));
        }
        region = region
            .with_event(Event::new(at + 4, "snare"))
            .with_event(Event::new(at + 12, "snare"));
    }
    // Fill idea on the last sixteenth, not yet confirmed by the arranger.
    region.with_event(Event::new(63, "clap").with_velocity(0.4).tentative())
}

fn bassline(start_bar: u32) -> Region {
    let notes = [(0, "C2"), (3, "C2"), (6, "Eb2"), (8, "F2"), (11, "F2"), (14, "G1")];
    Region::new(start_bar, 2).with_events(notes.iter().flat_map(|&(step, pitch)| {
        [
            Event::new(step, pitch).with_duration(2),
            Event::new(step + 16, pitch).with_duration(2).with_velocity(0.9),
        ]
    }))
}

fn hook() -> Region {
    Region::new(2, 2).with_events([
        Event::new(0, "G4").with_duration(6),
        Event::new(8, "Bb4").with_duration(4).with_velocity(0.8),
        Event::new(16, "C5").with_duration(8),
        Event::new(28, "Bb4").with_duration(4).with_velocity(0.7),
    ])
}

fn chords() -> Region {
    Region::new(0, 4).with_events([
        Event::new(0, "C4").with_duration(16),
        Event::new(0, "Eb4").with_duration(16),
        Event::new(16, "Ab3").with_duration(16),
        Event::new(16, "C4").with_duration(16),
        Event::new(32, "F3").with_duration(16),
        Event::new(32, "Ab3").with_duration(16),
        Event::new(48, "G3").with_duration(16),
        Event::new(48, "B3").with_duration(16),
    ])
}

/// Four bars: a steady drum groove, a two-bar bassline played twice, a hook
/// entering on bar 3 and one pad chord per bar.
pub fn project() -> Vec<Track> {
    vec![
        Track::new("drums", Stem::Drums).with_region(drum_loop()),
        Track::new("bass", Stem::Bass)
            .with_volume(0.8)
            .with_region(bassline(0))
            .with_region(bassline(2)),
        Track::new("vocal", Stem::Vocals).with_volume(0.6).with_region(hook()),
        Track::new("pad", Stem::Other).with_volume(0.5).with_region(chords()),
    ]
}
