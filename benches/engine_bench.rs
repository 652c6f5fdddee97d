//! Benchmarks for stem voices, the device-side renderer and scheduler ticks.
//!
//! Run with: cargo bench
//!
//! Reference timing at 48kHz sample rate:
//!   - 128 samples = 2.67ms deadline
//!   - 512 samples = 10.67ms deadline
//!
//! Benchmark groups:
//!   - voices/*     One stem voice graph rendering a block
//!   - renderer/*   Voice pool + mix bus + limiter with many sounding voices
//!   - scheduler/*  One engine tick committing a lookahead window

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use stemseq::{
    graph::node::{GraphNode, RenderCtx},
    render::{Destination, Renderer},
    voices, Engine, EngineConfig, Event, OfflineDevice, Region, Stem, Track,
};

const BLOCK_SIZES: &[usize] = &[128, 512];
const SAMPLE_RATE: f32 = 48_000.0;

fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("voices");
    let ctx = RenderCtx::from_freq(SAMPLE_RATE, 110.0, 1.0);

    let graphs: [(&str, fn() -> Box<dyn GraphNode>); 6] = [
        ("kick", || Box::new(voices::kick())),
        ("snare", || Box::new(voices::snare())),
        ("hihat", || Box::new(voices::hihat())),
        ("bass", || Box::new(voices::bass(0.08))),
        ("vocal", || Box::new(voices::vocal(0.15))),
        ("pad", || Box::new(voices::pad(0.4))),
    ];

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];
        for (name, build) in &graphs {
            let mut node = build();
            node.note_on(&ctx);
            group.bench_with_input(BenchmarkId::new(*name, size), &size, |b, _| {
                b.iter(|| node.render_block(black_box(&mut buffer), black_box(&ctx)))
            });
        }
    }

    group.finish();
}

fn bench_renderer(c: &mut Criterion) {
    let mut group = c.benchmark_group("renderer");

    for voices_count in [8usize, 32] {
        let mut buffer = vec![0.0f32; 512];
        group.bench_with_input(
            BenchmarkId::new("sounding_voices", voices_count),
            &voices_count,
            |b, &count| {
                b.iter_batched(
                    || {
                        let mut renderer = Renderer::new(SAMPLE_RATE);
                        for i in 0..count {
                            let stem = Stem::ALL[i % Stem::ALL.len()];
                            renderer.schedule(voices::synthesize(
                                stem,
                                "C3",
                                1.0,
                                0.0,
                                Destination { track: i % 4, gain: 0.5 },
                            ))
                            .ok();
                        }
                        renderer
                    },
                    |mut renderer| renderer.process_block(black_box(&mut buffer)),
                    criterion::BatchSize::SmallInput,
                )
            },
        );
    }

    group.finish();
}

fn busy_arrangement(tracks: usize) -> Vec<Track> {
    (0..tracks)
        .map(|i| {
            let stem = Stem::ALL[i % Stem::ALL.len()];
            Track::new(format!("track {i}"), stem).with_region(
                Region::new(0, 4).with_events((0..64).map(|s| Event::new(s, "C3").with_duration(2))),
            )
        })
        .collect()
}

fn bench_scheduler(c: &mut Criterion) {
    let mut group = c.benchmark_group("scheduler");

    for tracks in [4usize, 16] {
        group.bench_with_input(BenchmarkId::new("start_tick", tracks), &tracks, |b, &tracks| {
            let arrangement = busy_arrangement(tracks);
            b.iter_batched(
                || {
                    let mut engine = Engine::new(OfflineDevice::new(SAMPLE_RATE), EngineConfig::default().bpm(174.0));
                    engine.set_tracks(arrangement.clone());
                    engine
                },
                |mut engine| {
                    engine.start(0.0).ok();
                    black_box(engine.tick())
                },
                criterion::BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_voices, bench_renderer, bench_scheduler);
criterion_main!(benches);
