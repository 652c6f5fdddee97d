//! Offline render of the demo to a WAV file

use std::path::Path;

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use log::info;

use stemseq::{
    sequencing::time::seconds_per_bar, DeviceConfig, Engine, EngineConfig, OfflineDevice,
};

use super::demo;

/// Seconds rendered after the last bar so releases can ring out.
const TAIL_SECONDS: f64 = 1.0;

pub fn run(output: &Path, bars: Option<u32>, bpm: f64, sample_rate: u32) -> EyreResult<()> {
    let device = OfflineDevice::from_config(&DeviceConfig::default().sample_rate(sample_rate as f32));
    let config = EngineConfig::default().bpm(bpm);
    let interval = config.tick_interval.as_secs_f64();
    let mut engine = Engine::new(device, config);
    engine.set_tracks(demo::project());

    let bars = bars.map_or(engine.loop_bars(), u64::from);
    let play_seconds = bars as f64 * seconds_per_bar(engine.bpm());
    info!("bouncing {bars} bar(s) at {} bpm to {}", engine.bpm(), output.display());

    engine.start(0.0).wrap_err("failed to start offline engine")?;

    let mut samples = Vec::new();
    let mut now = 0.0;
    while now < play_seconds {
        now += interval;
        samples.extend(engine.device_mut().render_until(now.min(play_seconds)));
        engine.tick();
    }
    engine.stop();
    samples.extend(engine.device_mut().render_until(play_seconds + TAIL_SECONDS));

    write_wav(output, &samples, sample_rate)?;
    info!(
        "wrote {} frames, {} voices scheduled",
        samples.len(),
        engine.device().scheduled().len()
    );
    Ok(())
}

fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) -> EyreResult<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let mut writer = hound::WavWriter::create(path, spec)
        .wrap_err_with(|| format!("failed to create {}", path.display()))?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}
