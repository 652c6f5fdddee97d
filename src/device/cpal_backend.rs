use std::{
    sync::{
        atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering},
        mpsc, Arc,
    },
    thread::{self, JoinHandle},
};

use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    FromSample, SizedSample,
};
use log::{debug, error, info, warn};
use rtrb::{Consumer, Producer, PushError, RingBuffer};

use super::{AudioDevice, DeviceCommand};
use crate::{
    config::DeviceConfig,
    error::DeviceError,
    graph::node::GraphNode,
    render::{renderer::VOICE_CAPACITY, Renderer, ScheduledVoice},
    MAX_BLOCK_SIZE,
};

/*
Threads
=======

  control (engine)                 stream thread               cpal callback
  ────────────────                 ─────────────               ─────────────
  CpalDevice ── DeviceCommand ──────────────────────────────►  Renderer
             ◄─ retired graphs ─────────────────────────────── (never frees)
             ── Resume ────────►   stream.play()
             ◄─ result ─────────
  OutputStream ── Close ───────►   drops the stream

The cpal stream is built and owned by its own thread, so the control side
only holds `Send` handles. Graphs of finished voices travel back over a ring
buffer and are freed by the control side the next time it pushes a command.
*/

enum StreamRequest {
    Resume(mpsc::Sender<Result<(), DeviceError>>),
    Close,
}

/// Control-side handle of the default cpal output.
pub struct CpalDevice {
    commands: Producer<DeviceCommand>,
    retired: Consumer<Box<dyn GraphNode>>,
    requests: mpsc::Sender<StreamRequest>,
    clock: Arc<AtomicU64>,
    faulted: Arc<AtomicBool>,
    rejected: Arc<AtomicU64>,
    sample_rate: f32,
}

/// Keeps the cpal stream playing. Drop it to close the device.
pub struct OutputStream {
    requests: mpsc::Sender<StreamRequest>,
    thread: Option<JoinHandle<()>>,
    peak: Arc<AtomicU32>,
    channels: u16,
}

impl OutputStream {
    /// Peak of the most recent callback block, after the limiter.
    pub fn peak(&self) -> f32 {
        f32::from_bits(self.peak.load(Ordering::Relaxed))
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }
}

impl Drop for OutputStream {
    fn drop(&mut self) {
        self.requests.send(StreamRequest::Close).ok();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("audio stream thread panicked");
            }
        }
    }
}

#[derive(Clone)]
struct Shared {
    clock: Arc<AtomicU64>,
    peak: Arc<AtomicU32>,
    faulted: Arc<AtomicBool>,
    rejected: Arc<AtomicU64>,
}

struct Opened {
    sample_rate: f32,
    channels: u16,
}

/// Open the default output device and start its stream.
pub fn open(config: &DeviceConfig) -> Result<(CpalDevice, OutputStream), DeviceError> {
    let (commands, consumer) = RingBuffer::<DeviceCommand>::new(config.command_capacity);
    let (graveyard, retired) = RingBuffer::<Box<dyn GraphNode>>::new(VOICE_CAPACITY);
    let shared = Shared {
        clock: Arc::new(AtomicU64::new(0)),
        peak: Arc::new(AtomicU32::new(0)),
        faulted: Arc::new(AtomicBool::new(false)),
        rejected: Arc::new(AtomicU64::new(0)),
    };

    let (requests, inbox) = mpsc::channel();
    let (ready, opened) = mpsc::channel();
    let thread_shared = shared.clone();
    let thread = thread::Builder::new()
        .name("stemseq-audio".into())
        .spawn(move || {
            let stream = match start_stream(consumer, graveyard, thread_shared) {
                Ok((stream, opened)) => {
                    ready.send(Ok(opened)).ok();
                    stream
                }
                Err(err) => {
                    ready.send(Err(err)).ok();
                    return;
                }
            };
            serve(&stream, inbox);
        })
        .map_err(DeviceError::Thread)?;

    let opened = match opened.recv() {
        Ok(result) => result?,
        Err(_) => return Err(DeviceError::StreamClosed),
    };

    Ok((
        CpalDevice {
            commands,
            retired,
            requests: requests.clone(),
            clock: shared.clock,
            faulted: shared.faulted,
            rejected: shared.rejected,
            sample_rate: opened.sample_rate,
        },
        OutputStream {
            requests,
            thread: Some(thread),
            peak: shared.peak,
            channels: opened.channels,
        },
    ))
}

fn start_stream(
    commands: Consumer<DeviceCommand>,
    graveyard: Producer<Box<dyn GraphNode>>,
    shared: Shared,
) -> Result<(cpal::Stream, Opened), DeviceError> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or(DeviceError::NoOutputDevice)?;
    let supported = device.default_output_config()?;

    let sample_rate = supported.sample_rate().0 as f32;
    let sample_format = supported.sample_format();
    let stream_config: cpal::StreamConfig = supported.into();
    let renderer = Renderer::new(sample_rate);

    let stream = match sample_format {
        cpal::SampleFormat::F32 => {
            build_stream::<f32>(&device, &stream_config, renderer, commands, graveyard, shared)?
        }
        cpal::SampleFormat::I16 => {
            build_stream::<i16>(&device, &stream_config, renderer, commands, graveyard, shared)?
        }
        cpal::SampleFormat::U16 => {
            build_stream::<u16>(&device, &stream_config, renderer, commands, graveyard, shared)?
        }
        other => return Err(DeviceError::UnsupportedSampleFormat(other)),
    };
    stream.play()?;

    info!(
        "opened output '{}' at {} Hz, {} channel(s), {:?}",
        device.name().unwrap_or_else(|_| "unknown".into()),
        sample_rate,
        stream_config.channels,
        sample_format
    );

    Ok((
        stream,
        Opened {
            sample_rate,
            channels: stream_config.channels,
        },
    ))
}

/// Answer resume requests until the [`OutputStream`] closes.
fn serve(stream: &cpal::Stream, inbox: mpsc::Receiver<StreamRequest>) {
    for request in inbox {
        match request {
            StreamRequest::Resume(reply) => {
                reply.send(stream.play().map_err(DeviceError::from)).ok();
            }
            StreamRequest::Close => break,
        }
    }
    debug!("closing output stream");
}

/// Hand a graph back to the control side. A full queue frees it here.
fn retire(graveyard: &mut Producer<Box<dyn GraphNode>>, node: Box<dyn GraphNode>) {
    if let Err(PushError::Full(node)) = graveyard.push(node) {
        drop(node);
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut renderer: Renderer,
    mut commands: Consumer<DeviceCommand>,
    mut graveyard: Producer<Box<dyn GraphNode>>,
    shared: Shared,
) -> Result<cpal::Stream, DeviceError>
where
    T: SizedSample + FromSample<f32>,
{
    let channels = (config.channels as usize).max(1);
    let mut mono = vec![0.0f32; MAX_BLOCK_SIZE];
    let faulted = shared.faulted.clone();

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            while let Ok(command) = commands.pop() {
                match command {
                    DeviceCommand::Schedule(voice) => {
                        if let Err(voice) = renderer.schedule(voice) {
                            shared.rejected.fetch_add(1, Ordering::Relaxed);
                            retire(&mut graveyard, voice.into_node());
                        }
                    }
                    DeviceCommand::SetTrackGain { track, gain } => {
                        renderer.set_track_gain(track, gain)
                    }
                }
            }

            for block in data.chunks_mut(MAX_BLOCK_SIZE * channels) {
                let frames = block.len() / channels;
                let mono = &mut mono[..frames];
                renderer.process_block_with(mono, |node| retire(&mut graveyard, node));
                for (frame, &sample) in block.chunks_mut(channels).zip(mono.iter()) {
                    for out in frame {
                        *out = T::from_sample(sample);
                    }
                }
            }

            shared.clock.store(renderer.frame(), Ordering::Release);
            shared.peak.store(renderer.peak().to_bits(), Ordering::Relaxed);
        },
        move |err| {
            error!("audio stream error: {err}");
            faulted.store(true, Ordering::Release);
        },
        None,
    )?;

    Ok(stream)
}

/// Resume a stream whose error callback fired. `play` is only tried while
/// the fault latch is set, and a successful play clears it.
fn resume_faulted<F>(faulted: &AtomicBool, play: F) -> Result<(), DeviceError>
where
    F: FnOnce() -> Result<(), DeviceError>,
{
    if !faulted.load(Ordering::Acquire) {
        return Ok(());
    }
    match play() {
        Ok(()) => {
            faulted.store(false, Ordering::Release);
            info!("output stream resumed");
            Ok(())
        }
        Err(err) => {
            warn!("output stream cannot be resumed: {err}");
            Err(DeviceError::Suspended)
        }
    }
}

impl CpalDevice {
    fn push(&mut self, command: DeviceCommand) {
        while self.retired.pop().is_ok() {}
        let rejected = self.rejected.swap(0, Ordering::Relaxed);
        if rejected > 0 {
            warn!("voice pool full, {rejected} voice(s) dropped");
        }

        if let Err(PushError::Full(command)) = self.commands.push(command) {
            match command {
                DeviceCommand::Schedule(voice) => warn!(
                    "device queue full, dropping voice at {:.3}s on track {}",
                    voice.start(),
                    voice.track()
                ),
                DeviceCommand::SetTrackGain { track, .. } => {
                    warn!("device queue full, dropping gain change for track {track}")
                }
            }
        }
    }
}

impl AudioDevice for CpalDevice {
    fn now(&self) -> f64 {
        self.clock.load(Ordering::Acquire) as f64 / self.sample_rate as f64
    }

    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn resume(&mut self) -> Result<(), DeviceError> {
        let requests = &self.requests;
        resume_faulted(&self.faulted, || {
            let (reply, answer) = mpsc::channel();
            requests
                .send(StreamRequest::Resume(reply))
                .map_err(|_| DeviceError::StreamClosed)?;
            answer.recv().map_err(|_| DeviceError::StreamClosed)?
        })
    }

    fn schedule(&mut self, voice: ScheduledVoice) {
        self.push(DeviceCommand::Schedule(voice));
    }

    fn set_track_gain(&mut self, track: usize, gain: f32) {
        self.push(DeviceCommand::SetTrackGain { track, gain });
    }
}
