use thiserror::Error;

/// Failures of the audio output device.
///
/// These are the only errors allowed to abort [`Engine::start`](crate::Engine::start);
/// malformed project data is always recovered locally.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("no default output device available")]
    NoOutputDevice,
    #[error("failed to fetch default output config")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),
    #[error("failed to build output stream")]
    BuildStream(#[from] cpal::BuildStreamError),
    #[error("failed to start output stream")]
    PlayStream(#[from] cpal::PlayStreamError),
    #[error("unsupported sample format '{0}'")]
    UnsupportedSampleFormat(cpal::SampleFormat),
    #[error("audio device is suspended and could not be resumed")]
    Suspended,
    #[error("failed to spawn audio stream thread")]
    Thread(#[source] std::io::Error),
    #[error("audio stream thread has exited")]
    StreamClosed,
}

/// Errors surfaced by [`Player`](crate::Player).
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Device(#[from] DeviceError),
    #[error("failed to spawn scheduler timer thread")]
    Timer(#[source] std::io::Error),
}
