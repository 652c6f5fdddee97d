use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::debug;

use super::{ticker::Ticker, Engine};
use crate::{device::AudioDevice, error::Error, sequencing::Track};

/// An [`Engine`] driven by its own timer thread.
///
/// The timer ticks the engine every `tick_interval` while playing and is
/// cancelled by [`stop`](Self::stop) or on drop.
pub struct Player<D: AudioDevice + Send + 'static> {
    engine: Arc<Mutex<Engine<D>>>,
    ticker: Option<Ticker>,
}

impl<D: AudioDevice + Send + 'static> Player<D> {
    pub fn new(engine: Engine<D>) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            ticker: None,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Engine<D>> {
        self.engine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start (or restart) playback at `at_bar` and make sure the timer runs.
    pub fn start(&mut self, at_bar: f64) -> Result<(), Error> {
        let started = {
            let mut engine = self.lock();
            let interval = engine.config().tick_interval;
            engine.start(at_bar).map(|()| interval)
        };
        let interval = match started {
            Ok(interval) => interval,
            Err(err) => {
                self.cancel_ticker();
                return Err(err.into());
            }
        };

        if self.ticker.is_none() {
            let engine = Arc::clone(&self.engine);
            let ticker = Ticker::spawn(interval, move || {
                engine.lock().unwrap_or_else(PoisonError::into_inner).tick();
            });
            match ticker {
                Ok(ticker) => self.ticker = Some(ticker),
                Err(err) => {
                    self.lock().stop();
                    return Err(Error::Timer(err));
                }
            }
        }
        Ok(())
    }

    fn cancel_ticker(&mut self) {
        if let Some(mut ticker) = self.ticker.take() {
            ticker.cancel();
            debug!(target: "Player", "timer cancelled");
        }
    }

    pub fn stop(&mut self) {
        self.cancel_ticker();
        self.lock().stop();
    }

    pub fn is_playing(&self) -> bool {
        self.lock().is_playing()
    }

    pub fn current_bar(&self) -> f64 {
        self.lock().current_bar()
    }

    pub fn bpm(&self) -> f64 {
        self.lock().bpm()
    }

    pub fn set_bpm(&self, bpm: f64) {
        self.lock().set_bpm(bpm);
    }

    pub fn set_tracks(&self, tracks: impl Into<Arc<[Track]>>) {
        self.lock().set_tracks(tracks);
    }

    /// Run `f` with the engine locked.
    pub fn with_engine<R>(&self, f: impl FnOnce(&mut Engine<D>) -> R) -> R {
        f(&mut self.lock())
    }
}

impl<D: AudioDevice + Send + 'static> Drop for Player<D> {
    fn drop(&mut self) {
        self.stop();
    }
}
