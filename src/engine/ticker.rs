use std::{
    io,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use log::{debug, error};

/// Background thread calling a closure at a fixed interval until cancelled.
///
/// Cancelling wakes the thread, so `cancel` returns within one closure call
/// rather than one interval. Dropping the ticker cancels it.
pub struct Ticker {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn spawn<F>(interval: Duration, mut tick: F) -> io::Result<Self>
    where
        F: FnMut() + Send + 'static,
    {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);

        let handle = thread::Builder::new()
            .name("stemseq-ticker".into())
            .spawn(move || {
                let mut deadline = Instant::now();
                while flag.load(Ordering::Acquire) {
                    tick();
                    deadline += interval;
                    let now = Instant::now();
                    if deadline > now {
                        thread::park_timeout(deadline - now);
                    } else {
                        deadline = now;
                    }
                }
            })?;

        debug!(target: "Ticker", "started with interval {interval:?}");
        Ok(Self {
            running,
            handle: Some(handle),
        })
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn cancel(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            handle.thread().unpark();
            if handle.join().is_err() {
                error!(target: "Ticker", "timer thread panicked");
            }
            debug!(target: "Ticker", "stopped");
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn ticks_until_cancelled() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let mut ticker = Ticker::spawn(Duration::from_millis(2), move || {
            counter.fetch_add(1, Ordering::Relaxed);
        })
        .expect("spawn ticker");

        thread::sleep(Duration::from_millis(50));
        ticker.cancel();
        assert!(!ticker.is_running());

        let after_cancel = count.load(Ordering::Relaxed);
        assert!(after_cancel > 0);
        thread::sleep(Duration::from_millis(20));
        assert_eq!(count.load(Ordering::Relaxed), after_cancel);
    }

    #[test]
    fn drop_cancels() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let ticker = Ticker::spawn(Duration::from_millis(1), move || {
            counter.fetch_add(1, Ordering::Relaxed);
        })
        .expect("spawn ticker");
        drop(ticker);
        let after_drop = count.load(Ordering::Relaxed);
        thread::sleep(Duration::from_millis(10));
        assert_eq!(count.load(Ordering::Relaxed), after_drop);
    }
}
