//! A periodic timer thread for driving musical-time callbacks.

use atomic_float::AtomicF64;
use std::{
    ops::DerefMut,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    thread::JoinHandle,
    time::Duration,
};

/// A repeating timer which fires a callback on a worker thread at a
/// variable interval.
///
/// The callback returns the interval, in seconds, until its *next*
/// invocation, which is how the player shortens the interval after a
/// secondary dominant without re-registering the timer.
pub struct TimerThread {
    cb: Arc<Mutex<dyn FnMut() -> f64 + Send + 'static>>,
    thread: Option<JoinHandle<()>>,

    counter_secs: Arc<AtomicF64>,
    interval_secs: Arc<AtomicF64>,

    sentinel: Arc<AtomicBool>,
}

impl TimerThread {
    pub fn new<F: FnMut() -> f64 + Send + 'static>(cb: F) -> Self {
        Self {
            cb: Arc::new(Mutex::new(cb)),
            thread: None,

            counter_secs: Arc::new(AtomicF64::new(0.0)),
            interval_secs: Arc::new(AtomicF64::new(0.0)),

            sentinel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Starts the timer with the provided interval. Does nothing if the
    /// timer is already running.
    pub fn start(&mut self, interval_secs: f64) {
        if self.thread.is_some() {
            return;
        }

        self.interval_secs.store(interval_secs, Ordering::Release);
        self.counter_secs.store(0.0, Ordering::Release);
        self.sentinel.store(true, Ordering::Release);

        let counter = Arc::clone(&self.counter_secs);
        let interval = Arc::clone(&self.interval_secs);
        let sentinel = Arc::clone(&self.sentinel);
        let cb = Arc::clone(&self.cb);

        let thread = std::thread::spawn(move || {
            let mut now = std::time::Instant::now();
            let mut dt = || {
                // NOTE: to improve the precision of the timer we sleep for a
                // short period of time to allow more time to accumulate,
                // which reduces errors from a lack of nanosecond precision.
                std::thread::sleep(Duration::from_micros(20));

                let elapsed = now.elapsed().as_secs_f64();
                now = std::time::Instant::now();
                elapsed
            };

            while sentinel.load(Ordering::Acquire) {
                let curr_count = counter.load(Ordering::Acquire);
                let curr_interval = interval.load(Ordering::Acquire);

                if curr_count >= curr_interval {
                    if let Ok(mut guard) = cb.lock() {
                        let next = guard.deref_mut()();
                        interval.store(next, Ordering::Release);
                    }

                    counter
                        .store(curr_count - curr_interval, Ordering::Release);
                    _ = dt();

                    continue;
                }

                counter.store(curr_count + dt(), Ordering::Release);
            }
        });

        self.thread = Some(thread);
    }

    /// Stops the timer, joining its worker thread. No already-scheduled
    /// callback can fire after this returns.
    pub fn stop(&mut self) {
        if let Some(thread) = self.thread.take() {
            self.sentinel.store(false, Ordering::Release);
            _ = thread.join();
        }
    }

    pub const fn is_running(&self) -> bool {
        self.thread.is_some()
    }

    pub fn interval(&self) -> f64 {
        self.interval_secs.load(Ordering::Acquire)
    }
}

impl Drop for TimerThread {
    fn drop(&mut self) {
        self.stop();
    }
}
