//! The transport abstraction driving the player's periodic advance.
//!
//! The player registers exactly one repeating action against a transport.
//! The action returns the interval, in beats, until its next firing, which
//! lets the interval change (secondary-dominant shortening) without
//! re-registering — re-registration always disposes the previous trigger
//! first, so duplicate advance loops cannot coexist.

use crate::settings::DEFAULT_BPM;
use crate::util::TimerThread;
use std::sync::{Arc, Mutex};

/// The player's advance action. Returns the next interval in beats.
pub type AdvanceFn = Box<dyn FnMut() -> f64 + Send + 'static>;

/// A monotonic musical-time trigger source.
pub trait Transport: Send {
    /// Registers `cb` to fire every `interval_beats`, cancelling any
    /// previously registered action first.
    fn start(&mut self, interval_beats: f64, cb: AdvanceFn);

    /// Cancels the registered action. Once this returns, no
    /// already-scheduled firing can occur.
    fn cancel(&mut self);

    fn is_running(&self) -> bool;
}

/// A wall-clock transport backed by a [`TimerThread`], converting beats to
/// seconds at a fixed tempo.
pub struct TimerTransport {
    timer: Option<TimerThread>,
    bpm: f64,
}

impl TimerTransport {
    pub fn new(bpm: f64) -> Self {
        Self { timer: None, bpm }
    }

    fn secs_per_beat(&self) -> f64 {
        60.0 / self.bpm
    }
}

impl Default for TimerTransport {
    fn default() -> Self {
        Self::new(DEFAULT_BPM)
    }
}

impl Transport for TimerTransport {
    fn start(&mut self, interval_beats: f64, mut cb: AdvanceFn) {
        self.cancel();

        let spb = self.secs_per_beat();
        let mut timer = TimerThread::new(move || cb() * spb);
        timer.start(interval_beats * spb);

        self.timer = Some(timer);
    }

    fn cancel(&mut self) {
        if let Some(mut timer) = self.timer.take() {
            timer.stop();
        }
    }

    fn is_running(&self) -> bool {
        self.timer.is_some()
    }
}

#[derive(Default)]
struct ManualInner {
    cb: Option<AdvanceFn>,
    interval_beats: f64,
    elapsed_beats: f64,
}

/// A deterministic transport for tests and offline rendering: time only
/// passes when [`tick`](Self::tick) is called. Clones share the same
/// underlying trigger, so one clone can be handed to the player while
/// another is ticked by hand.
#[derive(Clone, Default)]
pub struct ManualTransport {
    inner: Arc<Mutex<ManualInner>>,
}

impl ManualTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances musical time by `beats`, firing the registered action as
    /// many times as elapse within that span.
    pub fn tick(&self, beats: f64) {
        let Ok(mut guard) = self.inner.lock() else {
            return;
        };
        let inner = &mut *guard;

        inner.elapsed_beats += beats;

        while inner.cb.is_some()
            && inner.interval_beats > 0.0
            && inner.elapsed_beats >= inner.interval_beats
        {
            inner.elapsed_beats -= inner.interval_beats;

            if let Some(cb) = inner.cb.as_mut() {
                inner.interval_beats = cb();
            }
        }
    }
}

impl Transport for ManualTransport {
    fn start(&mut self, interval_beats: f64, cb: AdvanceFn) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.cb = Some(cb);
            inner.interval_beats = interval_beats;
            inner.elapsed_beats = 0.0;
        }
    }

    fn cancel(&mut self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.cb = None;
            inner.elapsed_beats = 0.0;
        }
    }

    fn is_running(&self) -> bool {
        self.inner.lock().map_or(false, |inner| inner.cb.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn manual_transport_fires_per_interval() {
        let mut transport = ManualTransport::new();
        let handle = transport.clone();

        let fired = Arc::new(AtomicUsize::new(0));
        let count = Arc::clone(&fired);
        transport.start(
            4.0,
            Box::new(move || {
                count.fetch_add(1, Ordering::Relaxed);
                4.0
            }),
        );

        handle.tick(3.9);
        assert_eq!(fired.load(Ordering::Relaxed), 0);

        handle.tick(0.1);
        assert_eq!(fired.load(Ordering::Relaxed), 1);

        handle.tick(8.0);
        assert_eq!(fired.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn returned_interval_replaces_the_period() {
        let mut transport = ManualTransport::new();
        let handle = transport.clone();

        let fired = Arc::new(AtomicUsize::new(0));
        let count = Arc::clone(&fired);

        // first firing shortens the next interval to 2 beats
        transport.start(
            4.0,
            Box::new(move || {
                let n = count.fetch_add(1, Ordering::Relaxed);
                if n == 0 {
                    2.0
                } else {
                    4.0
                }
            }),
        );

        handle.tick(4.0);
        assert_eq!(fired.load(Ordering::Relaxed), 1);

        handle.tick(2.0);
        assert_eq!(fired.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn cancel_disposes_the_trigger() {
        let mut transport = ManualTransport::new();
        let handle = transport.clone();

        let fired = Arc::new(AtomicUsize::new(0));
        let count = Arc::clone(&fired);
        transport.start(
            1.0,
            Box::new(move || {
                count.fetch_add(1, Ordering::Relaxed);
                1.0
            }),
        );

        transport.cancel();
        assert!(!transport.is_running());

        handle.tick(10.0);
        assert_eq!(fired.load(Ordering::Relaxed), 0);
    }
}
