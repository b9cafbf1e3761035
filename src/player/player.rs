//! The progression player: a scheduler-driven state machine which walks a
//! progression in musical time and hands off between progressions at cycle
//! boundaries.

use super::transport::{AdvanceFn, Transport};
use crate::harmony::Progression;
use crate::musical::{chord::voice_lead, Chord};
use crate::prelude::{bounded_channel, CCReceiver, CCSender};
use crate::settings::CHORD_EVENT_QUEUE_SIZE;
use atomic::Atomic;
use bytemuck::NoUninit;
use std::sync::{
    atomic::Ordering::{Acquire, Release},
    Arc, Mutex,
};
use tracing::debug;

/// Supplies a freshly generated progression when the current one finishes
/// a cycle, so playback never repeats an identical sequence verbatim.
/// Returning `None` means "nothing new": the current progression loops.
pub type CycleSupplier = Box<dyn FnMut() -> Option<Progression> + Send>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlayState {
    #[default]
    Idle,
    Running,
    Paused,
}

unsafe impl NoUninit for PlayState {}

/// Emitted to consumers on every chord change.
#[derive(Clone, Debug)]
pub struct ChordEvent {
    pub chord: Arc<Chord>,
    /// Position of this chord within its progression.
    pub index: usize,
    /// Length of the progression this chord belongs to.
    pub total: usize,
    /// The chord's notes voice-led from the previously emitted chord
    /// (root position when nothing was sounding before).
    pub voiced_notes: Vec<f64>,
}

// Mutable playback state. Touched only from the advance callback and the
// public API, never from both at once.
struct PlayerCore {
    current: Option<Progression>,
    queued: Option<Progression>,
    index: usize,
    last_voicing: Option<Vec<f64>>,
    supplier: Option<CycleSupplier>,
    events: CCSender<ChordEvent>,
}

impl PlayerCore {
    /// Emits a chord-change event for the chord under the cursor. If the
    /// event channel is full the event is dropped rather than blocking.
    fn emit_current(&mut self) {
        let Some(current) = &self.current else {
            return;
        };
        let Some(chord) = current.chord(self.index) else {
            return;
        };

        let voiced = voice_lead(
            self.last_voicing.as_deref().unwrap_or(&[]),
            chord.notes(),
        );
        self.last_voicing = Some(voiced.clone());

        debug!(chord = %chord, index = self.index, "chord change");

        _ = self.events.try_send(ChordEvent {
            chord: Arc::clone(chord),
            index: self.index,
            total: current.len(),
            voiced_notes: voiced,
        });
    }

    /// The interval, in beats, the chord under the cursor should sound
    /// for. Secondary dominants are brief preparations, not full harmonic
    /// stations: their interval is halved (rounded, never below one beat).
    fn next_interval(&self) -> f64 {
        let Some(current) = &self.current else {
            return 1.0;
        };
        let rhythm = current.harmonic_rhythm();

        match current.chord(self.index) {
            Some(chord) if chord.is_secondary_dominant() => {
                (rhythm * 0.5).round().max(1.0)
            }
            _ => rhythm,
        }
    }

    /// Steps the cursor one chord, swapping in the queued progression at a
    /// cycle end. Returns true when the cycle ended with nothing queued and
    /// a supplier is installed.
    fn step(&mut self) -> bool {
        let Some(len) = self.current.as_ref().map(Progression::len) else {
            // nothing loaded; cannot normally occur while the transport is
            // running
            return false;
        };

        self.index += 1;

        if self.index < len {
            return false;
        }

        self.index = 0;

        if let Some(next) = self.queued.take() {
            debug!("cycle end: swapping in queued progression");
            self.current = Some(next);
            return false;
        }

        self.supplier.is_some()
    }
}

/// Plays a [`Progression`] back in musical time, advancing one chord per
/// harmonic-rhythm interval.
///
/// Created once per session. A new progression can replace the current one
/// immediately, or be queued to take over when the current one completes a
/// cycle; `pause`/`resume` suspend and restart the advance without
/// retriggering the sounding chord.
pub struct ProgressionPlayer {
    core: Arc<Mutex<PlayerCore>>,
    transport: Box<dyn Transport>,
    state: Atomic<PlayState>,
    events_rx: CCReceiver<ChordEvent>,
}

impl ProgressionPlayer {
    pub fn new(transport: impl Transport + 'static) -> Self {
        let (tx, rx) = bounded_channel(CHORD_EVENT_QUEUE_SIZE);

        Self {
            core: Arc::new(Mutex::new(PlayerCore {
                current: None,
                queued: None,
                index: 0,
                last_voicing: None,
                supplier: None,
                events: tx,
            })),
            transport: Box::new(transport),
            state: Atomic::new(PlayState::Idle),
            events_rx: rx,
        }
    }

    /// A receiver of chord-change events. May be cloned freely.
    pub fn events(&self) -> CCReceiver<ChordEvent> {
        self.events_rx.clone()
    }

    /// Installs the supplier consulted at cycle end when no progression is
    /// queued.
    pub fn set_cycle_supplier<F>(&mut self, supplier: F)
    where
        F: FnMut() -> Option<Progression> + Send + 'static,
    {
        if let Ok(mut core) = self.core.lock() {
            core.supplier = Some(Box::new(supplier));
        }
    }

    /// Loads a progression. When `immediate` is true — or nothing is
    /// currently loaded — it replaces the current progression now, resets
    /// the cursor, synchronously emits a chord-change for chord 0, and
    /// (re)starts the advance. Otherwise it is queued and swapped in when
    /// the current progression naturally completes its cycle.
    ///
    /// Empty progressions are ignored.
    pub fn set_progression(
        &mut self,
        progression: Progression,
        immediate: bool,
    ) {
        if progression.is_empty() {
            return;
        }

        let replace_now = immediate
            || self
                .core
                .lock()
                .map_or(true, |core| core.current.is_none());

        if !replace_now {
            if let Ok(mut core) = self.core.lock() {
                core.queued = Some(progression);
            }
            return;
        }

        // dispose of the old trigger before touching the cursor so a stale
        // advance can't fire mid-swap
        self.transport.cancel();

        let interval = match self.core.lock() {
            Ok(mut core) => {
                core.current = Some(progression);
                core.queued = None;
                core.index = 0;
                core.emit_current();
                core.next_interval()
            }
            Err(_) => return,
        };

        self.transport.start(interval, self.make_advance());
        self.state.store(PlayState::Running, Release);
    }

    /// Suspends the periodic advance. Cursor and progression are kept.
    pub fn pause(&mut self) {
        if self.state.load(Acquire) == PlayState::Running {
            self.transport.cancel();
            self.state.store(PlayState::Paused, Release);
        }
    }

    /// Restarts the periodic advance from the current cursor. The sounding
    /// chord is *not* re-emitted; the next advance emits the subsequent
    /// chord as if no pause had occurred. A no-op unless paused.
    pub fn resume(&mut self) {
        if self.state.load(Acquire) != PlayState::Paused {
            return;
        }

        let interval = match self.core.lock() {
            Ok(core) if core.current.is_some() => core.next_interval(),
            _ => return,
        };

        self.transport.start(interval, self.make_advance());
        self.state.store(PlayState::Running, Release);
    }

    /// Cancels the advance and discards all loaded progressions. Terminal
    /// until [`set_progression`](Self::set_progression) is called again;
    /// `resume` in the meantime is a no-op.
    pub fn stop(&mut self) {
        self.transport.cancel();

        if let Ok(mut core) = self.core.lock() {
            core.current = None;
            core.queued = None;
            core.index = 0;
            core.last_voicing = None;
        }

        self.state.store(PlayState::Idle, Release);
    }

    pub fn state(&self) -> PlayState {
        self.state.load(Acquire)
    }

    pub fn is_running(&self) -> bool {
        self.state() == PlayState::Running
    }

    /// The cursor position as `(index, total)`. `(0, 0)` when stopped.
    pub fn position(&self) -> (usize, usize) {
        self.core.lock().map_or((0, 0), |core| {
            (
                core.index,
                core.current.as_ref().map_or(0, Progression::len),
            )
        })
    }

    /// The chord currently under the cursor.
    pub fn current_chord(&self) -> Option<Arc<Chord>> {
        self.core.lock().ok().and_then(|core| {
            core.current
                .as_ref()
                .and_then(|p| p.chord(core.index).cloned())
        })
    }

    /// One periodic advance: step the cursor, consult the cycle-end
    /// supplier if one is due, emit the new chord, and report the interval
    /// until the next advance.
    ///
    /// The supplier is pulled out of the core and called with the lock
    /// released, so it may safely call back into the player.
    fn make_advance(&self) -> AdvanceFn {
        let core = Arc::clone(&self.core);

        Box::new(move || {
            let mut supplier = match core.lock() {
                Ok(mut core) => {
                    if core.step() {
                        core.supplier.take()
                    } else {
                        None
                    }
                }
                Err(_) => return 1.0,
            };

            let fresh = supplier.as_mut().and_then(|supply| supply());

            core.lock().map_or(1.0, |mut core| {
                if let Some(supplier) = supplier {
                    core.supplier = Some(supplier);
                }

                match fresh {
                    Some(next) if !next.is_empty() => {
                        debug!("cycle end: supplier provided a progression");
                        core.current = Some(next);
                    }
                    // nothing available: loop the current progression
                    _ => {}
                }

                core.emit_current();
                core.next_interval()
            })
        })
    }
}

impl Drop for ProgressionPlayer {
    fn drop(&mut self) {
        self.transport.cancel();
    }
}
