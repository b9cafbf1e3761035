//! Real-time progression playback.

pub mod player;
pub mod transport;

pub use player::{ChordEvent, CycleSupplier, PlayState, ProgressionPlayer};
pub use transport::{AdvanceFn, ManualTransport, TimerTransport, Transport};
