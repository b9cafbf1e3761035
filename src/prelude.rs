//! Project-wide exports for easy access.

pub use crate::harmony::{generate, Mood, MoodProfile, Progression};
pub use crate::musical::{Chord, ChordQuality, Mode, Note, Octave};
pub use crate::player::{ChordEvent, ManualTransport, ProgressionPlayer};
pub use crate::settings::*;
pub use crate::util::*;
pub use atomic_float::AtomicF64;
pub use crossbeam_channel::{
    bounded as bounded_channel, Receiver as CCReceiver, Sender as CCSender,
};
