//! Musical building blocks: notes, modal scales, and chords.

pub mod chord;
pub mod mode;
pub mod note;

pub use chord::{voice_lead, Chord, ChordQuality};
pub use mode::Mode;
pub use note::{midi_note_to_string, midi_note_value_from, Note, Octave};
