//! Modal scale representations.

use crate::settings::{DEGREES_PER_SCALE, TONE_WINDOW_OCTAVES};
use std::fmt::Display;

use super::{midi_note_value_from, Note, Octave};

/// The seven diatonic modes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Ionian,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    Aeolian,
    Locrian,
}

impl Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ionian => write!(f, "Ionian"),
            Self::Dorian => write!(f, "Dorian"),
            Self::Phrygian => write!(f, "Phrygian"),
            Self::Lydian => write!(f, "Lydian"),
            Self::Mixolydian => write!(f, "Mixolydian"),
            Self::Aeolian => write!(f, "Aeolian"),
            Self::Locrian => write!(f, "Locrian"),
        }
    }
}

impl Mode {
    /// Returns the semitone offsets of this mode's seven degrees within one
    /// octave.
    pub fn intervals(&self) -> &'static [f64; DEGREES_PER_SCALE] {
        match self {
            Self::Ionian => &ModeValues::IONIAN,
            Self::Dorian => &ModeValues::DORIAN,
            Self::Phrygian => &ModeValues::PHRYGIAN,
            Self::Lydian => &ModeValues::LYDIAN,
            Self::Mixolydian => &ModeValues::MIXOLYDIAN,
            Self::Aeolian => &ModeValues::AEOLIAN,
            Self::Locrian => &ModeValues::LOCRIAN,
        }
    }

    /// Parses a mode from its (case-insensitive) name. Unknown names fall
    /// back to the default mode so scale construction always succeeds.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "ionian" | "major" => Self::Ionian,
            "dorian" => Self::Dorian,
            "phrygian" => Self::Phrygian,
            "lydian" => Self::Lydian,
            "mixolydian" => Self::Mixolydian,
            "aeolian" | "minor" => Self::Aeolian,
            "locrian" => Self::Locrian,
            _ => Self::default(),
        }
    }

    /// Returns every pitch of this mode across a [`TONE_WINDOW_OCTAVES`]-
    /// octave window centred on `octave`, rooted at `root`.
    ///
    /// Ordered ascending; element `DEGREES_PER_SCALE + i` is degree `i + 1`
    /// in the centre octave, so indexing past either end of an octave still
    /// lands on a defined pitch.
    pub fn pitch_window(&self, root: Note, octave: Octave) -> Vec<f64> {
        let half = TONE_WINDOW_OCTAVES / 2;
        let centre = midi_note_value_from(octave, root);
        let mut pitches =
            Vec::with_capacity(DEGREES_PER_SCALE * TONE_WINDOW_OCTAVES as usize);

        for oct in -half..=half {
            let base = centre + f64::from(oct * 12);
            for interval in self.intervals() {
                pitches.push(base + interval);
            }
        }

        pitches
    }
}

struct ModeValues;

impl ModeValues {
    pub const IONIAN: [f64; 7] = [0.0, 2.0, 4.0, 5.0, 7.0, 9.0, 11.0];
    pub const DORIAN: [f64; 7] = [0.0, 2.0, 3.0, 5.0, 7.0, 9.0, 10.0];
    pub const PHRYGIAN: [f64; 7] = [0.0, 1.0, 3.0, 5.0, 7.0, 8.0, 10.0];
    pub const LYDIAN: [f64; 7] = [0.0, 2.0, 4.0, 6.0, 7.0, 9.0, 11.0];
    pub const MIXOLYDIAN: [f64; 7] = [0.0, 2.0, 4.0, 5.0, 7.0, 9.0, 10.0];
    pub const AEOLIAN: [f64; 7] = [0.0, 2.0, 3.0, 5.0, 7.0, 8.0, 10.0];
    pub const LOCRIAN: [f64; 7] = [0.0, 1.0, 3.0, 5.0, 6.0, 8.0, 10.0];
}
