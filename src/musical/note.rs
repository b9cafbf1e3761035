//! Musical note representation.

use std::fmt::Display;

// there is no intention of changing the variants of these enums
// so the wildcard import is fine.
use Note::*;
use Octave::*;

pub fn midi_note_value_from(octave: Octave, note: Note) -> f64 {
    octave.starting_midi_note() + note.note_value()
}

pub fn midi_note_to_string(value: u8) -> String {
    let oct = Octave::from_note(value);
    let note = Note::from_value(i32::from(value));

    format!("{note}{oct}")
}

#[derive(Debug, Clone, Copy, Default)]
pub enum Octave {
    /// Octave covering C-1 - B-1 (MIDI note range 0 - 11)
    Cneg1,
    /// Octave covering C0 - B0 (MIDI note range 12 - 23)
    C0,
    /// Octave covering C1 - B1 (MIDI note range 24 - 35)
    C1,
    /// Octave covering C2 - B2 (MIDI note range 36 - 47)
    C2,
    /// Octave covering C3 - B3 (MIDI note range 48 - 59)
    #[default]
    C3,
    /// Octave covering C4 - B4 (MIDI note range 60 - 71)
    C4,
    /// Octave covering C5 - B5 (MIDI note range 72 - 83)
    C5,
    /// Octave covering C6 - B6 (MIDI note range 84 - 95)
    C6,
    /// Octave covering C7 - B7 (MIDI note range 96 - 107)
    C7,
    /// Octave covering C8 - B8 (MIDI note range 108 - 119)
    C8,
    /// Octave covering C9 - B9 (MIDI note range 120 - 131)
    C9,
}

impl Display for Octave {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cneg1 => write!(f, "-1"),
            C0 => write!(f, "0"),
            C1 => write!(f, "1"),
            C2 => write!(f, "2"),
            C3 => write!(f, "3"),
            C4 => write!(f, "4"),
            C5 => write!(f, "5"),
            C6 => write!(f, "6"),
            C7 => write!(f, "7"),
            C8 => write!(f, "8"),
            C9 => write!(f, "9"),
        }
    }
}

impl Octave {
    /// Returns the value of the starting note of this octave.
    #[must_use]
    pub fn starting_midi_note(&self) -> f64 {
        match self {
            Cneg1 => 0.0,
            C0 => 12.0,
            C1 => 24.0,
            C2 => 36.0,
            C3 => 48.0,
            C4 => 60.0,
            C5 => 72.0,
            C6 => 84.0,
            C7 => 96.0,
            C8 => 108.0,
            C9 => 120.0,
        }
    }

    /// Returns the `Octave` which covers the provided MIDI note.
    ///
    /// # Panics
    ///
    /// Panics if `note` is outside of the range `0` to `131`.
    #[must_use]
    pub fn from_note(note: u8) -> Self {
        match note {
            0..=11 => Cneg1,
            12..=23 => C0,
            24..=35 => C1,
            36..=47 => C2,
            48..=59 => C3,
            60..=71 => C4,
            72..=83 => C5,
            84..=95 => C6,
            96..=107 => C7,
            108..=119 => C8,
            120..=131 => C9,
            _ => panic!(
                "value provided ({note}) is outside of the acceptable range"
            ),
        }
    }

    /// Returns this octave's number as used by chord construction, where
    /// `C3` is `3` and `C-1` is `-1`.
    #[must_use]
    pub fn number(&self) -> i32 {
        match self {
            Cneg1 => -1,
            C0 => 0,
            C1 => 1,
            C2 => 2,
            C3 => 3,
            C4 => 4,
            C5 => 5,
            C6 => 6,
            C7 => 7,
            C8 => 8,
            C9 => 9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Note {
    C,
    Cs,
    D,
    Ds,
    E,
    F,
    Fs,
    G,
    Gs,
    A,
    As,
    B,
}

impl Display for Note {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            C => write!(f, "C"),
            Cs => write!(f, "C#"),
            D => write!(f, "D"),
            Ds => write!(f, "D#"),
            E => write!(f, "E"),
            F => write!(f, "F"),
            Fs => write!(f, "F#"),
            G => write!(f, "G"),
            Gs => write!(f, "G#"),
            A => write!(f, "A"),
            As => write!(f, "A#"),
            B => write!(f, "B"),
        }
    }
}

impl Note {
    /// Returns the note with a given transposition.
    #[must_use]
    pub fn transpose(&self, semitones: i32) -> Self {
        let mut value = (self.note_value() as i32 + semitones) % 12;
        while value < 0 {
            value += 12;
        }

        Self::from_value(value)
    }

    /// Returns the value of the note for any octave.
    ///
    /// `C` is represented as 0, and `B` as 11.
    pub fn note_value(&self) -> f64 {
        match self {
            C => 0.0,
            Cs => 1.0,
            D => 2.0,
            Ds => 3.0,
            E => 4.0,
            F => 5.0,
            Fs => 6.0,
            G => 7.0,
            Gs => 8.0,
            A => 9.0,
            As => 10.0,
            B => 11.0,
        }
    }

    /// Returns the note associated with the provided MIDI note value.
    ///
    /// # Panics
    ///
    /// Panics if `value` is negative.
    #[must_use]
    pub fn from_value(value: i32) -> Self {
        assert!(value >= 0);

        let value = value % 12;
        match value {
            0 => C,
            1 => Cs,
            2 => D,
            3 => Ds,
            4 => E,
            5 => F,
            6 => Fs,
            7 => G,
            8 => Gs,
            9 => A,
            10 => As,
            11 => B,
            _ => unreachable!(),
        }
    }
}
