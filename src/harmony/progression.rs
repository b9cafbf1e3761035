//! An immutable, fully-materialized chord progression.

use crate::musical::Chord;
use std::sync::Arc;

/// An ordered sequence of chords plus the harmonic rhythm they change at.
///
/// Built once by the generator and consumed strictly in order by the
/// player; all randomness has already happened by the time one of these
/// exists. Cloning is cheap (the chords are `Arc`s).
#[derive(Clone, Debug)]
pub struct Progression {
    chords: Vec<Arc<Chord>>,
    harmonic_rhythm: f64,
}

impl Progression {
    /// Freezes a chord sequence into a progression. `harmonic_rhythm` is
    /// the duration of one chord in beats.
    pub fn new(chords: Vec<Chord>, harmonic_rhythm: f64) -> Self {
        Self {
            chords: chords.into_iter().map(Arc::new).collect(),
            harmonic_rhythm,
        }
    }

    pub fn len(&self) -> usize {
        self.chords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chords.is_empty()
    }

    pub fn chord(&self, index: usize) -> Option<&Arc<Chord>> {
        self.chords.get(index)
    }

    pub fn chords(&self) -> &[Arc<Chord>] {
        &self.chords
    }

    /// Beats per chord.
    pub fn harmonic_rhythm(&self) -> f64 {
        self.harmonic_rhythm
    }
}
