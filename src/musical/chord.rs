//! Seventh-chord construction, voice leading, and inversions.

use crate::settings::{
    BASS_REGISTER_LOW, VOICE_REGISTER_HIGH, VOICE_REGISTER_LOW,
};
use std::fmt::Display;

use super::{Mode, Note, Octave};

/// The number of notes in every chord built by this module.
pub const NOTES_PER_CHORD: usize = 4;

/// The four seventh-chord qualities that occur on the degrees of a
/// diatonic mode, plus the dominant quality used for chromatic insertions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChordQuality {
    Maj7,
    Min7,
    Dom7,
    /// Half-diminished (m7b5).
    HalfDim7,
}

impl Display for ChordQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Maj7 => write!(f, "maj7"),
            Self::Min7 => write!(f, "m7"),
            Self::Dom7 => write!(f, "7"),
            Self::HalfDim7 => write!(f, "m7b5"),
        }
    }
}

impl ChordQuality {
    /// Classifies a root-position seventh chord from the semitone distances
    /// of its 3rd, 5th, and 7th above the root.
    fn from_intervals(third: f64, fifth: f64, seventh: f64) -> Self {
        let (third, fifth, seventh) =
            (third as i32, fifth as i32, seventh as i32);

        match (third, fifth, seventh) {
            (4, _, 11) => Self::Maj7,
            (4, _, 10) => Self::Dom7,
            (3, 6, _) => Self::HalfDim7,
            _ => Self::Min7,
        }
    }
}

/// A four-note seventh chord, fully materialized: the root-position
/// voicing, a register-fixed (possibly inverted) bass note, and the chord
/// and parent-scale pitch pools consumers arpeggiate from.
///
/// Chords are immutable once generation completes and are shared by
/// reference (`Arc<Chord>`) with downstream consumers.
#[derive(Clone, Debug)]
pub struct Chord {
    degree: Option<u8>,
    quality: ChordQuality,
    notes: Vec<f64>,
    bass_note: f64,
    chord_tones: Vec<f64>,
    scale_tones: Vec<f64>,
    root_name: String,
    is_secondary_dominant: bool,
    resolves_degree: Option<u8>,
}

impl Display for Chord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.root_name, self.quality)
    }
}

impl Chord {
    /// The scale degree this chord is built on (1-7), or `None` for
    /// chromatic insertions.
    pub fn degree(&self) -> Option<u8> {
        self.degree
    }

    pub fn quality(&self) -> ChordQuality {
        self.quality
    }

    /// The root-position voicing, ascending.
    pub fn notes(&self) -> &[f64] {
        &self.notes
    }

    /// The bass pitch, fixed in the bass register. May be the 3rd or 5th
    /// of the chord after the inversion pass.
    pub fn bass_note(&self) -> f64 {
        self.bass_note
    }

    /// Every chord tone across the construction window, for arpeggiation.
    pub fn chord_tones(&self) -> &[f64] {
        &self.chord_tones
    }

    /// Every pitch of the *parent* scale across the construction window.
    /// For a secondary dominant this is still the surrounding diatonic
    /// scale, so melodic material stays in key through the insertion.
    pub fn scale_tones(&self) -> &[f64] {
        &self.scale_tones
    }

    /// The name of the chord root, e.g. `"F#"`.
    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    pub fn is_secondary_dominant(&self) -> bool {
        self.is_secondary_dominant
    }

    /// The degree a secondary dominant resolves to, if this chord is one.
    pub fn resolves_degree(&self) -> Option<u8> {
        self.resolves_degree
    }

    // only the generator's inversion pass may touch the bass note; after
    // that the chord is frozen behind an Arc.
    pub(crate) fn set_bass(&mut self, bass_note: f64) {
        self.bass_note = bass_note;
    }

    /// Builds the diatonic seventh chord on `degree_index` (0-6) of the
    /// given mode, centred on `octave`.
    ///
    /// The chord stacks every other scale step (0, 2, 4, 6) pulled from a
    /// three-octave pitch window, so degrees near the top of the octave
    /// wrap into the next octave rather than producing undefined pitches.
    pub fn diatonic(
        root: Note,
        mode: Mode,
        degree_index: usize,
        octave: Octave,
    ) -> Self {
        let window = mode.pitch_window(root, octave);
        let base = window.len() / 3 + (degree_index % 7);

        let notes: Vec<f64> = (0..NOTES_PER_CHORD)
            .map(|i| window[base + i * 2])
            .collect();

        let quality = ChordQuality::from_intervals(
            notes[1] - notes[0],
            notes[2] - notes[0],
            notes[3] - notes[0],
        );

        let root_pc = notes[0].rem_euclid(12.0);

        Self {
            degree: Some(degree_index as u8 + 1),
            quality,
            bass_note: bass_register(root_pc),
            chord_tones: spread_tones(&notes, octave.number()),
            scale_tones: window,
            root_name: Note::from_value(root_pc as i32).to_string(),
            is_secondary_dominant: false,
            resolves_degree: None,
            notes,
        }
    }

    /// Builds the dominant seventh a perfect fifth above `target`'s root,
    /// used as a brief chromatic preparation for it.
    ///
    /// `scale_tones` is copied unchanged from the surrounding diatonic
    /// context: melodic voices keep playing in key while the harmony
    /// briefly leaves it.
    pub fn secondary_dominant(target: &Self, scale_tones: &[f64]) -> Self {
        let target_root = target.notes[0];
        let octave_base = (target_root / 12.0).floor() * 12.0;
        let root_pc = (target_root + 7.0).rem_euclid(12.0);
        let root = octave_base + root_pc;

        // root, major 3rd, perfect 5th, minor 7th
        let notes = vec![root, root + 4.0, root + 7.0, root + 10.0];

        Self {
            degree: None,
            quality: ChordQuality::Dom7,
            bass_note: bass_register(root_pc),
            chord_tones: spread_tones(&notes, octave_base as i32 / 12 - 1),
            scale_tones: scale_tones.to_vec(),
            root_name: Note::from_value(root_pc as i32).to_string(),
            is_secondary_dominant: true,
            resolves_degree: target.degree,
            notes,
        }
    }

    /// Chooses the bass inversion (root, 3rd, or 5th in the bass register)
    /// which minimizes the leap from `previous_bass`, returning the chosen
    /// bass pitch. With no previous bass the root position is kept.
    ///
    /// Ties resolve to the earlier candidate in root/3rd/5th order.
    pub fn select_inversion(&self, previous_bass: Option<f64>) -> f64 {
        let Some(prev) = previous_bass else {
            return self.bass_note;
        };

        let mut best = self.bass_note;
        let mut best_dist = f64::MAX;

        for &tone in &self.notes[..3] {
            let candidate = bass_register(tone.rem_euclid(12.0));
            let dist = (candidate - prev).abs();

            if dist < best_dist {
                best_dist = dist;
                best = candidate;
            }
        }

        best
    }
}

/// Picks the octave placement of each target voice (±1 octave from its
/// root-position pitch) nearest the corresponding currently-sounding
/// pitch, then clamps each voice into the fixed
/// `VOICE_REGISTER_LOW..=VOICE_REGISTER_HIGH` register so octave choices
/// cannot drift unboundedly over many transitions.
///
/// Equidistant octave candidates resolve to the lower octave. Voices with
/// no currently-sounding counterpart keep their root-position placement.
pub fn voice_lead(current: &[f64], target: &[f64]) -> Vec<f64> {
    target
        .iter()
        .enumerate()
        .map(|(i, &pitch)| {
            let led = match current.get(i) {
                Some(&sounding) => {
                    let mut best = pitch;
                    let mut best_dist = f64::MAX;

                    // ascending order makes the lower octave win ties
                    for candidate in [pitch - 12.0, pitch, pitch + 12.0] {
                        let dist = (candidate - sounding).abs();
                        if dist < best_dist {
                            best_dist = dist;
                            best = candidate;
                        }
                    }

                    best
                }
                None => pitch,
            };

            clamp_to_register(led)
        })
        .collect()
}

/// Transposes `pitch` by octaves until it lies within the voice register.
fn clamp_to_register(mut pitch: f64) -> f64 {
    while pitch < VOICE_REGISTER_LOW {
        pitch += 12.0;
    }
    while pitch > VOICE_REGISTER_HIGH {
        pitch -= 12.0;
    }

    pitch
}

/// Places a pitch class into the one-octave bass window.
fn bass_register(pitch_class: f64) -> f64 {
    BASS_REGISTER_LOW + pitch_class
}

/// Spreads the pitch classes of `notes` across a three-octave window
/// centred on `octave`, ascending.
fn spread_tones(notes: &[f64], octave: i32) -> Vec<f64> {
    let mut classes: Vec<f64> =
        notes.iter().map(|n| n.rem_euclid(12.0)).collect();
    classes.sort_by(|a, b| a.total_cmp(b));
    classes.dedup();

    let mut tones = Vec::with_capacity(classes.len() * 3);
    for oct in (octave - 1)..=(octave + 1) {
        let base = f64::from((oct + 1) * 12);
        for &pc in &classes {
            tones.push(base + pc);
        }
    }

    tones
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::within_tolerance;

    #[test]
    fn diatonic_qualities_in_ionian() {
        let qualities: Vec<ChordQuality> = (0..7)
            .map(|deg| Chord::diatonic(Note::C, Mode::Ionian, deg, Octave::C3).quality())
            .collect();

        assert_eq!(
            qualities,
            vec![
                ChordQuality::Maj7,
                ChordQuality::Min7,
                ChordQuality::Min7,
                ChordQuality::Maj7,
                ChordQuality::Dom7,
                ChordQuality::Min7,
                ChordQuality::HalfDim7,
            ]
        );
    }

    #[test]
    fn diatonic_chord_wraps_the_octave() {
        // degree 7 in C ionian stacks B-D-F-A across the octave boundary
        let chord = Chord::diatonic(Note::C, Mode::Ionian, 6, Octave::C3);
        let notes = chord.notes();

        assert_eq!(notes.len(), NOTES_PER_CHORD);
        assert!(notes.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(chord.root_name(), "B");
    }

    #[test]
    fn voice_lead_picks_nearest_octave() {
        // target a 5th below the sounding voice: the upper octave is closer
        let led = voice_lead(&[60.0], &[53.0]);
        assert!(within_tolerance(led[0], 65.0, f64::EPSILON));

        // equidistant: lower octave wins
        let led = voice_lead(&[60.0], &[54.0]);
        assert!(within_tolerance(led[0], 54.0, f64::EPSILON));
    }

    #[test]
    fn voice_lead_stays_in_register() {
        let current = vec![VOICE_REGISTER_LOW; 4];
        let target = vec![20.0, 30.0, 100.0, 110.0];

        for pitch in voice_lead(&current, &target) {
            assert!((VOICE_REGISTER_LOW..=VOICE_REGISTER_HIGH)
                .contains(&pitch));
        }
    }

    #[test]
    fn inversion_only_when_previous_bass_exists() {
        let chord = Chord::diatonic(Note::C, Mode::Ionian, 0, Octave::C3);
        let root_bass = chord.bass_note();

        assert!(within_tolerance(
            chord.select_inversion(None),
            root_bass,
            f64::EPSILON
        ));

        // previous bass on E: the chord's 3rd is the closest bass tone
        let inverted = chord.select_inversion(Some(40.0));
        assert!(within_tolerance(inverted, 40.0, f64::EPSILON));
    }

    #[test]
    fn secondary_dominant_structure() {
        let target = Chord::diatonic(Note::C, Mode::Ionian, 4, Octave::C3); // G7
        let dominant = Chord::secondary_dominant(&target, target.scale_tones());

        assert!(dominant.is_secondary_dominant());
        assert_eq!(dominant.quality(), ChordQuality::Dom7);
        assert_eq!(dominant.degree(), None);
        assert_eq!(dominant.resolves_degree(), Some(5));
        assert_eq!(dominant.root_name(), "D");

        // the melodic pool is the surrounding diatonic scale, untouched
        assert_eq!(dominant.scale_tones(), target.scale_tones());

        let notes = dominant.notes();
        assert!(within_tolerance(notes[1] - notes[0], 4.0, f64::EPSILON));
        assert!(within_tolerance(notes[2] - notes[0], 7.0, f64::EPSILON));
        assert!(within_tolerance(notes[3] - notes[0], 10.0, f64::EPSILON));
    }
}
