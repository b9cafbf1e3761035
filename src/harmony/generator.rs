//! The Markov-chain progression generator.

use super::{weighted_pick, Mood, MoodProfile, Progression};
use crate::musical::{Chord, Mode, Note, Octave};
use crate::settings::{HARMONIC_RHYTHM_FAST, HARMONIC_RHYTHM_SLOW};
use crate::util::lerp;
use rand::Rng;
use tracing::debug;

/// The degrees a secondary dominant may be inserted before (ii, IV, V, vi).
const RESOLVABLE_DEGREES: [u8; 4] = [2, 4, 5, 6];

/// Generates a fresh progression for the given environmental conditions.
///
/// `category` is the raw environmental category string (it selects the
/// mood, falling back to calm when unknown), and `pressure_norm` is the
/// pressure-derived value in `0.0..=1.0` which sets the harmonic rhythm:
/// low pressure changes chords quickly, high pressure slowly.
///
/// This never fails: every input produces a playable progression.
pub fn generate(
    root: Note,
    mode: Mode,
    category: &str,
    pressure_norm: f64,
) -> Progression {
    generate_with(&mut rand::rng(), root, mode, category, pressure_norm)
}

/// [`generate`] with an explicit RNG, for reproducible output.
pub fn generate_with<R: Rng + ?Sized>(
    rng: &mut R,
    root: Note,
    mode: Mode,
    category: &str,
    pressure_norm: f64,
) -> Progression {
    let mood = Mood::from_category(category);
    let rhythm = harmonic_rhythm_for(category, pressure_norm);

    debug!(%mood, rhythm, "generating progression");

    generate_from_profile(rng, root, mode, mood.profile(), rhythm)
}

/// Generates a progression from an explicit profile (e.g. one loaded via
/// [`load_profiles`](super::load_profiles)) and harmonic rhythm.
pub fn generate_from_profile<R: Rng + ?Sized>(
    rng: &mut R,
    root: Note,
    mode: Mode,
    profile: &MoodProfile,
    harmonic_rhythm: f64,
) -> Progression {
    let degrees = markov_walk(rng, profile);

    // one diatonic chord per degree
    let diatonic: Vec<Chord> = degrees
        .iter()
        .map(|&deg| Chord::diatonic(root, mode, deg, Octave::default()))
        .collect();

    let mut chords = inject_secondary_dominants(rng, diatonic, profile);

    // inversion pass: each bass note minimizes the leap from the bass note
    // already chosen for the previous chord
    let mut previous_bass = None;
    for chord in &mut chords {
        let bass = chord.select_inversion(previous_bass);
        chord.set_bass(bass);
        previous_bass = Some(bass);
    }

    debug!(len = chords.len(), "progression ready");

    Progression::new(chords, harmonic_rhythm)
}

/// Computes beats-per-chord for the given category and normalized
/// pressure. Thunderstorms are pinned to the fastest rhythm and snow to
/// the slowest; everything else interpolates between the two, with low
/// pressure moving fast and high pressure slow.
fn harmonic_rhythm_for(category: &str, pressure_norm: f64) -> f64 {
    match category.to_ascii_lowercase().as_str() {
        "thunderstorm" => HARMONIC_RHYTHM_FAST,
        "snow" => HARMONIC_RHYTHM_SLOW,
        _ => lerp(HARMONIC_RHYTHM_FAST, HARMONIC_RHYTHM_SLOW, pressure_norm),
    }
}

/// Draws a degree sequence (0-based indices) of a length sampled from the
/// profile's range: a weighted starting degree, then repeated draws from
/// the current degree's transition row with the current degree excluded,
/// so the walk never repeats a degree back-to-back.
fn markov_walk<R: Rng + ?Sized>(
    rng: &mut R,
    profile: &MoodProfile,
) -> Vec<usize> {
    let [min, max] = profile.length_range;
    let length = rng.random_range(min..=max);

    let mut degrees = Vec::with_capacity(length);
    let mut current = weighted_pick(rng, &profile.starting_weights, None);
    degrees.push(current);

    while degrees.len() < length {
        current = weighted_pick(
            rng,
            &profile.transitions[current],
            Some(current),
        );
        degrees.push(current);
    }

    degrees
}

/// Inserts a secondary dominant before each chord whose degree is in
/// [`RESOLVABLE_DEGREES`] with the profile's injection probability. Two
/// secondary dominants are never adjacent, so every insertion resolves
/// directly into its diatonic target.
fn inject_secondary_dominants<R: Rng + ?Sized>(
    rng: &mut R,
    diatonic: Vec<Chord>,
    profile: &MoodProfile,
) -> Vec<Chord> {
    let probability = profile.secondary_dominant_probability.clamp(0.0, 1.0);
    let mut chords = Vec::with_capacity(diatonic.len());

    for chord in diatonic {
        let resolvable = chord
            .degree()
            .is_some_and(|deg| RESOLVABLE_DEGREES.contains(&deg));
        let after_dominant = chords
            .last()
            .is_some_and(|prev: &Chord| prev.is_secondary_dominant());

        if resolvable && !after_dominant && rng.random_bool(probability) {
            chords
                .push(Chord::secondary_dominant(&chord, chord.scale_tones()));
        }

        chords.push(chord);
    }

    chords
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn base_degrees(progression: &Progression) -> Vec<u8> {
        progression
            .chords()
            .iter()
            .filter_map(|c| c.degree())
            .collect()
    }

    #[test]
    fn base_length_stays_within_mood_range() {
        let mut rng = StdRng::seed_from_u64(10);

        for (category, mood) in [
            ("clear", Mood::Bright),
            ("rain", Mood::Melancholy),
            ("thunderstorm", Mood::Tense),
            ("snow", Mood::Mysterious),
            ("clouds", Mood::Calm),
        ] {
            let [min, max] = mood.profile().length_range;

            for _ in 0..50 {
                let progression = generate_with(
                    &mut rng,
                    Note::C,
                    Mode::Ionian,
                    category,
                    0.5,
                );
                let base_len = base_degrees(&progression).len();
                assert!(
                    (min..=max).contains(&base_len),
                    "{category}: base length {base_len} outside [{min}, {max}]"
                );
            }
        }
    }

    #[test]
    fn walk_never_repeats_a_degree_immediately() {
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..200 {
            let progression =
                generate_with(&mut rng, Note::D, Mode::Dorian, "rain", 0.3);
            let degrees = base_degrees(&progression);

            assert!(degrees.windows(2).all(|w| w[0] != w[1]));
        }
    }

    #[test]
    fn secondary_dominants_resolve_into_allowed_degrees() {
        let mut rng = StdRng::seed_from_u64(12);

        for _ in 0..200 {
            // tense has the highest injection rate
            let progression = generate_with(
                &mut rng,
                Note::A,
                Mode::Aeolian,
                "thunderstorm",
                0.0,
            );
            let chords = progression.chords();

            for (i, chord) in chords.iter().enumerate() {
                if !chord.is_secondary_dominant() {
                    continue;
                }

                let next = &chords[i + 1]; // never last: it must resolve
                assert!(!next.is_secondary_dominant());
                assert!(RESOLVABLE_DEGREES
                    .contains(&next.degree().unwrap()));
                assert_eq!(chord.resolves_degree(), next.degree());

                // melodic pool stays diatonic through the insertion
                assert_eq!(chord.scale_tones(), next.scale_tones());
            }
        }
    }

    #[test]
    fn harmonic_rhythm_tracks_category_and_pressure() {
        assert!((harmonic_rhythm_for("thunderstorm", 0.9)
            - HARMONIC_RHYTHM_FAST)
            .abs()
            < f64::EPSILON);
        assert!((harmonic_rhythm_for("snow", 0.1) - HARMONIC_RHYTHM_SLOW)
            .abs()
            < f64::EPSILON);

        let mid = harmonic_rhythm_for("clear", 0.5);
        assert!(mid > HARMONIC_RHYTHM_FAST && mid < HARMONIC_RHYTHM_SLOW);
        assert!(
            harmonic_rhythm_for("clear", 0.1)
                < harmonic_rhythm_for("clear", 0.9)
        );
    }

    #[test]
    fn calm_starting_degrees_approximate_their_weights() {
        let mut rng = StdRng::seed_from_u64(13);
        let weights = &Mood::Calm.profile().starting_weights;
        let total: f64 = weights.iter().sum();

        let mut tonic_starts = 0usize;
        const RUNS: usize = 1000;

        for _ in 0..RUNS {
            let progression =
                generate_with(&mut rng, Note::C, Mode::Ionian, "clouds", 0.5);
            if base_degrees(&progression)[0] == 1 {
                tonic_starts += 1;
            }
        }

        let expected = weights[0] / total;
        let observed = tonic_starts as f64 / RUNS as f64;
        assert!(
            (observed - expected).abs() < 0.05,
            "expected ~{expected:.3}, observed {observed:.3}"
        );
    }

    #[test]
    fn playback_sees_no_further_randomness() {
        // identical seeds produce identical progressions
        let mut a = StdRng::seed_from_u64(14);
        let mut b = StdRng::seed_from_u64(14);

        let pa = generate_with(&mut a, Note::E, Mode::Phrygian, "mist", 0.7);
        let pb = generate_with(&mut b, Note::E, Mode::Phrygian, "mist", 0.7);

        assert_eq!(pa.len(), pb.len());
        for (ca, cb) in pa.chords().iter().zip(pb.chords()) {
            assert_eq!(ca.notes(), cb.notes());
            assert!((ca.bass_note() - cb.bass_note()).abs() < f64::EPSILON);
        }
    }
}
