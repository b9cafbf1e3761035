//! Mood profiles: the static weight tables which give each environmental
//! mood its harmonic character.

use crate::settings::DEGREES_PER_SCALE;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;
use thiserror::Error;

/// The harmonic character applied to generation, derived one-to-one from
/// an environmental category.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mood {
    #[default]
    Calm,
    Bright,
    Melancholy,
    Tense,
    Mysterious,
}

impl Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Calm => write!(f, "calm"),
            Self::Bright => write!(f, "bright"),
            Self::Melancholy => write!(f, "melancholy"),
            Self::Tense => write!(f, "tense"),
            Self::Mysterious => write!(f, "mysterious"),
        }
    }
}

impl Mood {
    /// Maps an environmental category string to a mood. Unknown categories
    /// fall back to [`Mood::Calm`] so generation always succeeds.
    pub fn from_category(category: &str) -> Self {
        match category.to_ascii_lowercase().as_str() {
            "clear" => Self::Bright,
            "clouds" => Self::Calm,
            "rain" | "drizzle" => Self::Melancholy,
            "thunderstorm" => Self::Tense,
            "snow" | "mist" | "fog" | "haze" => Self::Mysterious,
            _ => Self::Calm,
        }
    }

    /// Parses a mood from its own name, as used by profile configuration
    /// keys. Unlike categories, an unknown *mood* name is a config error.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "calm" => Some(Self::Calm),
            "bright" => Some(Self::Bright),
            "melancholy" => Some(Self::Melancholy),
            "tense" => Some(Self::Tense),
            "mysterious" => Some(Self::Mysterious),
            _ => None,
        }
    }

    /// Returns the built-in profile for this mood.
    pub fn profile(&self) -> &'static MoodProfile {
        match self {
            Self::Calm => &CALM,
            Self::Bright => &BRIGHT,
            Self::Melancholy => &MELANCHOLY,
            Self::Tense => &TENSE,
            Self::Mysterious => &MYSTERIOUS,
        }
    }
}

/// Everything that parameterizes generation for one mood.
///
/// All weights are non-negative. The transition table is indexed
/// `transitions[from][to]` over 0-based degree indices; the self-weight on
/// the diagonal is ignored at selection time regardless of its value.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MoodProfile {
    pub starting_weights: [f64; DEGREES_PER_SCALE],
    pub transitions: [[f64; DEGREES_PER_SCALE]; DEGREES_PER_SCALE],
    /// Progression length `[min, max]`, inclusive, before any
    /// secondary-dominant insertions.
    pub length_range: [usize; 2],
    pub secondary_dominant_probability: f64,
}

/// Errors surfaced while loading mood profiles from JSON. The generation
/// path itself never errors; only configuration can.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to parse mood profile JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unknown mood name `{0}`")]
    UnknownMood(String),
    #[error("negative weight in profile `{0}`")]
    NegativeWeight(String),
    #[error("invalid length range {1:?} in profile `{0}`")]
    InvalidLengthRange(String, [usize; 2]),
}

/// Loads a set of mood profiles from JSON keyed by mood name, validating
/// weights and length ranges. Moods absent from the map keep their
/// built-in profiles when used with
/// [`generate_from_profile`](crate::harmony::generate_from_profile).
pub fn load_profiles(
    json: &str,
) -> Result<HashMap<Mood, MoodProfile>, ProfileError> {
    let raw: HashMap<String, MoodProfile> = serde_json::from_str(json)?;
    let mut profiles = HashMap::with_capacity(raw.len());

    for (name, profile) in raw {
        let mood = Mood::from_name(&name)
            .ok_or_else(|| ProfileError::UnknownMood(name.clone()))?;

        let weights_valid = profile.starting_weights.iter().all(|&w| w >= 0.0)
            && profile
                .transitions
                .iter()
                .flatten()
                .all(|&w| w >= 0.0)
            && profile.secondary_dominant_probability >= 0.0;
        if !weights_valid {
            return Err(ProfileError::NegativeWeight(name));
        }

        let [min, max] = profile.length_range;
        if min == 0 || min > max {
            return Err(ProfileError::InvalidLengthRange(
                name,
                profile.length_range,
            ));
        }

        profiles.insert(mood, profile);
    }

    Ok(profiles)
}

lazy_static! {
    static ref CALM: MoodProfile = MoodProfile {
        starting_weights: [8.0, 0.5, 1.0, 2.0, 1.0, 2.0, 0.5],
        transitions: [
            [0.0, 1.0, 1.0, 4.0, 2.0, 3.0, 0.5],
            [1.0, 0.0, 1.0, 1.0, 4.0, 1.0, 0.5],
            [1.0, 1.0, 0.0, 3.0, 1.0, 3.0, 0.5],
            [4.0, 1.0, 1.0, 0.0, 3.0, 1.0, 0.5],
            [5.0, 0.5, 0.5, 2.0, 0.0, 2.0, 0.5],
            [1.0, 2.0, 1.0, 3.0, 2.0, 0.0, 0.5],
            [5.0, 0.5, 1.0, 0.5, 1.0, 2.0, 0.0],
        ],
        length_range: [4, 8],
        secondary_dominant_probability: 0.10,
    };
    static ref BRIGHT: MoodProfile = MoodProfile {
        starting_weights: [6.0, 1.0, 1.0, 3.0, 3.0, 1.0, 0.5],
        transitions: [
            [0.0, 2.0, 1.0, 3.0, 4.0, 2.0, 1.0],
            [1.0, 0.0, 0.5, 1.0, 5.0, 1.0, 1.0],
            [1.0, 1.0, 0.0, 3.0, 1.0, 2.0, 0.5],
            [3.0, 1.0, 0.5, 0.0, 4.0, 1.0, 1.0],
            [6.0, 0.5, 0.5, 1.0, 0.0, 2.0, 0.5],
            [1.0, 3.0, 1.0, 2.0, 3.0, 0.0, 0.5],
            [6.0, 0.5, 0.5, 0.5, 1.0, 1.0, 0.0],
        ],
        length_range: [4, 8],
        secondary_dominant_probability: 0.15,
    };
    static ref MELANCHOLY: MoodProfile = MoodProfile {
        starting_weights: [2.0, 1.0, 1.0, 2.0, 1.0, 6.0, 1.0],
        transitions: [
            [0.0, 1.0, 2.0, 2.0, 1.0, 4.0, 0.5],
            [1.0, 0.0, 1.0, 1.0, 2.0, 3.0, 0.5],
            [1.0, 1.0, 0.0, 2.0, 1.0, 4.0, 0.5],
            [2.0, 1.0, 1.0, 0.0, 2.0, 3.0, 0.5],
            [2.0, 0.5, 1.0, 1.0, 0.0, 4.0, 0.5],
            [1.0, 2.0, 2.0, 3.0, 2.0, 0.0, 1.0],
            [2.0, 0.5, 2.0, 0.5, 1.0, 3.0, 0.0],
        ],
        length_range: [5, 9],
        secondary_dominant_probability: 0.12,
    };
    static ref TENSE: MoodProfile = MoodProfile {
        starting_weights: [1.0, 2.0, 1.0, 1.0, 3.0, 1.0, 4.0],
        transitions: [
            [0.0, 2.0, 1.0, 1.0, 3.0, 1.0, 3.0],
            [0.5, 0.0, 1.0, 1.0, 3.0, 1.0, 3.0],
            [1.0, 1.0, 0.0, 1.0, 2.0, 1.0, 3.0],
            [1.0, 2.0, 1.0, 0.0, 3.0, 0.5, 3.0],
            [2.0, 1.0, 1.0, 1.0, 0.0, 3.0, 2.0],
            [0.5, 2.0, 1.0, 1.0, 3.0, 0.0, 2.0],
            [3.0, 1.0, 2.0, 1.0, 3.0, 1.0, 0.0],
        ],
        length_range: [3, 6],
        secondary_dominant_probability: 0.25,
    };
    static ref MYSTERIOUS: MoodProfile = MoodProfile {
        starting_weights: [3.0, 1.0, 3.0, 1.0, 1.0, 2.0, 2.0],
        transitions: [
            [0.0, 3.0, 1.0, 2.0, 1.0, 1.0, 2.0],
            [2.0, 0.0, 3.0, 1.0, 1.0, 1.0, 1.0],
            [1.0, 2.0, 0.0, 3.0, 1.0, 1.0, 1.0],
            [1.0, 1.0, 2.0, 0.0, 3.0, 1.0, 1.0],
            [1.0, 1.0, 1.0, 2.0, 0.0, 3.0, 1.0],
            [1.0, 1.0, 1.0, 1.0, 2.0, 0.0, 3.0],
            [2.0, 1.0, 1.0, 1.0, 1.0, 2.0, 0.0],
        ],
        length_range: [6, 10],
        secondary_dominant_probability: 0.08,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_mapping_with_fallback() {
        assert_eq!(Mood::from_category("Thunderstorm"), Mood::Tense);
        assert_eq!(Mood::from_category("clear"), Mood::Bright);
        assert_eq!(Mood::from_category("volcanic ash"), Mood::Calm);
    }

    #[test]
    fn builtin_profiles_are_well_formed() {
        for mood in [
            Mood::Calm,
            Mood::Bright,
            Mood::Melancholy,
            Mood::Tense,
            Mood::Mysterious,
        ] {
            let profile = mood.profile();

            assert!(profile.starting_weights.iter().any(|&w| w > 0.0));
            for (from, row) in profile.transitions.iter().enumerate() {
                assert!(
                    row[from].abs() < f64::EPSILON,
                    "{mood} has a self-transition weight on degree {from}"
                );
                assert!(row.iter().all(|&w| w >= 0.0));
            }

            let [min, max] = profile.length_range;
            assert!(min >= 1 && min <= max);
            assert!((0.0..=1.0)
                .contains(&profile.secondary_dominant_probability));
        }
    }

    #[test]
    fn profiles_round_trip_through_json() {
        let json = serde_json::to_string(&HashMap::from([(
            "tense".to_string(),
            Mood::Tense.profile().clone(),
        )]))
        .unwrap();

        let loaded = load_profiles(&json).unwrap();
        let profile = &loaded[&Mood::Tense];
        assert_eq!(profile.length_range, [3, 6]);
    }

    #[test]
    fn load_rejects_unknown_mood_and_bad_weights() {
        let mut bad = Mood::Calm.profile().clone();
        let json = serde_json::to_string(&HashMap::from([(
            "serene".to_string(),
            bad.clone(),
        )]))
        .unwrap();
        assert!(matches!(
            load_profiles(&json),
            Err(ProfileError::UnknownMood(_))
        ));

        bad.transitions[0][3] = -1.0;
        let json = serde_json::to_string(&HashMap::from([(
            "calm".to_string(),
            bad,
        )]))
        .unwrap();
        assert!(matches!(
            load_profiles(&json),
            Err(ProfileError::NegativeWeight(_))
        ));
    }
}
