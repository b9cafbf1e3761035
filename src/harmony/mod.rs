//! Harmony generation: mood profiles, weighted selection, and the
//! progression generator.

pub mod generator;
pub mod mood;
pub mod progression;
pub mod weights;

pub use generator::{generate, generate_from_profile, generate_with};
pub use mood::{load_profiles, Mood, MoodProfile, ProfileError};
pub use progression::Progression;
pub use weights::weighted_pick;
