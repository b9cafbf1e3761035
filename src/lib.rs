#![allow(
    clippy::module_name_repetitions,
    clippy::wildcard_imports,
    clippy::return_self_not_must_use,
    clippy::redundant_closure_for_method_calls
)]

// Note, mode, and chord models
pub mod musical;

// Mood profiles and the progression generator
pub mod harmony;

// Real-time progression playback
pub mod player;

// General utilities
pub mod util;

// Some widely-used re-exports
pub mod prelude;

// Crate-wide settings
pub mod settings;
