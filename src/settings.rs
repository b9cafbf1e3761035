//! Crate-wide constants.

/// The default BPM used to convert musical-time beats to seconds when a
/// real-time transport drives the player.
pub const DEFAULT_BPM: f64 = 120.0;

/// The lowest pitch (MIDI note value) a voice-led upper voice may occupy.
///
/// Voice leading clamps every voice into
/// `VOICE_REGISTER_LOW..=VOICE_REGISTER_HIGH` so that repeated
/// nearest-octave moves can never drift a voice out of a playable register.
pub const VOICE_REGISTER_LOW: f64 = 48.0; // C3
/// The highest pitch (MIDI note value) a voice-led upper voice may occupy.
pub const VOICE_REGISTER_HIGH: f64 = 84.0; // C6

/// The bottom of the one-octave window bass notes are placed in, both for
/// root-position chords and for inversions.
pub const BASS_REGISTER_LOW: f64 = 36.0; // C2

/// The harmonic rhythm, in beats per chord, used when the environment calls
/// for the fastest harmonic motion (e.g. a thunderstorm).
pub const HARMONIC_RHYTHM_FAST: f64 = 2.0;
/// The harmonic rhythm, in beats per chord, used when the environment calls
/// for the slowest harmonic motion (e.g. snow).
pub const HARMONIC_RHYTHM_SLOW: f64 = 8.0;

/// It doesn't make much sense for consumers to lag many chord changes
/// behind the player, so the event channel is bounded at this size. When
/// the channel is full a new event is dropped rather than blocking the
/// advance.
pub const CHORD_EVENT_QUEUE_SIZE: usize = 64;

/// The number of scale degrees in every mode handled by this crate.
pub const DEGREES_PER_SCALE: usize = 7;

/// The number of octaves in the window chord tones and scale tones are
/// spread across. Centred on the chord's octave, so degree wraparound near
/// an octave boundary still lands on a defined pitch.
pub const TONE_WINDOW_OCTAVES: i32 = 3;
