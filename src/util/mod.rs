//! Global utility functions — these are publicly re-exported in `prelude.rs`.

pub mod timer;

pub use timer::TimerThread;

/// Maps a value from the provided input range to the provided output range.
#[inline]
pub fn map(
    value: f64,
    in_min: f64,
    in_max: f64,
    out_min: f64,
    out_max: f64,
) -> f64 {
    scale(normalize(value, in_min, in_max), out_min, out_max)
}

/// Scales a value to a provided range, assuming it is normalised.
///
/// Like `map()`, but with no input range.
#[inline]
pub fn scale(value: f64, min: f64, max: f64) -> f64 {
    value.mul_add(max - min, min)
}

/// Normalizes a value from a provided range.
///
/// Like `map()`, but with the output range set to `0.0 - 1.0`.
#[inline]
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    (value - min) / (max - min)
}

/// Linearly interpolates between `a` and `b` by `t`, where `t` is clamped
/// to `0.0 - 1.0`.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    scale(t.clamp(0.0, 1.0), a, b)
}

/// Returns whether the absolute difference between `value` and `target` is
/// no greater than the provided `tolerance` value. Useful for checking
/// approximate equality.
pub fn within_tolerance(value: f64, target: f64, tolerance: f64) -> bool {
    (value - target).abs() <= tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map() {
        assert!(within_tolerance(
            map(0.5, 0.0, 1.0, 2.0, 8.0),
            5.0,
            f64::EPSILON
        ));
        assert!(within_tolerance(
            map(2.0, 0.0, 4.0, -1.0, 1.0),
            0.0,
            f64::EPSILON
        ));
    }

    #[test]
    fn test_lerp_clamps() {
        assert!(within_tolerance(lerp(2.0, 8.0, -0.5), 2.0, f64::EPSILON));
        assert!(within_tolerance(lerp(2.0, 8.0, 1.5), 8.0, f64::EPSILON));
        assert!(within_tolerance(lerp(2.0, 8.0, 0.5), 5.0, f64::EPSILON));
    }
}
