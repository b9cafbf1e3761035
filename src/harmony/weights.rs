//! Weighted random selection over scale degrees.

use rand::Rng;

/// Draws an index from `weights`, where each entry's chance is proportional
/// to its (non-negative) weight, optionally excluding one index.
///
/// This can never fail to return a value: if every remaining weight is zero
/// (or everything but the excluded index is), the draw falls back to a
/// uniform choice over the non-excluded indices. Only when `exclude` rules
/// out the *only* index is the excluded one returned.
pub fn weighted_pick<R: Rng + ?Sized>(
    rng: &mut R,
    weights: &[f64],
    exclude: Option<usize>,
) -> usize {
    let total: f64 = weights
        .iter()
        .enumerate()
        .filter(|&(i, &w)| Some(i) != exclude && w > 0.0)
        .map(|(_, &w)| w)
        .sum();

    if total > 0.0 {
        let mut target = rng.random_range(0.0..total);

        for (i, &w) in weights.iter().enumerate() {
            if Some(i) == exclude || w <= 0.0 {
                continue;
            }
            if target < w {
                return i;
            }
            target -= w;
        }
    }

    // degenerate row: uniform over whatever is left
    let candidates: Vec<usize> = (0..weights.len())
        .filter(|&i| Some(i) != exclude)
        .collect();

    match candidates.len() {
        0 => exclude.unwrap_or(0),
        n => candidates[rng.random_range(0..n)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn never_returns_excluded_index() {
        let mut rng = StdRng::seed_from_u64(0xC0FFEE);
        let weights = [1.0, 2.0, 3.0, 4.0];

        for _ in 0..500 {
            assert_ne!(weighted_pick(&mut rng, &weights, Some(2)), 2);
        }
    }

    #[test]
    fn zero_weight_entries_are_skipped() {
        let mut rng = StdRng::seed_from_u64(1);
        let weights = [0.0, 5.0, 0.0];

        for _ in 0..100 {
            assert_eq!(weighted_pick(&mut rng, &weights, None), 1);
        }
    }

    #[test]
    fn degenerate_row_falls_back_to_uniform() {
        let mut rng = StdRng::seed_from_u64(2);
        let weights = [0.0, 0.0, 0.0];

        for _ in 0..100 {
            let picked = weighted_pick(&mut rng, &weights, Some(0));
            assert!(picked == 1 || picked == 2);
        }
    }

    #[test]
    fn fully_excluded_single_entry_still_returns() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(weighted_pick(&mut rng, &[1.0], Some(0)), 0);
    }

    #[test]
    fn draw_approximates_weights() {
        let mut rng = StdRng::seed_from_u64(4);
        let weights = [1.0, 3.0];
        let mut hits = [0usize; 2];

        for _ in 0..4000 {
            hits[weighted_pick(&mut rng, &weights, None)] += 1;
        }

        let share = hits[1] as f64 / 4000.0;
        assert!((share - 0.75).abs() < 0.03, "share was {share}");
    }
}
