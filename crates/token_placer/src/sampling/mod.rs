//! Random feasible-point sampling and small randomness helpers.
//!
//! All randomness in the crate flows through an explicit `&mut dyn RngCore`, so a seeded
//! generator reproduces sampling, mutation and crossover exactly.
use rand::RngCore;

pub mod rejection;

pub use rejection::{RejectionSampler, DEFAULT_MAX_ATTEMPTS};

/// Generate a random float in the range [0, 1).
#[inline]
pub(crate) fn rand01(rng: &mut dyn RngCore) -> f64 {
    // 53 high bits fill the mantissa exactly.
    (rng.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}

/// Uniform float in `[lo, hi)`; returns `lo` for an empty range.
#[inline]
pub(crate) fn rand_range(rng: &mut dyn RngCore, lo: f64, hi: f64) -> f64 {
    lo + (hi - lo) * rand01(rng)
}

/// Fair coin flip.
#[inline]
pub(crate) fn rand_bool(rng: &mut dyn RngCore) -> bool {
    rand01(rng) < 0.5
}

/// Uniform index in `0..n`. `n` must be positive.
#[inline]
pub(crate) fn rand_index(rng: &mut dyn RngCore, n: usize) -> usize {
    debug_assert!(n > 0);
    ((rand01(rng) * n as f64) as usize).min(n - 1)
}

/// Random non-empty subset of `0..n`: size uniform in `1..=n`, members uniform without
/// replacement. Returns an empty vector for `n == 0`.
pub(crate) fn rand_subset(rng: &mut dyn RngCore, n: usize) -> Vec<usize> {
    if n == 0 {
        return Vec::new();
    }
    let size = 1 + rand_index(rng, n);
    let mut indices: Vec<usize> = (0..n).collect();
    // Partial Fisher-Yates: the first `size` slots end up as a uniform sample.
    for i in 0..size {
        let j = i + rand_index(rng, n - i);
        indices.swap(i, j);
    }
    indices.truncate(size);
    indices
}


#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::test_rng::FixedRng;
    use super::*;

    #[test]
    fn rand01_returns_zero_for_zero_input() {
        let mut rng = FixedRng { value: 0 };
        assert_eq!(rand01(&mut rng), 0.0);
    }

    #[test]
    fn rand01_stays_below_one() {
        let mut rng = FixedRng { value: u64::MAX };
        let result = rand01(&mut rng);
        assert!(result < 1.0);
        assert!(result > 0.999_999);
    }

    #[test]
    fn rand_index_covers_range_ends() {
        let mut low = FixedRng { value: 0 };
        assert_eq!(rand_index(&mut low, 7), 0);
        let mut high = FixedRng { value: u64::MAX };
        assert_eq!(rand_index(&mut high, 7), 6);
    }

    #[test]
    fn rand_range_is_affine() {
        let mut rng = FixedRng::at(0.5);
        let v = rand_range(&mut rng, 10.0, 20.0);
        assert!((v - 15.0).abs() < 1e-9);
    }

    #[test]
    fn rand_subset_is_non_empty_and_distinct() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen_sizes = [false; 5];
        for _ in 0..500 {
            let subset = rand_subset(&mut rng, 4);
            assert!((1..=4).contains(&subset.len()));
            let mut sorted = subset.clone();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(sorted.len(), subset.len());
            assert!(subset.iter().all(|&i| i < 4));
            seen_sizes[subset.len()] = true;
        }
        assert!(seen_sizes[1..].iter().all(|&s| s));
    }

    #[test]
    fn rand_subset_of_nothing_is_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(rand_subset(&mut rng, 0).is_empty());
    }
}
