//! Property-based tests for subst-math numerical functions.

use proptest::prelude::*;
use subst_math::{log_sum_exp, mean, softmax_percent, Rollup};

const TOL: f64 = 1e-9;

fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    if a.is_nan() || b.is_nan() {
        return false;
    }
    (a - b).abs() <= tol.max(tol * a.abs().max(b.abs()))
}

// ============================================================================
// log_sum_exp properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn log_sum_exp_commutative(a in -100.0..100.0f64, b in -100.0..100.0f64) {
        let ab = log_sum_exp(&[a, b]);
        let ba = log_sum_exp(&[b, a]);
        prop_assert!(approx_eq(ab, ba, TOL), "lse([{},{}])={} != {}", a, b, ab, ba);
    }

    /// The result is never below the largest input.
    #[test]
    fn log_sum_exp_bounds(values in prop::collection::vec(-500.0..500.0f64, 1..20)) {
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let out = log_sum_exp(&values);
        prop_assert!(out >= max - TOL);
        prop_assert!(out <= max + (values.len() as f64).ln() + TOL);
    }
}

// ============================================================================
// softmax_percent properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn softmax_sums_to_hundred(
        scores in prop::collection::vec(0.0..100.0f64, 1..30),
        temperature in 0.5..50.0f64,
    ) {
        let out = softmax_percent(&scores, temperature);
        prop_assert_eq!(out.len(), scores.len());
        let total: f64 = out.iter().sum();
        prop_assert!(approx_eq(total, 100.0, 1e-7), "total = {}", total);
        for p in &out {
            prop_assert!((0.0..=100.0 + TOL).contains(p));
        }
    }

    /// A higher score never gets a lower share.
    #[test]
    fn softmax_preserves_order(
        scores in prop::collection::vec(0.0..100.0f64, 2..30),
        temperature in 0.5..50.0f64,
    ) {
        let out = softmax_percent(&scores, temperature);
        for i in 0..scores.len() {
            for j in 0..scores.len() {
                if scores[i] > scores[j] {
                    prop_assert!(out[i] >= out[j]);
                }
            }
        }
    }

    /// Shifting every score by the same amount changes nothing.
    #[test]
    fn softmax_shift_invariant(
        scores in prop::collection::vec(0.0..100.0f64, 1..10),
        shift in -50.0..50.0f64,
    ) {
        let shifted: Vec<f64> = scores.iter().map(|s| s + shift).collect();
        let a = softmax_percent(&scores, 20.0);
        let b = softmax_percent(&shifted, 20.0);
        for (x, y) in a.iter().zip(b.iter()) {
            prop_assert!(approx_eq(*x, *y, 1e-7));
        }
    }
}

// ============================================================================
// Rollup properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn mean_within_min_and_max(values in prop::collection::vec(0.0..100.0f64, 1..50)) {
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let m = mean(&values);
        prop_assert!(m >= min - TOL && m <= max + TOL, "mean {} outside [{}, {}]", m, min, max);
    }

    #[test]
    fn rollup_matches_naive_sum(values in prop::collection::vec(0.0..100.0f64, 0..50)) {
        let rollup: Rollup = values.iter().copied().collect();
        let naive: f64 = values.iter().sum();
        prop_assert_eq!(rollup.count(), values.len());
        prop_assert!(approx_eq(rollup.sum(), naive, 1e-9));
    }

    /// Splitting the input and extending gives the same rollup.
    #[test]
    fn rollup_extend_is_concatenation(
        left in prop::collection::vec(0.0..100.0f64, 0..20),
        right in prop::collection::vec(0.0..100.0f64, 0..20),
    ) {
        let mut split: Rollup = left.iter().copied().collect();
        split.extend(right.iter().copied());
        let whole: Rollup = left.iter().chain(right.iter()).copied().collect();
        prop_assert_eq!(split.count(), whole.count());
        prop_assert!(approx_eq(split.sum(), whole.sum(), 1e-12));
    }
}
