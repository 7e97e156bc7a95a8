//! Property-based tests for quantile functions and the violation ratio

use aso_quantile::{violation_ratio, EmpiricalQuantile, QuantileFunction, ViolationRatioCalculator};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

fn scores() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1.0e3..1.0e3f64, 1..60)
}

proptest! {
    // Property: quantile function is monotone and hits the extremes
    #[test]
    fn prop_quantile_monotone(data in scores(), mut ps in prop::collection::vec(0.0..=1.0f64, 2..40)) {
        let q = EmpiricalQuantile::new(&data).unwrap();
        ps.sort_by(|a, b| a.total_cmp(b));
        let values = q.quantiles(&ps);
        for w in values.windows(2) {
            prop_assert!(w[0] <= w[1]);
        }

        let max = data.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let min = data.iter().cloned().fold(f64::INFINITY, f64::min);
        prop_assert_eq!(q.quantile(1.0), max);
        prop_assert_eq!(q.quantile(1e-12), min);
    }

    // Property: a sample never violates order against itself
    #[test]
    fn prop_self_violation_is_zero(data in scores(), dt in 0.001..0.5f64) {
        prop_assert_eq!(violation_ratio(&data, &data, dt).unwrap(), 0.0);
    }

    // Property: the violation ratio is a proportion
    #[test]
    fn prop_violation_ratio_bounded(a in scores(), b in scores(), dt in 0.001..0.5f64) {
        let eps = violation_ratio(&a, &b, dt).unwrap();
        prop_assert!((0.0..=1.0).contains(&eps));
    }

    // Property: swapping the samples gives the complement unless degenerate
    #[test]
    fn prop_swap_complements(a in scores(), b in scores()) {
        let calc = ViolationRatioCalculator::new(0.01).unwrap();
        let ab = calc.compute(&a, &b).unwrap();
        let ba = calc.compute(&b, &a).unwrap();
        if !ab.degenerate {
            prop_assert!((ab.value + ba.value - 1.0).abs() < 1e-9);
        }
    }
}

#[test]
fn test_pointwise_dominance_converges_to_one() {
    // Every quantile of B exceeds the matching quantile of A
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let normal = Normal::new(0.0, 1.0).unwrap();
    let a: Vec<f64> = (0..200).map(|_| normal.sample(&mut rng)).collect();
    let b: Vec<f64> = a.iter().map(|x| x + 0.5).collect();

    for dt in [0.1, 0.01, 0.001] {
        assert_eq!(violation_ratio(&a, &b, dt).unwrap(), 1.0);
    }
}

#[test]
fn test_smaller_step_refines_estimate() {
    let a = [0.0, 1.0, 2.0, 3.0];
    let b = [1.5, 1.5, 1.5, 1.5];

    let coarse = violation_ratio(&a, &b, 0.3).unwrap();
    let fine = violation_ratio(&a, &b, 0.0001).unwrap();

    // Exact value: (1.5² + 0.5²) / (1.5² + 0.5² + 0.5² + 1.5²) = 0.5
    assert!((fine - 0.5).abs() < 1e-3, "fine estimate was {fine}");
    assert!((0.0..=1.0).contains(&coarse));
}
