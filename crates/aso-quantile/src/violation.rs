//! Violation ratio of two empirical distributions
//!
//! The violation ratio is the share of the squared 2-Wasserstein distance
//! between two score distributions that comes from the region where the
//! second distribution's quantiles exceed the first's:
//!
//! ```text
//! eps_W2(A, B) = ∫ max(Qb(p) - Qa(p), 0)² dp / ∫ (Qb(p) - Qa(p))² dp
//! ```
//!
//! Both integrals are evaluated with a left Riemann sum over
//! `p = 0, dt, 2·dt, … < 1`. `dt` is a precision/performance knob: smaller
//! steps cost more quantile evaluations and give a closer approximation, but
//! any positive step yields a well-defined statistic.

use crate::empirical::EmpiricalQuantile;
use crate::traits::QuantileFunction;
use aso_core::{validate_scores, Error, Result};
use tracing::warn;

/// Result of a violation ratio computation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViolationRatio {
    /// The violation ratio in [0, 1]
    pub value: f64,
    /// Integrated squared quantile difference
    pub squared_wasserstein: f64,
    /// Integrated squared positive part of the quantile difference
    pub violation_mass: f64,
    /// True when the squared Wasserstein distance was exactly zero and the
    /// value was set to 0 instead of dividing by zero
    pub degenerate: bool,
}

/// Accumulated integrals before division
struct ViolationParts {
    squared_wasserstein: f64,
    violation_mass: f64,
}

impl ViolationRatio {
    fn from_parts(parts: ViolationParts) -> Self {
        if parts.squared_wasserstein == 0.0 {
            warn!("Division by zero encountered in violation ratio, returning 0");
            return Self {
                value: 0.0,
                squared_wasserstein: 0.0,
                violation_mass: parts.violation_mass,
                degenerate: true,
            };
        }
        Self {
            value: parts.violation_mass / parts.squared_wasserstein,
            squared_wasserstein: parts.squared_wasserstein,
            violation_mass: parts.violation_mass,
            degenerate: false,
        }
    }
}

/// Largest quantile grid a calculator will integrate over
pub const MAX_INTEGRATION_STEPS: usize = 10_000_000;

/// Numerical integrator for the violation ratio at a fixed step size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViolationRatioCalculator {
    dt: f64,
    steps: usize,
}

impl ViolationRatioCalculator {
    /// Create a calculator integrating with step `dt`
    pub fn new(dt: f64) -> Result<Self> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(Error::InvalidArgument(format!(
                "dt must be a positive finite number, {dt} found"
            )));
        }
        // Same grid as `arange(0, 1, dt)`
        let steps = (1.0 / dt).ceil();
        if steps > MAX_INTEGRATION_STEPS as f64 {
            return Err(Error::InvalidArgument(format!(
                "dt = {dt} needs {steps} integration steps, at most {MAX_INTEGRATION_STEPS} allowed"
            )));
        }
        Ok(Self {
            dt,
            steps: steps as usize,
        })
    }

    /// Integration step
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Number of quantile evaluations per distribution
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Violation ratio of raw score samples
    pub fn compute(&self, scores_a: &[f64], scores_b: &[f64]) -> Result<ViolationRatio> {
        validate_scores(scores_a, "scores_a")?;
        validate_scores(scores_b, "scores_b")?;
        let qa = EmpiricalQuantile::new(scores_a)?;
        let qb = EmpiricalQuantile::new(scores_b)?;
        Ok(self.compute_quantiles(&qa, &qb))
    }

    /// Violation ratio of two bootstrap resamples
    ///
    /// The resamples must be non-empty and contain only values drawn from
    /// validated samples.
    pub fn compute_resampled(&self, resample_a: Vec<f64>, resample_b: Vec<f64>) -> ViolationRatio {
        let qa = EmpiricalQuantile::from_validated(resample_a);
        let qb = EmpiricalQuantile::from_validated(resample_b);
        self.compute_quantiles(&qa, &qb)
    }

    /// Violation ratio of two quantile functions
    pub fn compute_quantiles<A, B>(&self, qa: &A, qb: &B) -> ViolationRatio
    where
        A: QuantileFunction + ?Sized,
        B: QuantileFunction + ?Sized,
    {
        let mut parts = ViolationParts {
            squared_wasserstein: 0.0,
            violation_mass: 0.0,
        };

        for i in 0..self.steps {
            let p = i as f64 * self.dt;
            let diff = qb.quantile(p) - qa.quantile(p);
            parts.squared_wasserstein += diff * diff * self.dt;
            let violation = diff.max(0.0);
            parts.violation_mass += violation * violation * self.dt;
        }

        ViolationRatio::from_parts(parts)
    }
}

/// Violation ratio of `scores_a` against `scores_b` with integration step `dt`
pub fn violation_ratio(scores_a: &[f64], scores_b: &[f64], dt: f64) -> Result<f64> {
    Ok(ViolationRatioCalculator::new(dt)?
        .compute(scores_a, scores_b)?
        .value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_identical_samples_are_degenerate() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let calc = ViolationRatioCalculator::new(0.1).unwrap();
        let result = calc.compute(&a, &a).unwrap();

        assert_eq!(result.value, 0.0);
        assert!(result.degenerate);
    }

    #[test]
    fn test_dominating_first_sample_has_no_violation() {
        let a = vec![10.0; 100];
        let b = vec![0.0; 100];
        let result = ViolationRatioCalculator::new(0.005).unwrap().compute(&a, &b).unwrap();

        assert_eq!(result.value, 0.0);
        assert!(!result.degenerate);
        assert_abs_diff_eq!(result.squared_wasserstein, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_dominated_first_sample_is_full_violation() {
        let a = vec![0.0; 100];
        let b = vec![10.0; 100];
        assert_eq!(violation_ratio(&a, &b, 0.005).unwrap(), 1.0);
    }

    #[test]
    fn test_partial_violation() {
        // Qb - Qa = [-1, +1] on the two halves of [0, 1)
        let a = [1.0, 2.0];
        let b = [0.0, 3.0];
        let ratio = violation_ratio(&a, &b, 0.01).unwrap();
        assert_abs_diff_eq!(ratio, 0.5, epsilon = 0.02);
    }

    #[test]
    fn test_grid_size() {
        assert_eq!(ViolationRatioCalculator::new(0.1).unwrap().steps(), 10);
        assert_eq!(ViolationRatioCalculator::new(0.005).unwrap().steps(), 200);
        assert_eq!(ViolationRatioCalculator::new(0.3).unwrap().steps(), 4);
        assert_eq!(ViolationRatioCalculator::new(2.0).unwrap().steps(), 1);
    }

    #[test]
    fn test_invalid_dt() {
        for dt in [0.0, -0.1, f64::NAN, f64::INFINITY, 1e-300, f64::MIN_POSITIVE] {
            let err = ViolationRatioCalculator::new(dt).unwrap_err();
            assert!(err.is_invalid_argument());
        }
    }

    #[test]
    fn test_step_count_is_bounded() {
        let fine = ViolationRatioCalculator::new(1e-6).unwrap();
        assert!(fine.steps() >= 1_000_000 && fine.steps() <= MAX_INTEGRATION_STEPS);

        let err = ViolationRatioCalculator::new(1e-8).unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains("integration steps"));
    }

    #[test]
    fn test_empty_samples_rejected() {
        let calc = ViolationRatioCalculator::new(0.1).unwrap();
        assert!(calc.compute(&[], &[1.0]).is_err());
        assert!(calc.compute(&[1.0], &[]).is_err());
    }
}
