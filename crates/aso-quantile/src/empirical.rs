//! Empirical quantile function of a score sample

use crate::traits::QuantileFunction;
use aso_core::{sorted_copy, validate_scores, Error, Result};

/// Right-continuous step quantile function of an empirical distribution
///
/// For a sample of size `n` sorted ascending, the value at probability `p`
/// is the order statistic with 1-based index `ceil(n * p)`, clamped to
/// `[1, n]`. `p = 0` therefore yields the minimum and `p = 1` the maximum.
#[derive(Debug, Clone, PartialEq)]
pub struct EmpiricalQuantile {
    sorted: Vec<f64>,
}

impl EmpiricalQuantile {
    /// Build the quantile function of `scores`
    pub fn new(scores: &[f64]) -> Result<Self> {
        validate_scores(scores, "scores")?;
        Ok(Self {
            sorted: sorted_copy(scores),
        })
    }

    /// Build from data that is already sorted ascending
    pub fn from_sorted(sorted: Vec<f64>) -> Result<Self> {
        if sorted.is_empty() {
            return Err(Error::empty_sample("sorted scores"));
        }
        debug_assert!(
            sorted.windows(2).all(|w| w[0] <= w[1]),
            "from_sorted requires ascending input"
        );
        Ok(Self { sorted })
    }

    /// Build from scores that are known to be non-empty and finite
    ///
    /// Used on bootstrap resamples, whose values are drawn from an already
    /// validated sample.
    pub(crate) fn from_validated(mut scores: Vec<f64>) -> Self {
        debug_assert!(!scores.is_empty());
        scores.sort_unstable_by(|a, b| a.total_cmp(b));
        Self { sorted: scores }
    }

    /// Number of underlying observations
    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    /// Always false; an empirical quantile function has at least one point
    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    /// Underlying order statistics
    pub fn sorted(&self) -> &[f64] {
        &self.sorted
    }

    /// Smallest observation
    pub fn min(&self) -> f64 {
        self.sorted[0]
    }

    /// Largest observation
    pub fn max(&self) -> f64 {
        self.sorted[self.sorted.len() - 1]
    }
}

impl QuantileFunction for EmpiricalQuantile {
    #[inline]
    fn quantile(&self, p: f64) -> f64 {
        let n = self.sorted.len();
        let index = (n as f64 * p).ceil();
        // 1-based index clamped to [1, n]; NaN and negatives land on the minimum
        let idx = if index >= n as f64 {
            n - 1
        } else if index >= 1.0 {
            index as usize - 1
        } else {
            0
        };
        self.sorted[idx]
    }
}
