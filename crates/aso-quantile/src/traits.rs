//! Core traits for quantile functions

use rand::Rng;

/// A deterministic mapping from probability to value
///
/// Implementors are inverse CDFs. They must be monotonically non-decreasing
/// in `p`.
pub trait QuantileFunction {
    /// Evaluate the quantile function at probability `p`
    fn quantile(&self, p: f64) -> f64;

    /// Evaluate the quantile function at many probabilities
    fn quantiles(&self, ps: &[f64]) -> Vec<f64> {
        ps.iter().map(|&p| self.quantile(p)).collect()
    }

    /// Draw `n` values by inverse-transform sampling
    ///
    /// Each draw maps one uniform(0, 1) variate through the quantile function.
    fn inverse_transform_sample<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Vec<f64> {
        (0..n).map(|_| self.quantile(rng.gen::<f64>())).collect()
    }
}
