//! Mathematical utilities shared by the test statistics
//!
//! Thin wrappers over `statrs` plus a few log-domain helpers used by the
//! Bayes factor computation.

/// Distribution-related mathematical functions
pub mod distributions {
    /// Standard normal distribution utilities
    pub mod normal {
        use crate::{Error, Result};
        use statrs::distribution::{ContinuousCDF, Normal};

        fn standard() -> Result<Normal> {
            Normal::new(0.0, 1.0).map_err(|e| {
                Error::InvalidArgument(format!("Failed to create normal distribution: {e}"))
            })
        }

        /// Cumulative distribution function of the standard normal
        pub fn cdf(x: f64) -> Result<f64> {
            Ok(standard()?.cdf(x))
        }

        /// Inverse CDF (percent point function) of the standard normal
        ///
        /// `p = 0` maps to -inf and `p = 1` to +inf. Values outside [0, 1]
        /// are rejected.
        pub fn ppf(p: f64) -> Result<f64> {
            if !(0.0..=1.0).contains(&p) {
                return Err(Error::out_of_range("probability", p, "[0, 1]"));
            }
            if p == 0.0 {
                return Ok(f64::NEG_INFINITY);
            }
            if p == 1.0 {
                return Ok(f64::INFINITY);
            }
            Ok(standard()?.inverse_cdf(p))
        }

    }
}

/// Special functions
pub mod special {
    pub use statrs::function::erf::erf;
    pub use statrs::function::gamma::ln_gamma;

    /// `ln(exp(a) + exp(b))` without overflow; handles -inf operands
    pub fn ln_add_exp(a: f64, b: f64) -> f64 {
        if a == f64::NEG_INFINITY {
            return b;
        }
        if b == f64::NEG_INFINITY {
            return a;
        }
        let (hi, lo) = if a >= b { (a, b) } else { (b, a) };
        hi + (lo - hi).exp().ln_1p()
    }

    /// `exp(x)` clamped to `f64::MAX` instead of overflowing to infinity
    pub fn exp_clamped(x: f64) -> f64 {
        let value = x.exp();
        if value.is_infinite() {
            f64::MAX
        } else {
            value
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use approx::assert_relative_eq;

        #[test]
        fn test_ln_add_exp() {
            let direct = (2.0f64.exp() + 3.0f64.exp()).ln();
            assert_relative_eq!(ln_add_exp(2.0, 3.0), direct, epsilon = 1e-12);
            assert_relative_eq!(ln_add_exp(3.0, 2.0), direct, epsilon = 1e-12);
            assert_eq!(ln_add_exp(f64::NEG_INFINITY, 1.5), 1.5);
            assert_eq!(ln_add_exp(1.5, f64::NEG_INFINITY), 1.5);
            // Would overflow if computed naively
            assert_relative_eq!(ln_add_exp(1000.0, 1000.0), 1000.0 + 2f64.ln(), epsilon = 1e-12);
        }

        #[test]
        fn test_exp_clamped() {
            assert_eq!(exp_clamped(1000.0), f64::MAX);
            assert_relative_eq!(exp_clamped(1.0), std::f64::consts::E, epsilon = 1e-12);
        }

        #[test]
        fn test_reexported_special_functions() {
            assert_relative_eq!(erf(0.0), 0.0, epsilon = 1e-12);
            assert_relative_eq!(ln_gamma(5.0), 24f64.ln(), epsilon = 1e-10);
        }
    }
}
