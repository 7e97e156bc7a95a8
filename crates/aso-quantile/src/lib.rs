//! Empirical quantile functions and the violation ratio
//!
//! This crate provides the two leaf components of the Almost Stochastic
//! Order test:
//!
//! - **Empirical quantile function**: a right-continuous step inverse CDF
//!   built from a sorted sample, which doubles as an inverse-transform
//!   sampler for bootstrap resampling
//! - **Violation ratio**: the share of the squared Wasserstein distance
//!   between two distributions where stochastic order is violated
//!
//! # Example
//!
//! ```rust
//! use aso_quantile::{EmpiricalQuantile, QuantileFunction, violation_ratio};
//!
//! let q = EmpiricalQuantile::new(&[3.0, 1.0, 2.0]).unwrap();
//! assert_eq!(q.quantile(0.5), 2.0);
//! assert_eq!(q.quantile(1.0), 3.0);
//!
//! // A is dominated everywhere by B, so every bit of distance is a violation
//! let eps = violation_ratio(&[0.0, 1.0], &[5.0, 6.0], 0.01).unwrap();
//! assert_eq!(eps, 1.0);
//! ```

pub mod empirical;
pub mod traits;
pub mod violation;

// Re-export main types
pub use aso_core::{Error, Result};
pub use empirical::EmpiricalQuantile;
pub use traits::QuantileFunction;
pub use violation::{
    violation_ratio, ViolationRatio, ViolationRatioCalculator, MAX_INTEGRATION_STEPS,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        EmpiricalQuantile, QuantileFunction, Result, ViolationRatio, ViolationRatioCalculator,
    };
}
