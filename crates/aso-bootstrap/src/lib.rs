//! Bootstrap variance estimation for the Almost Stochastic Order test
//!
//! The [`BootstrapEngine`] computes the violation ratio of two samples, then
//! estimates its sampling spread by repeatedly resampling both inputs through
//! their empirical quantile functions. Iterations run on a sequential engine
//! or a dedicated Rayon pool depending on `num_jobs`.
//!
//! # Example
//!
//! ```rust
//! use aso_bootstrap::{BootstrapConfig, BootstrapEngine};
//!
//! let a = [0.6, 0.7, 0.75, 0.8, 0.9];
//! let b = [0.5, 0.55, 0.6, 0.7, 0.72];
//!
//! let config = BootstrapConfig::default()
//!     .with_num_samples(100)
//!     .with_iterations(50)
//!     .with_seed(1234);
//! let estimates = BootstrapEngine::new(config).run(&a, &b).unwrap();
//!
//! assert_eq!(estimates.samples.len(), 50);
//! assert!(estimates.sigma_hat >= 0.0);
//! ```

pub mod bootstrap;
pub mod config;

pub use aso_core::{Error, Result};
pub use bootstrap::{bootstrap, scaled_std_dev, BootstrapEngine, BootstrapEstimates};
pub use config::{iteration_seed, BootstrapConfig};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{BootstrapConfig, BootstrapEngine, BootstrapEstimates, Result};
}
