//! Bootstrap configuration

use aso_core::{Error, Result};
use aso_quantile::ViolationRatioCalculator;
use serde::{Deserialize, Serialize};

/// Parameters of a bootstrap run
///
/// Defaults: 1000 draws per resample, 1000 iterations, `dt = 0.005`, a
/// single worker and no fixed seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Number of values drawn for each resample
    pub num_samples: usize,
    /// Number of bootstrap iterations
    pub num_bootstrap_iterations: usize,
    /// Integration step of the violation ratio
    pub dt: f64,
    /// Worker count; 1 runs sequentially
    pub num_jobs: usize,
    /// Base seed; iteration `k` is seeded with `seed + k + 1`
    pub seed: Option<u64>,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            num_samples: 1000,
            num_bootstrap_iterations: 1000,
            dt: 0.005,
            num_jobs: 1,
            seed: None,
        }
    }
}

impl BootstrapConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the resample size
    pub fn with_num_samples(mut self, num_samples: usize) -> Self {
        self.num_samples = num_samples;
        self
    }

    /// Set the number of bootstrap iterations
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.num_bootstrap_iterations = iterations;
        self
    }

    /// Set the integration step
    pub fn with_dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }

    /// Set the worker count
    pub fn with_num_jobs(mut self, num_jobs: usize) -> Self {
        self.num_jobs = num_jobs;
        self
    }

    /// Set the base seed for reproducible runs
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check every parameter; called before any bootstrap work starts
    pub fn validate(&self) -> Result<()> {
        if self.num_samples == 0 {
            return Err(Error::non_positive("num_samples", self.num_samples));
        }
        if self.num_bootstrap_iterations == 0 {
            return Err(Error::non_positive(
                "num_bootstrap_iterations",
                self.num_bootstrap_iterations,
            ));
        }
        ViolationRatioCalculator::new(self.dt)?;
        if self.num_jobs == 0 {
            return Err(Error::InvalidArgument(format!(
                "Number of jobs has to be at least 1, {} found",
                self.num_jobs
            )));
        }
        Ok(())
    }

    /// Seed for iteration `k`, if the run is seeded
    pub fn iteration_seed(&self, k: usize) -> Option<u64> {
        self.seed.map(|base| iteration_seed(base, k))
    }
}

/// Seed of iteration `k` derived from a base seed
///
/// Each iteration owns its RNG, so the bootstrap samples depend only on the
/// base seed and the iteration index, never on scheduling.
#[inline]
pub fn iteration_seed(base: u64, k: usize) -> u64 {
    base.wrapping_add(k as u64).wrapping_add(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BootstrapConfig::default();
        assert_eq!(config.num_samples, 1000);
        assert_eq!(config.num_bootstrap_iterations, 1000);
        assert_eq!(config.dt, 0.005);
        assert_eq!(config.num_jobs, 1);
        assert_eq!(config.seed, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = BootstrapConfig::new()
            .with_num_samples(50)
            .with_iterations(10)
            .with_dt(0.1)
            .with_num_jobs(4)
            .with_seed(7);
        assert_eq!(config.num_samples, 50);
        assert_eq!(config.num_bootstrap_iterations, 10);
        assert_eq!(config.dt, 0.1);
        assert_eq!(config.num_jobs, 4);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_validation_failures() {
        let base = BootstrapConfig::default();
        for bad in [
            base.clone().with_num_samples(0),
            base.clone().with_iterations(0),
            base.clone().with_dt(0.0),
            base.clone().with_dt(-0.5),
            base.clone().with_dt(f64::NAN),
            base.clone().with_dt(1e-300),
            base.clone().with_num_jobs(0),
        ] {
            assert!(bad.validate().unwrap_err().is_invalid_argument());
        }
    }

    #[test]
    fn test_iteration_seeds() {
        let seeded = BootstrapConfig::default().with_seed(42);
        assert_eq!(seeded.iteration_seed(0), Some(43));
        assert_eq!(seeded.iteration_seed(9), Some(52));
        assert_eq!(BootstrapConfig::default().iteration_seed(0), None);

        let wrapping = BootstrapConfig::default().with_seed(u64::MAX);
        assert_eq!(wrapping.iteration_seed(0), Some(0));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: BootstrapConfig =
            serde_json::from_str(r#"{"num_jobs": 3, "seed": 11}"#).unwrap();
        assert_eq!(config.num_jobs, 3);
        assert_eq!(config.seed, Some(11));
        assert_eq!(config.num_samples, 1000);
    }
}
