//! Almost Stochastic Order test for a pair of samples
//!
//! The test bounds the violation ratio `eps_W2(A, B)` from above:
//!
//! ```text
//! const1      = sqrt(|A| |B| / (|A| + |B|))
//! epsilon_min = clamp(v - sigma_hat / const1 * Φ⁻¹(confidence_level), 0, 1)
//! ```
//!
//! where `v` is the violation ratio of the original samples and `sigma_hat`
//! its bootstrap spread. An `epsilon_min` below 0.5 means A is almost
//! stochastically larger than B.

use aso_bootstrap::{BootstrapConfig, BootstrapEngine, BootstrapEstimates};
use aso_core::math::distributions::normal;
use aso_core::{validate_scores, CancellationFlag, Error, Result, SharedProgress};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Threshold below which the null hypothesis is rejected
pub const DEFAULT_REJECTION_THRESHOLD: f64 = 0.5;

/// Configuration of a pairwise ASO test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AsoConfig {
    /// Probability passed to the standard normal quantile; in (0, 1]
    pub confidence_level: f64,
    /// Bootstrap parameters
    pub bootstrap: BootstrapConfig,
}

impl Default for AsoConfig {
    fn default() -> Self {
        Self {
            confidence_level: 0.05,
            bootstrap: BootstrapConfig::default(),
        }
    }
}

impl AsoConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the confidence level
    pub fn with_confidence_level(mut self, confidence_level: f64) -> Self {
        self.confidence_level = confidence_level;
        self
    }

    /// Replace the bootstrap parameters
    pub fn with_bootstrap(mut self, bootstrap: BootstrapConfig) -> Self {
        self.bootstrap = bootstrap;
        self
    }

    /// Set the resample size
    pub fn with_num_samples(mut self, num_samples: usize) -> Self {
        self.bootstrap.num_samples = num_samples;
        self
    }

    /// Set the number of bootstrap iterations
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.bootstrap.num_bootstrap_iterations = iterations;
        self
    }

    /// Set the integration step
    pub fn with_dt(mut self, dt: f64) -> Self {
        self.bootstrap.dt = dt;
        self
    }

    /// Set the worker count
    pub fn with_num_jobs(mut self, num_jobs: usize) -> Self {
        self.bootstrap.num_jobs = num_jobs;
        self
    }

    /// Set the base seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.bootstrap.seed = Some(seed);
        self
    }

    /// Check every parameter
    pub fn validate(&self) -> Result<()> {
        validate_confidence_level(self.confidence_level)?;
        self.bootstrap.validate()
    }
}

pub(crate) fn validate_confidence_level(confidence_level: f64) -> Result<()> {
    if !(confidence_level > 0.0 && confidence_level <= 1.0) {
        return Err(Error::out_of_range(
            "confidence_level",
            confidence_level,
            "(0, 1]",
        ));
    }
    Ok(())
}

/// Outcome of a pairwise ASO test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsoResult {
    /// Upper bound on the violation ratio, in [0, 1]
    pub epsilon_min: f64,
    /// Violation ratio of the original samples
    pub violation_ratio: f64,
    /// Bootstrap standard deviation of the scaled violation ratio
    pub sigma_hat: f64,
    /// `sqrt(|A| |B| / (|A| + |B|))`
    pub const1: f64,
    /// Confidence level used for the bound
    pub confidence_level: f64,
    /// Raw bootstrap output
    pub bootstrap: BootstrapEstimates,
}

impl AsoResult {
    /// Whether `epsilon_min` falls below `threshold`
    pub fn rejects_null(&self, threshold: f64) -> bool {
        self.epsilon_min < threshold
    }

    /// Whether A is almost stochastically larger than B at the usual 0.5
    pub fn is_significant(&self) -> bool {
        self.rejects_null(DEFAULT_REJECTION_THRESHOLD)
    }
}

/// `sqrt(n_a n_b / (n_a + n_b))`
pub fn sample_size_constant(n_a: usize, n_b: usize) -> f64 {
    let (n_a, n_b) = (n_a as f64, n_b as f64);
    (n_a * n_b / (n_a + n_b)).sqrt()
}

/// Confidence bound on the violation ratio, clamped to [0, 1]
///
/// A zero `sigma_hat` contributes no margin, whatever the confidence level.
pub fn epsilon_min_bound(
    violation_ratio: f64,
    sigma_hat: f64,
    const1: f64,
    confidence_level: f64,
) -> Result<f64> {
    validate_confidence_level(confidence_level)?;
    let margin = if sigma_hat == 0.0 {
        0.0
    } else {
        sigma_hat / const1 * normal::ppf(confidence_level)?
    };
    let bound = violation_ratio - margin;
    if bound.is_nan() {
        return Err(Error::InvalidArgument(format!(
            "Confidence bound is undefined for violation ratio {violation_ratio} and sigma {sigma_hat}"
        )));
    }
    Ok(bound.clamp(0.0, 1.0))
}

/// Pairwise Almost Stochastic Order test
#[derive(Debug, Clone, Default)]
pub struct AsoTest {
    config: AsoConfig,
    engine: BootstrapEngine,
}

impl AsoTest {
    /// Create a test with the given configuration
    pub fn new(config: AsoConfig) -> Self {
        let engine = BootstrapEngine::new(config.bootstrap.clone());
        Self { config, engine }
    }

    /// Notify `observer` once per bootstrap iteration
    pub fn with_observer(mut self, observer: SharedProgress) -> Self {
        self.engine = self.engine.with_observer(observer);
        self
    }

    /// Attach an optional observer
    pub fn with_optional_observer(mut self, observer: Option<SharedProgress>) -> Self {
        self.engine = self.engine.with_optional_observer(observer);
        self
    }

    /// Abort the bootstrap once `flag` is raised
    pub fn with_cancellation(mut self, flag: CancellationFlag) -> Self {
        self.engine = self.engine.with_cancellation(flag);
        self
    }

    /// Attach an optional cancellation flag
    pub fn with_optional_cancellation(mut self, flag: Option<CancellationFlag>) -> Self {
        self.engine = self.engine.with_optional_cancellation(flag);
        self
    }

    /// Configuration of this test
    pub fn config(&self) -> &AsoConfig {
        &self.config
    }

    /// Test whether `scores_a` is almost stochastically larger than `scores_b`
    #[instrument(skip(self, scores_a, scores_b), fields(
        n_a = scores_a.len(),
        n_b = scores_b.len(),
        confidence_level = self.config.confidence_level
    ))]
    pub fn run(&self, scores_a: &[f64], scores_b: &[f64]) -> Result<AsoResult> {
        self.config.validate()?;
        validate_scores(scores_a, "scores_a")?;
        validate_scores(scores_b, "scores_b")?;

        let const1 = sample_size_constant(scores_a.len(), scores_b.len());
        let bootstrap = self.engine.run(scores_a, scores_b)?;
        let epsilon_min = epsilon_min_bound(
            bootstrap.baseline,
            bootstrap.sigma_hat,
            const1,
            self.config.confidence_level,
        )?;

        debug!(
            const1,
            violation_ratio = bootstrap.baseline,
            sigma_hat = bootstrap.sigma_hat,
            epsilon_min,
            "ASO test finished"
        );

        Ok(AsoResult {
            epsilon_min,
            violation_ratio: bootstrap.baseline,
            sigma_hat: bootstrap.sigma_hat,
            const1,
            confidence_level: self.config.confidence_level,
            bootstrap,
        })
    }
}
