//! Bootstrap of the violation ratio
//!
//! Each iteration draws two resamples by inverse-transform sampling from the
//! empirical quantile functions of the inputs, then evaluates the violation
//! ratio on the resampled pair. Iterations are independent tasks:
//!
//! - every iteration seeds its own `StdRng` from the base seed and its index
//! - results are collected in iteration order whatever the worker count
//! - the progress observer is the only state shared between workers
//!
//! so a seeded run gives bit-identical output for any `num_jobs`.

use crate::config::{iteration_seed, BootstrapConfig};
use aso_core::{
    validate_scores, CancellationFlag, Error, ExecutionEngine, JobEngine, Result, SharedProgress,
};
use aso_quantile::{EmpiricalQuantile, QuantileFunction, ViolationRatioCalculator};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, instrument};

/// Output of a bootstrap run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BootstrapEstimates {
    /// Violation ratio of the original samples
    pub baseline: f64,
    /// Standard deviation of the scaled bootstrap deviations
    pub sigma_hat: f64,
    /// Violation ratio of every resampled pair, in iteration order
    pub samples: Vec<f64>,
    /// Resample size used for every draw
    pub num_samples: usize,
}

impl BootstrapEstimates {
    /// Number of bootstrap samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True if no bootstrap samples were recorded
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Mean of the bootstrap samples
    pub fn mean(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }
}

/// Bootstrap engine for the violation ratio of two samples
#[derive(Clone, Default)]
pub struct BootstrapEngine {
    config: BootstrapConfig,
    observer: Option<SharedProgress>,
    cancellation: Option<CancellationFlag>,
}

impl fmt::Debug for BootstrapEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapEngine")
            .field("config", &self.config)
            .field("observer", &self.observer.is_some())
            .field("cancellation", &self.cancellation)
            .finish()
    }
}

impl BootstrapEngine {
    /// Create an engine for the given configuration
    pub fn new(config: BootstrapConfig) -> Self {
        Self {
            config,
            observer: None,
            cancellation: None,
        }
    }

    /// Notify `observer` once per completed iteration
    pub fn with_observer(mut self, observer: SharedProgress) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Attach an optional observer
    pub fn with_optional_observer(mut self, observer: Option<SharedProgress>) -> Self {
        self.observer = observer;
        self
    }

    /// Abort the run once `flag` is raised
    pub fn with_cancellation(mut self, flag: CancellationFlag) -> Self {
        self.cancellation = Some(flag);
        self
    }

    /// Attach an optional cancellation flag
    pub fn with_optional_cancellation(mut self, flag: Option<CancellationFlag>) -> Self {
        self.cancellation = flag;
        self
    }

    /// Configuration of this engine
    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    /// Run the bootstrap for `scores_a` against `scores_b`
    ///
    /// Arguments are validated before any iteration starts. A raised
    /// cancellation flag discards every finished iteration and yields
    /// [`Error::Cancelled`].
    #[instrument(skip(self, scores_a, scores_b), fields(
        n_a = scores_a.len(),
        n_b = scores_b.len(),
        iterations = self.config.num_bootstrap_iterations,
        num_jobs = self.config.num_jobs
    ))]
    pub fn run(&self, scores_a: &[f64], scores_b: &[f64]) -> Result<BootstrapEstimates> {
        self.config.validate()?;
        validate_scores(scores_a, "scores_a")?;
        validate_scores(scores_b, "scores_b")?;

        let calculator = ViolationRatioCalculator::new(self.config.dt)?;
        let qa = EmpiricalQuantile::new(scores_a)?;
        let qb = EmpiricalQuantile::new(scores_b)?;
        let engine = JobEngine::for_jobs(self.config.num_jobs)?;

        let baseline = calculator.compute_quantiles(&qa, &qb).value;

        let num_samples = self.config.num_samples;
        let requested = self.config.num_bootstrap_iterations;
        let base_seed = self.config.seed.unwrap_or_else(|| thread_rng().gen());
        let observer = self.observer.as_ref();
        let cancellation = self.cancellation.as_ref();

        debug!(
            "Running {} bootstrap iterations on {} thread(s)",
            requested,
            engine.num_threads()
        );

        let results = engine.execute_batch(requested, |k| {
            if cancellation.map_or(false, CancellationFlag::is_cancelled) {
                return None;
            }
            let mut rng = StdRng::seed_from_u64(iteration_seed(base_seed, k));
            let resample_a = qa.inverse_transform_sample(&mut rng, num_samples);
            let resample_b = qb.inverse_transform_sample(&mut rng, num_samples);
            let ratio = calculator.compute_resampled(resample_a, resample_b).value;
            if let Some(observer) = observer {
                observer.on_iteration();
            }
            Some(ratio)
        });

        let completed = results.iter().filter(|r| r.is_some()).count();
        if completed < requested {
            debug!("Bootstrap cancelled after {} iterations", completed);
            return Err(Error::Cancelled {
                completed,
                requested,
            });
        }

        let samples: Vec<f64> = results.into_iter().flatten().collect();
        let sigma_hat = scaled_std_dev(&samples, baseline, num_samples);
        debug!(baseline, sigma_hat, "Bootstrap finished");

        Ok(BootstrapEstimates {
            baseline,
            sigma_hat,
            samples,
            num_samples,
        })
    }
}

/// Population standard deviation of `sqrt(num_samples / 2) * (s - baseline)`
///
/// Summation runs in slice order, so equal inputs give bit-identical output.
pub fn scaled_std_dev(samples: &[f64], baseline: f64, num_samples: usize) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let c2 = (num_samples as f64 / 2.0).sqrt();
    let n = samples.len() as f64;
    let mean = samples.iter().map(|s| c2 * (s - baseline)).sum::<f64>() / n;
    let variance = samples
        .iter()
        .map(|s| {
            let d = c2 * (s - baseline) - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    variance.sqrt()
}

/// Run a bootstrap with `config` and no observer
pub fn bootstrap(
    scores_a: &[f64],
    scores_b: &[f64],
    config: &BootstrapConfig,
) -> Result<BootstrapEstimates> {
    BootstrapEngine::new(config.clone()).run(scores_a, scores_b)
}
