//! Bayes factor for almost stochastic order
//!
//! The null hypothesis is `H0: eps_W2(A, B) > eps_min_threshold`. The
//! bootstrap violation ratios are modelled with a Normal-Inverse-Gamma (NIG)
//! prior over their mean and variance. A conjugate update gives the
//! posterior, and the Savage-Dickey style ratio
//!
//! ```text
//! BF_01 = [(1 - F_post(t)) F_prior(t) + eps] / [F_post(t) (1 - F_prior(t)) + eps]
//! ```
//!
//! compares posterior and prior mass on either side of the threshold `t`.
//!
//! `F` is a closed-form approximation of the NIG CDF, evaluated in the log
//! domain. It is treated as a best-effort number: overflowing terms are
//! clamped to `f64::MAX`, results are clamped to [0, 1] and NaN never
//! reaches the caller. Every clamp is logged with `warn!`; for small variance
//! terms the prior CDF saturates at 1, which pins `BF_01` near `1 / eps`.

use aso_bootstrap::{BootstrapConfig, BootstrapEngine, BootstrapEstimates};
use aso_core::math::special::{erf, exp_clamped, ln_add_exp, ln_gamma};
use aso_core::{validate_scores, CancellationFlag, Error, Result, SharedProgress};
use serde::{Deserialize, Serialize};
use std::f64::consts::LN_2;
use tracing::{debug, instrument, warn};

/// Stabiliser added to variances, denominators and the Bayes factor terms
pub const NIG_EPSILON: f64 = 1e-6;

/// Parameters of a Normal-Inverse-Gamma distribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NigParameters {
    /// Location of the mean
    pub loc: f64,
    /// Precision scale of the mean (often written lambda)
    pub scale: f64,
    /// Shape of the inverse-gamma variance
    pub alpha: f64,
    /// Rate of the inverse-gamma variance
    pub beta: f64,
}

impl Default for NigParameters {
    fn default() -> Self {
        Self {
            loc: 0.5,
            scale: 0.5,
            alpha: 3.0,
            beta: 1.0,
        }
    }
}

impl NigParameters {
    /// Create validated parameters
    pub fn new(loc: f64, scale: f64, alpha: f64, beta: f64) -> Result<Self> {
        let params = Self {
            loc,
            scale,
            alpha,
            beta,
        };
        params.validate()?;
        Ok(params)
    }

    /// Check that `loc` is finite and the other parameters positive
    pub fn validate(&self) -> Result<()> {
        if !self.loc.is_finite() {
            return Err(Error::InvalidArgument(format!(
                "NIG loc must be finite, {} found",
                self.loc
            )));
        }
        for (name, value) in [
            ("scale", self.scale),
            ("alpha", self.alpha),
            ("beta", self.beta),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidArgument(format!(
                    "NIG {name} must be positive and finite, {value} found"
                )));
            }
        }
        Ok(())
    }

    /// Conjugate update with `n` observations summarised by the bootstrap
    /// samples' mean and sum of squared deviations
    pub fn posterior(&self, n: usize, samples: &[f64]) -> Self {
        let n = n as f64;
        let mean = if samples.is_empty() {
            0.0
        } else {
            samples.iter().sum::<f64>() / samples.len() as f64
        };
        let sum_sq_dev: f64 = samples.iter().map(|s| (s - mean).powi(2)).sum();

        Self {
            loc: (self.scale * self.loc + n * mean) / (self.scale + n),
            scale: self.scale + n,
            alpha: self.alpha + n / 2.0,
            beta: self.beta
                + 0.5 * sum_sq_dev
                + n * self.scale / (self.scale + n) * (mean - self.loc).powi(2) / 2.0,
        }
    }

    /// Approximate CDF at `x` given the variance term `var`
    pub fn cdf(&self, x: f64, var: f64) -> f64 {
        nig_cdf(x, var, self)
    }
}

/// Closed-form approximation of the NIG CDF
///
/// ```text
/// F(x) = [exp(-β/v') + (β/v')^α + erf(√λ (x - μ) / (√(2v) + ε) + 1)] / [2 v Γ(α) + ε]
/// ```
///
/// with `v' = v + ε`. The value is clamped to [0, 1].
pub fn nig_cdf(x: f64, var: f64, params: &NigParameters) -> f64 {
    let var = if var.is_finite() { var.max(0.0) } else { f64::MAX };
    let ratio = params.beta / (var + NIG_EPSILON);

    let ln_num_term = ln_add_exp(-ratio, params.alpha * ratio.ln());
    if ln_num_term >= f64::MAX.ln() {
        warn!(
            alpha = params.alpha,
            beta = params.beta,
            var,
            "NIG CDF numerator overflowed, clamping"
        );
    }
    let num_term = exp_clamped(ln_num_term);

    let z = params.scale.sqrt() * (x - params.loc) / ((2.0 * var).sqrt() + NIG_EPSILON);
    let numerator = num_term + erf(z + 1.0);
    if !(numerator > 0.0 && numerator.is_finite()) {
        warn!(x, var, numerator, "NIG CDF numerator is not positive, returning 0");
        return 0.0;
    }

    let ln_denominator = ln_add_exp(
        LN_2 + var.ln() + ln_gamma(params.alpha),
        NIG_EPSILON.ln(),
    );

    let value = (numerator.ln() - ln_denominator).exp();
    if value.is_nan() {
        warn!(x, var, "NIG CDF evaluated to NaN, returning 0");
        return 0.0;
    }
    if value > 1.0 {
        warn!(x, var, value, "NIG CDF approximation exceeds 1, clamping");
        return 1.0;
    }
    value
}

/// `BF_01` from posterior and prior CDF values at the threshold
pub fn savage_dickey_ratio(cdf_posterior: f64, cdf_prior: f64) -> f64 {
    let numerator = (1.0 - cdf_posterior) * cdf_prior;
    let denominator = cdf_posterior * (1.0 - cdf_prior);
    ((numerator + NIG_EPSILON).ln() - (denominator + NIG_EPSILON).ln()).exp()
}

/// `sqrt((n_a + n_b) / (n_a n_b))`, the asymptotic scale of the violation
/// ratio's standard error
pub fn variance_scale_constant(n_a: usize, n_b: usize) -> f64 {
    let (n_a, n_b) = (n_a as f64, n_b as f64);
    ((n_a + n_b) / (n_a * n_b)).sqrt()
}

/// Configuration of a Bayes factor computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BayesFactorConfig {
    /// Threshold `t` of the null hypothesis `eps_W2 > t`
    pub eps_min_threshold: f64,
    /// NIG prior
    pub prior: NigParameters,
    /// Bootstrap parameters
    pub bootstrap: BootstrapConfig,
}

impl Default for BayesFactorConfig {
    fn default() -> Self {
        Self {
            eps_min_threshold: 0.5,
            prior: NigParameters::default(),
            bootstrap: BootstrapConfig::default(),
        }
    }
}

impl BayesFactorConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the hypothesis threshold
    pub fn with_threshold(mut self, eps_min_threshold: f64) -> Self {
        self.eps_min_threshold = eps_min_threshold;
        self
    }

    /// Set the prior
    pub fn with_prior(mut self, prior: NigParameters) -> Self {
        self.prior = prior;
        self
    }

    /// Replace the bootstrap parameters
    pub fn with_bootstrap(mut self, bootstrap: BootstrapConfig) -> Self {
        self.bootstrap = bootstrap;
        self
    }

    /// Set the base seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.bootstrap.seed = Some(seed);
        self
    }

    /// Check every parameter
    pub fn validate(&self) -> Result<()> {
        if !self.eps_min_threshold.is_finite() {
            return Err(Error::InvalidArgument(format!(
                "eps_min_threshold must be finite, {} found",
                self.eps_min_threshold
            )));
        }
        self.prior.validate()?;
        self.bootstrap.validate()
    }
}

/// Outcome of a Bayes factor computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BayesFactor {
    /// `BF_01`; values above 1 favour `eps_W2 > threshold`
    pub bayes_factor: f64,
    /// Threshold of the null hypothesis
    pub eps_min_threshold: f64,
    /// Prior parameters
    pub prior: NigParameters,
    /// Posterior parameters
    pub posterior: NigParameters,
    /// Prior CDF at the threshold
    pub cdf_prior: f64,
    /// Posterior CDF at the threshold
    pub cdf_posterior: f64,
    /// Bootstrap standard deviation of the scaled violation ratio
    pub sigma_hat: f64,
    /// Variance term fed to the NIG CDF
    pub scale: f64,
    /// Raw bootstrap output
    pub bootstrap: BootstrapEstimates,
}

impl BayesFactor {
    /// Natural log of the Bayes factor
    pub fn log_bayes_factor(&self) -> f64 {
        self.bayes_factor.ln()
    }

    /// Whether the data moved the odds towards the null hypothesis
    pub fn favours_null(&self) -> bool {
        self.bayes_factor > 1.0
    }
}

/// Bayes factor computation for a pair of samples
#[derive(Debug, Clone, Default)]
pub struct BayesFactorAso {
    config: BayesFactorConfig,
    engine: BootstrapEngine,
}

impl BayesFactorAso {
    /// Create a computation with the given configuration
    pub fn new(config: BayesFactorConfig) -> Self {
        let engine = BootstrapEngine::new(config.bootstrap.clone());
        Self { config, engine }
    }

    /// Notify `observer` once per bootstrap iteration
    pub fn with_observer(mut self, observer: SharedProgress) -> Self {
        self.engine = self.engine.with_observer(observer);
        self
    }

    /// Abort the bootstrap once `flag` is raised
    pub fn with_cancellation(mut self, flag: CancellationFlag) -> Self {
        self.engine = self.engine.with_cancellation(flag);
        self
    }

    /// Configuration of this computation
    pub fn config(&self) -> &BayesFactorConfig {
        &self.config
    }

    /// Bayes factor of `eps_W2(A, B) > threshold` against its complement
    #[instrument(skip(self, scores_a, scores_b), fields(
        n_a = scores_a.len(),
        n_b = scores_b.len(),
        threshold = self.config.eps_min_threshold
    ))]
    pub fn run(&self, scores_a: &[f64], scores_b: &[f64]) -> Result<BayesFactor> {
        self.config.validate()?;
        validate_scores(scores_a, "scores_a")?;
        validate_scores(scores_b, "scores_b")?;

        let bootstrap = self.engine.run(scores_a, scores_b)?;
        let scale =
            variance_scale_constant(scores_a.len(), scores_b.len()) * bootstrap.sigma_hat;

        let prior = self.config.prior;
        let posterior = prior.posterior(scores_a.len() + scores_b.len(), &bootstrap.samples);
        debug!(?posterior, scale, "Posterior parameters");

        let threshold = self.config.eps_min_threshold;
        let cdf_posterior = posterior.cdf(threshold, scale);
        let cdf_prior = prior.cdf(threshold, scale);
        let bayes_factor = savage_dickey_ratio(cdf_posterior, cdf_prior);

        debug!(cdf_prior, cdf_posterior, bayes_factor, "Bayes factor finished");

        Ok(BayesFactor {
            bayes_factor,
            eps_min_threshold: threshold,
            prior,
            posterior,
            cdf_prior,
            cdf_posterior,
            sigma_hat: bootstrap.sigma_hat,
            scale,
            bootstrap,
        })
    }
}
