//! # Stochastic Order
//!
//! Almost Stochastic Order (ASO) tests for comparing score distributions,
//! for example the results of two models over several random seeds.
//!
//! This crate re-exports the workspace crates and adds three entry points:
//!
//! - [`aso`]: upper bound `epsilon_min` on the violation ratio of A over B
//! - [`multi_aso`]: matrix of pairwise bounds for a collection of models
//! - [`bf_aso`]: Bayes factor for `eps_W2(A, B) > threshold`
//!
//! ## Quick Start
//!
//! ```rust
//! use stochastic_order::prelude::*;
//!
//! let a = [0.82, 0.85, 0.86, 0.88, 0.91];
//! let b = [0.71, 0.74, 0.77, 0.78, 0.80];
//!
//! let config = AsoConfig::default()
//!     .with_num_samples(200)
//!     .with_iterations(200)
//!     .with_seed(42);
//! let epsilon_min = stochastic_order::aso(&a, &b, &config).unwrap();
//!
//! // A is almost stochastically larger than B
//! assert!(epsilon_min < 0.5);
//! ```
//!
//! ## Crates
//!
//! - [`aso_core`]: errors, validated samples, execution engines, progress
//! - [`aso_quantile`]: empirical quantile functions and the violation ratio
//! - [`aso_bootstrap`]: seeded, parallel bootstrap of the violation ratio
//! - [`aso_inference`]: ASO test, multi-model comparison, Bayes factor, adapters

pub use aso_bootstrap;
pub use aso_core;
pub use aso_inference;
pub use aso_quantile;

pub use aso_bootstrap::{BootstrapConfig, BootstrapEngine, BootstrapEstimates};
pub use aso_core::{
    CancellationFlag, Error, ProgressCounter, ProgressObserver, Result, Sample, SharedProgress,
    TracingProgress,
};
pub use aso_inference::{
    AsoConfig, AsoResult, AsoTest, BayesFactor, BayesFactorAso, BayesFactorConfig,
    ComparisonMatrix, ConverterRegistry, IntoScoreCollection, MultiAso, MultiAsoConfig,
    NigParameters, ScoreCollection, ScoreTensor,
};
pub use aso_quantile::{violation_ratio, EmpiricalQuantile, QuantileFunction};

/// `epsilon_min` of `scores_a` against `scores_b`
///
/// Values below 0.5 mean A is almost stochastically larger than B.
pub fn aso(scores_a: &[f64], scores_b: &[f64], config: &AsoConfig) -> Result<f64> {
    Ok(AsoTest::new(config.clone())
        .run(scores_a, scores_b)?
        .epsilon_min)
}

/// Pairwise `epsilon_min` matrix of every model in `scores`
pub fn multi_aso<C: IntoScoreCollection>(
    scores: C,
    config: &MultiAsoConfig,
) -> Result<ComparisonMatrix> {
    MultiAso::new(config.clone()).run(scores)
}

/// `BF_01` for `eps_W2(A, B) > config.eps_min_threshold`
pub fn bf_aso(scores_a: &[f64], scores_b: &[f64], config: &BayesFactorConfig) -> Result<f64> {
    Ok(BayesFactorAso::new(config.clone())
        .run(scores_a, scores_b)?
        .bayes_factor)
}

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{aso, bf_aso, multi_aso};
    pub use aso_bootstrap::prelude::*;
    pub use aso_core::prelude::*;
    pub use aso_inference::prelude::*;
    pub use aso_quantile::prelude::*;
}
