//! Statistical inference with Almost Stochastic Order
//!
//! This crate turns bootstrap estimates of the violation ratio into
//! decisions:
//!
//! - **ASO test**: an upper confidence bound `epsilon_min` on the violation
//!   ratio of two samples ([`AsoTest`])
//! - **Multi-model comparison**: a matrix of pairwise bounds with optional
//!   Bonferroni correction and symmetry shortcut ([`MultiAso`])
//! - **Bayes factor**: a Normal-Inverse-Gamma posterior over the bootstrap
//!   distribution and a Savage-Dickey style ratio ([`BayesFactorAso`])
//! - **Score adapters**: normalisation of maps, nested vectors, matrices and
//!   tensors into labelled samples ([`ScoreCollection`])
//!
//! # Example
//!
//! ```rust
//! use aso_inference::{AsoConfig, AsoTest};
//!
//! let better = [0.81, 0.84, 0.86, 0.88, 0.9];
//! let worse = [0.70, 0.72, 0.75, 0.77, 0.79];
//!
//! let config = AsoConfig::default()
//!     .with_num_samples(100)
//!     .with_iterations(100)
//!     .with_seed(1234);
//! let result = AsoTest::new(config).run(&better, &worse).unwrap();
//!
//! assert_eq!(result.epsilon_min, 0.0);
//! assert!(result.is_significant());
//! ```

pub mod adapters;
pub mod aso;
pub mod bayes;
pub mod multi;

pub use aso_core::{Error, Result};

pub use adapters::{
    ConverterRegistry, IntoScoreCollection, ScoreCollection, ScoreConverter, ScoreTensor,
};
pub use aso::{
    epsilon_min_bound, sample_size_constant, AsoConfig, AsoResult, AsoTest,
    DEFAULT_REJECTION_THRESHOLD,
};
pub use bayes::{
    nig_cdf, savage_dickey_ratio, variance_scale_constant, BayesFactor, BayesFactorAso,
    BayesFactorConfig, NigParameters, NIG_EPSILON,
};
pub use multi::{num_pairs, ComparisonMatrix, MultiAso, MultiAsoConfig};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        AsoConfig, AsoResult, AsoTest, BayesFactor, BayesFactorAso, BayesFactorConfig,
        ComparisonMatrix, IntoScoreCollection, MultiAso, MultiAsoConfig, NigParameters,
        ScoreCollection,
    };
}
