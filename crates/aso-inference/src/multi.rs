//! Pairwise ASO comparison of many models
//!
//! Every unordered pair `(i, j)` with `i < j` is tested once for `i` against
//! `j`. With symmetry enabled the opposite direction is filled in as
//! `1 - M[i, j]`; without it a second, independent bootstrap run fills
//! `M[j, i]`. Bonferroni correction divides the confidence level by the
//! number of unordered pairs. Pairs run one after another and each pair's
//! bootstrap uses the configured worker pool, which keeps the thread count
//! bounded by `num_jobs`.

use crate::adapters::{IntoScoreCollection, ScoreCollection};
use crate::aso::{AsoConfig, AsoTest};
use aso_core::{CancellationFlag, Error, Result, SharedProgress, TracingProgress};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Configuration of a multi-model comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiAsoConfig {
    /// Pairwise test configuration
    pub aso: AsoConfig,
    /// Divide the confidence level by the number of pairs
    pub use_bonferroni: bool,
    /// Derive `M[j, i]` as `1 - M[i, j]` instead of testing it
    pub use_symmetry: bool,
}

impl Default for MultiAsoConfig {
    fn default() -> Self {
        Self {
            aso: AsoConfig::default(),
            use_bonferroni: true,
            use_symmetry: true,
        }
    }
}

impl MultiAsoConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the pairwise test configuration
    pub fn with_aso(mut self, aso: AsoConfig) -> Self {
        self.aso = aso;
        self
    }

    /// Enable or disable the Bonferroni correction
    pub fn with_bonferroni(mut self, use_bonferroni: bool) -> Self {
        self.use_bonferroni = use_bonferroni;
        self
    }

    /// Enable or disable the symmetry shortcut
    pub fn with_symmetry(mut self, use_symmetry: bool) -> Self {
        self.use_symmetry = use_symmetry;
        self
    }

    /// Check every parameter
    pub fn validate(&self) -> Result<()> {
        self.aso.validate()
    }

    /// Confidence level used for each pair among `num_models` models
    pub fn adjusted_confidence_level(&self, num_models: usize) -> f64 {
        let pairs = num_pairs(num_models);
        if self.use_bonferroni && pairs > 0 {
            self.aso.confidence_level / pairs as f64
        } else {
            self.aso.confidence_level
        }
    }

    /// Total bootstrap iterations of a comparison among `num_models` models
    pub fn total_iterations(&self, num_models: usize) -> usize {
        let directions = if self.use_symmetry { 1 } else { 2 };
        num_pairs(num_models) * directions * self.aso.bootstrap.num_bootstrap_iterations
    }
}

/// Number of unordered pairs among `n` models
pub fn num_pairs(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Square matrix of `epsilon_min` values keyed by model labels
///
/// Entry `(i, j)` is the bound for model `i` against model `j`. The diagonal
/// holds 0, the violation ratio of a model against itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawComparisonMatrix")]
pub struct ComparisonMatrix {
    labels: Vec<String>,
    values: Vec<Vec<f64>>,
}

#[derive(Deserialize)]
struct RawComparisonMatrix {
    labels: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl TryFrom<RawComparisonMatrix> for ComparisonMatrix {
    type Error = Error;

    fn try_from(raw: RawComparisonMatrix) -> Result<Self> {
        let n = raw.labels.len();
        if raw.values.len() != n || raw.values.iter().any(|row| row.len() != n) {
            return Err(Error::InvalidArgument(format!(
                "Comparison matrix for {n} labels must be {n}x{n}"
            )));
        }
        Ok(Self {
            labels: raw.labels,
            values: raw.values,
        })
    }
}

impl ComparisonMatrix {
    /// Zero matrix for the given labels
    pub fn new(labels: Vec<String>) -> Self {
        let n = labels.len();
        Self {
            labels,
            values: vec![vec![0.0; n]; n],
        }
    }

    /// Number of models
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True if there are no models
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Model labels, in row order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Entry `(i, j)`
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.values.get(i).and_then(|row| row.get(j)).copied()
    }

    /// Entry for the models labelled `row` and `column`
    pub fn get_by_label(&self, row: &str, column: &str) -> Option<f64> {
        let i = self.labels.iter().position(|l| l == row)?;
        let j = self.labels.iter().position(|l| l == column)?;
        self.get(i, j)
    }

    /// Row `i`: bounds of model `i` against every model
    pub fn row(&self, i: usize) -> Option<&[f64]> {
        self.values.get(i).map(Vec::as_slice)
    }

    /// Rows of the matrix
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.values
    }

    pub(crate) fn set(&mut self, i: usize, j: usize, value: f64) {
        self.values[i][j] = value;
    }

    /// Copy into a dense `nalgebra` matrix
    pub fn to_dmatrix(&self) -> DMatrix<f64> {
        let n = self.len();
        DMatrix::from_fn(n, n, |i, j| self.values[i][j])
    }

    /// Pairs `(i, j)` whose bound falls below `threshold`
    pub fn significant_pairs(&self, threshold: f64) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for (i, row) in self.values.iter().enumerate() {
            for (j, &value) in row.iter().enumerate() {
                if i != j && value < threshold {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }
}

impl fmt::Display for ComparisonMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .labels
            .iter()
            .map(String::len)
            .max()
            .unwrap_or(0)
            .max(6);

        write!(f, "{:width$}", "")?;
        for label in &self.labels {
            write!(f, "  {label:>width$}")?;
        }
        writeln!(f)?;

        for (label, row) in self.labels.iter().zip(&self.values) {
            write!(f, "{label:<width$}")?;
            for value in row {
                write!(f, "  {value:>width$.4}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Multi-model ASO comparison
#[derive(Clone, Default)]
pub struct MultiAso {
    config: MultiAsoConfig,
    observer: Option<SharedProgress>,
    cancellation: Option<CancellationFlag>,
}

impl fmt::Debug for MultiAso {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiAso")
            .field("config", &self.config)
            .field("observer", &self.observer.is_some())
            .field("cancellation", &self.cancellation)
            .finish()
    }
}

impl MultiAso {
    /// Create a comparison with the given configuration
    pub fn new(config: MultiAsoConfig) -> Self {
        Self {
            config,
            observer: None,
            cancellation: None,
        }
    }

    /// Report every bootstrap iteration of every pair to `observer`
    pub fn with_observer(mut self, observer: SharedProgress) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Abort the comparison once `flag` is raised
    pub fn with_cancellation(mut self, flag: CancellationFlag) -> Self {
        self.cancellation = Some(flag);
        self
    }

    /// Configuration of this comparison
    pub fn config(&self) -> &MultiAsoConfig {
        &self.config
    }

    /// Compare every pair of models in `scores`
    pub fn run<C: IntoScoreCollection>(&self, scores: C) -> Result<ComparisonMatrix> {
        let collection = scores.into_score_collection()?;
        self.run_collection(&collection)
    }

    /// Compare every pair of models in a normalised collection
    #[instrument(skip(self, collection), fields(
        num_models = collection.len(),
        use_bonferroni = self.config.use_bonferroni,
        use_symmetry = self.config.use_symmetry
    ))]
    pub fn run_collection(&self, collection: &ScoreCollection) -> Result<ComparisonMatrix> {
        self.config.validate()?;
        let n = collection.len();
        if n < 2 {
            return Err(Error::too_few_groups(n));
        }

        let confidence_level = self.config.adjusted_confidence_level(n);
        debug!(
            confidence_level,
            pairs = num_pairs(n),
            "Adjusted confidence level"
        );

        let total = self.config.total_iterations(n);
        let observer: SharedProgress = match &self.observer {
            Some(observer) => Arc::clone(observer),
            None => Arc::new(TracingProgress::new(
                "multi-aso",
                total,
                self.config.aso.bootstrap.num_bootstrap_iterations,
            )),
        };

        let test = AsoTest::new(
            self.config
                .aso
                .clone()
                .with_confidence_level(confidence_level),
        )
        .with_observer(observer)
        .with_optional_cancellation(self.cancellation.clone());

        let samples = collection.samples();
        let mut matrix = ComparisonMatrix::new(collection.labels().to_vec());

        for i in 0..n {
            for j in (i + 1)..n {
                let forward = test.run(&samples[i], &samples[j])?.epsilon_min;
                matrix.set(i, j, forward);

                let backward = if self.config.use_symmetry {
                    1.0 - forward
                } else {
                    test.run(&samples[j], &samples[i])?.epsilon_min
                };
                matrix.set(j, i, backward);

                debug!(i, j, forward, backward, "Pair compared");
            }
        }

        info!(num_models = n, "Multi-model comparison finished");
        Ok(matrix)
    }
}
