//! Error types for stochastic order testing
//!
//! Provides a unified error type for all aso crates.

use thiserror::Error;

/// Core error type for stochastic order operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid argument provided to a function
    ///
    /// Raised before any bootstrap work starts.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The representation of a score collection is not recognised
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Threading or parallelization error
    #[error("Execution error: {0}")]
    Execution(String),

    /// A bootstrap run was aborted through its cancellation flag
    #[error("Cancelled after {completed} of {requested} bootstrap iterations")]
    Cancelled { completed: usize, requested: usize },

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

// Helper functions for common error patterns

impl Error {
    /// Create an error for an empty sample
    pub fn empty_sample(name: &str) -> Self {
        Self::InvalidArgument(format!("Sample '{name}' must be non-empty"))
    }

    /// Create an error for a count parameter that must be positive
    pub fn non_positive(name: &str, value: usize) -> Self {
        Self::InvalidArgument(format!("{name} must be positive, {value} found"))
    }

    /// Create an error for a probability outside its allowed range
    pub fn out_of_range(name: &str, value: f64, range: &str) -> Self {
        Self::InvalidArgument(format!("{name} must be in {range}, {value} found"))
    }

    /// Create an error for NaN/Inf values
    pub fn non_finite(context: &str) -> Self {
        Self::InvalidArgument(format!("{context} contains NaN or infinite values"))
    }

    /// Create an error for a collection with too few groups
    pub fn too_few_groups(found: usize) -> Self {
        Self::InvalidArgument(format!(
            "Score collection should contain at least two sets of scores, but only {found} found"
        ))
    }

    /// Whether this error belongs to the argument-validation class
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}
