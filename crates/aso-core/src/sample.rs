//! Validated score samples

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// An immutable, non-empty sequence of finite scores
///
/// Dereferences to `[f64]`, so it can be passed anywhere a slice is expected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Sample {
    values: Vec<f64>,
}

impl Sample {
    /// Capture a sample, rejecting empty or non-finite input
    pub fn new(values: impl Into<Vec<f64>>) -> Result<Self> {
        let values = values.into();
        validate_scores(&values, "sample")?;
        Ok(Self { values })
    }

    /// Scores in their original order
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Copy of the scores sorted ascending
    pub fn sorted(&self) -> Vec<f64> {
        sorted_copy(&self.values)
    }
}

impl Deref for Sample {
    type Target = [f64];

    fn deref(&self) -> &Self::Target {
        &self.values
    }
}

impl AsRef<[f64]> for Sample {
    fn as_ref(&self) -> &[f64] {
        &self.values
    }
}

impl TryFrom<Vec<f64>> for Sample {
    type Error = Error;

    fn try_from(values: Vec<f64>) -> Result<Self> {
        Self::new(values)
    }
}

impl From<Sample> for Vec<f64> {
    fn from(sample: Sample) -> Self {
        sample.values
    }
}

/// Check that a slice of scores is non-empty and finite
pub fn validate_scores(values: &[f64], name: &str) -> Result<()> {
    if values.is_empty() {
        return Err(Error::empty_sample(name));
    }
    if values.iter().any(|x| !x.is_finite()) {
        return Err(Error::non_finite(name));
    }
    Ok(())
}

/// Sort a copy of `values` ascending
///
/// Callers are expected to have rejected NaN already; `total_cmp` keeps the
/// sort total regardless.
pub fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(|a, b| a.total_cmp(b));
    sorted
}
