//! Core types for Almost Stochastic Order testing
//!
//! This crate provides the pieces shared by every other aso crate:
//!
//! - **Errors**: a single [`Error`] type and [`Result`] alias
//! - **Samples**: validated, non-empty, finite score sequences
//! - **Execution engines**: sequential or Rayon-backed batch execution that
//!   always returns results in task order
//! - **Progress**: an injectable observer notified once per bootstrap
//!   iteration, plus a cooperative cancellation flag
//! - **Math**: standard normal quantiles and the special functions used by
//!   the Bayes factor
//!
//! # Example
//!
//! ```rust
//! use aso_core::execution::{ExecutionEngine, JobEngine};
//!
//! let engine = JobEngine::for_jobs(2).unwrap();
//! let squares = engine.execute_batch(4, |i| i * i);
//! assert_eq!(squares, vec![0, 1, 4, 9]);
//! ```

pub mod error;
pub mod execution;
pub mod math;
pub mod progress;
pub mod sample;

// Re-export core types
pub use error::{Error, Result};

pub use execution::{
    parallel, sequential, ExecutionEngine, ExecutionStrategy, JobEngine, ParallelEngine,
    SequentialEngine,
};

pub use progress::{
    CancellationFlag, ProgressCounter, ProgressObserver, SharedProgress,
    TracingProgress,
};

pub use sample::{sorted_copy, validate_scores, Sample};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::Error;
    pub use crate::{
        CancellationFlag, ExecutionEngine, JobEngine, ProgressCounter, ProgressObserver, Result,
        Sample, SharedProgress,
    };
}
