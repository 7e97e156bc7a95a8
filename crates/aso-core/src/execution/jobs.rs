//! Runtime selection of an execution engine from a job count

use super::{ExecutionEngine, ExecutionStrategy, ParallelEngine, SequentialEngine};
use crate::{Error, Result};

/// Engine chosen at runtime from a `num_jobs` argument
///
/// One job runs on the calling thread; more jobs get a dedicated Rayon pool
/// with exactly that many workers.
#[derive(Clone, Debug)]
pub enum JobEngine {
    Sequential(SequentialEngine),
    Parallel(ParallelEngine),
}

impl JobEngine {
    /// Build the engine for `num_jobs` workers
    pub fn for_jobs(num_jobs: usize) -> Result<Self> {
        match num_jobs {
            0 => Err(Error::InvalidArgument(format!(
                "Number of jobs has to be at least 1, {num_jobs} found"
            ))),
            1 => Ok(Self::Sequential(SequentialEngine::new())),
            n => Ok(Self::Parallel(ParallelEngine::with_num_threads(n)?)),
        }
    }
}

impl ExecutionEngine for JobEngine {
    fn execute_batch<F, R>(&self, count: usize, f: F) -> Vec<R>
    where
        F: Fn(usize) -> R + Sync + Send,
        R: Send,
    {
        match self {
            JobEngine::Sequential(e) => e.execute_batch(count, f),
            JobEngine::Parallel(e) => e.execute_batch(count, f),
        }
    }

    fn strategy(&self) -> ExecutionStrategy {
        match self {
            JobEngine::Sequential(e) => e.strategy(),
            JobEngine::Parallel(e) => e.strategy(),
        }
    }

    fn num_threads(&self) -> usize {
        match self {
            JobEngine::Sequential(e) => e.num_threads(),
            JobEngine::Parallel(e) => e.num_threads(),
        }
    }
}
