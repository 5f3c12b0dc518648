//! Worker pools for the per-window solve.
//!
//! Windows only read the shared increment array and return their own
//! buffers, so any executor may run them in any order as long as results
//! come back in the order of the input bounds.

use corelib::{DenoiseError, Parallelism, WindowBound};
use rayon::prelude::*;
use tracing::debug;

/// Work applied to each window: returns the fitted increments for that bound.
pub type WindowJob<'a> = dyn Fn(WindowBound) -> Vec<f64> + Sync + 'a;

/// Maps a job over window bounds.
pub trait WindowExecutor: Send + Sync {
    /// Number of workers the executor runs on.
    fn workers(&self) -> usize;

    /// Runs `job` once per bound. `result[i]` belongs to `bounds[i]`.
    fn map_windows(&self, bounds: &[WindowBound], job: &WindowJob<'_>) -> Vec<Vec<f64>>;
}

/// Runs windows one after another on the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct SequentialExecutor;

impl WindowExecutor for SequentialExecutor {
    fn workers(&self) -> usize {
        1
    }

    fn map_windows(&self, bounds: &[WindowBound], job: &WindowJob<'_>) -> Vec<Vec<f64>> {
        bounds.iter().map(|&b| job(b)).collect()
    }
}

/// Runs windows on a dedicated rayon pool.
pub struct RayonExecutor {
    pool: rayon::ThreadPool,
}

impl RayonExecutor {
    /// `workers == 0` lets rayon size the pool to the available cores.
    pub fn new(workers: usize) -> Result<Self, DenoiseError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("denoise-worker-{i}"))
            .build()
            .map_err(|e| DenoiseError::WorkerPool(e.to_string()))?;

        debug!(workers = pool.current_num_threads(), "built window worker pool");
        Ok(Self { pool })
    }
}

impl WindowExecutor for RayonExecutor {
    fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    fn map_windows(&self, bounds: &[WindowBound], job: &WindowJob<'_>) -> Vec<Vec<f64>> {
        self.pool
            .install(|| bounds.par_iter().map(|&b| job(b)).collect())
    }
}

/// Builds the executor matching a parallelism setting.
pub fn executor_for(parallelism: Parallelism) -> Result<Box<dyn WindowExecutor>, DenoiseError> {
    match parallelism {
        Parallelism::Workers(0) => Err(DenoiseError::invalid_config(
            "parallelism",
            "worker count must be at least 1",
        )),
        Parallelism::Workers(1) => Ok(Box::new(SequentialExecutor)),
        Parallelism::Workers(n) => Ok(Box::new(RayonExecutor::new(n)?)),
        Parallelism::All => Ok(Box::new(RayonExecutor::new(0)?)),
    }
}
