//! Run options for the harmonization pipeline.

use serde::{Deserialize, Serialize};

/// Options controlling how a pipeline run is executed.
///
/// Options never change the output table; they only affect scheduling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOptions {
    /// Normalize module groups on a worker pool instead of sequentially.
    pub parallel: bool,

    /// Upper bound on pool threads. `None` uses the available parallelism.
    pub max_workers: Option<usize>,
}

impl PipelineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = Some(max_workers.max(1));
        self
    }

    /// Thread count for the worker pool.
    pub fn worker_count(&self) -> usize {
        match self.max_workers {
            Some(workers) => workers,
            None => std::thread::available_parallelism()
                .map(std::num::NonZeroUsize::get)
                .unwrap_or(1),
        }
    }
}
