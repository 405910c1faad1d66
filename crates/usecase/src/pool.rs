use repo_lines_shared_kernel::{InfrastructureError, Result};

/// Bounded pool shared by every traversal of one engine.
///
/// Its thread count is the cap on concurrently running remote calls.
pub struct WorkerPool {
    pool: rayon::ThreadPool,
    jobs: usize,
}

impl WorkerPool {
    pub fn new(jobs: usize) -> Result<Self> {
        let jobs = jobs.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .thread_name(|index| format!("repo-lines-{index}"))
            .build()
            .map_err(|e| InfrastructureError::ThreadPoolCreation { details: e.to_string() })?;
        Ok(Self { pool, jobs })
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// Run `op` inside the pool; parallel iterators used by `op` stay on it.
    pub fn install<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(op)
    }

    /// Items handed to the pool per scheduling round.
    pub(crate) fn batch_size(&self) -> usize {
        self.jobs * 4
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool").field("jobs", &self.jobs).finish()
    }
}
