//! Bounded pool for work that occupies a thread.
//!
//! tokio's blocking pool is effectively unbounded, which would hide the cost
//! of blocking handlers. Every exclusive-block task first takes a permit
//! from this pool; with one worker, concurrent blocking requests run one at
//! a time.

use std::sync::Arc;

use tokio::sync::Semaphore;

use super::error::AppError;

#[derive(Debug, Clone)]
pub struct BlockingPool {
    permits: Arc<Semaphore>,
    workers: usize,
}

impl BlockingPool {
    /// A pool with `workers` slots (at least one).
    pub fn new(workers: usize) -> Self {
        let workers = workers.max(1);
        Self { permits: Arc::new(Semaphore::new(workers)), workers }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Runs `f` on a blocking thread once a slot is free.
    ///
    /// The permit travels into the closure, so the slot stays taken until
    /// `f` returns even if the awaiting request is dropped.
    pub async fn run<F, T>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| AppError::PoolClosed)?;

        let out = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            f()
        })
        .await?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn single_worker_never_overlaps() {
        let pool = BlockingPool::new(1);
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let jobs = (0..4).map(|_| {
            let (active, peak) = (Arc::clone(&active), Arc::clone(&peak));
            pool.run(move || {
                let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                std::thread::sleep(Duration::from_millis(20));
                active.fetch_sub(1, Ordering::SeqCst);
            })
        });
        for res in futures::future::join_all(jobs).await {
            res.unwrap();
        }

        assert_eq!(peak.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn zero_workers_rounds_up() {
        assert_eq!(BlockingPool::new(0).workers(), 1);
    }
}
