//! Worker thread implementation

use crate::core::{BoxedTask, ErrorSink, PoolError, Result};
use crate::queue::BoundedQueue;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

/// Statistics for a worker thread
#[derive(Debug, Default)]
pub struct WorkerStats {
    tasks_processed: AtomicU64,
    tasks_failed: AtomicU64,
    tasks_panicked: AtomicU64,
}

impl WorkerStats {
    /// Create new worker statistics
    pub fn new() -> Self {
        Self::default()
    }

    fn record_processed(&self) {
        self.tasks_processed.fetch_add(1, Ordering::Relaxed);
    }

    fn record_failed(&self) {
        self.tasks_failed.fetch_add(1, Ordering::Relaxed);
    }

    fn record_panicked(&self) {
        self.tasks_panicked.fetch_add(1, Ordering::Relaxed);
    }

    /// Total tasks that completed successfully
    pub fn tasks_processed(&self) -> u64 {
        self.tasks_processed.load(Ordering::Relaxed)
    }

    /// Total tasks whose body returned an error
    pub fn tasks_failed(&self) -> u64 {
        self.tasks_failed.load(Ordering::Relaxed)
    }

    /// Total tasks whose body panicked
    pub fn tasks_panicked(&self) -> u64 {
        self.tasks_panicked.load(Ordering::Relaxed)
    }
}

/// A worker thread that processes tasks from a shared bounded queue
#[derive(Debug)]
pub struct Worker {
    id: usize,
    thread: Option<thread::JoinHandle<()>>,
    stats: Arc<WorkerStats>,
}

impl Worker {
    /// Create and start a new worker.
    ///
    /// The worker loops on [`BoundedQueue::pop`]: because the queue wakes
    /// all waiters on close, the worker blocks directly on the queue and
    /// exits as soon as the queue is closed and drained, with no polling.
    ///
    /// # Arguments
    ///
    /// * `id` - Unique identifier for this worker
    /// * `queue` - Shared task queue
    /// * `name_prefix` - Thread name prefix; the thread is named `{prefix}-{id}`
    /// * `sink` - Receives failure reports from task execution
    pub fn new(
        id: usize,
        queue: Arc<BoundedQueue<BoxedTask>>,
        name_prefix: &str,
        sink: Arc<dyn ErrorSink>,
    ) -> Result<Self> {
        let stats = Arc::new(WorkerStats::new());
        let stats_clone = Arc::clone(&stats);

        let thread = thread::Builder::new()
            .name(format!("{}-{}", name_prefix, id))
            .spawn(move || {
                Self::run(id, queue, stats_clone, sink);
            })
            .map_err(|e| PoolError::spawn_with_source(id, "thread spawn failed", e))?;

        Ok(Self {
            id,
            thread: Some(thread),
            stats,
        })
    }

    /// Get worker ID
    pub fn id(&self) -> usize {
        self.id
    }

    /// Get worker statistics
    pub fn stats(&self) -> Arc<WorkerStats> {
        Arc::clone(&self.stats)
    }

    /// Join the worker thread
    pub fn join(mut self) -> Result<()> {
        if let Some(thread) = self.thread.take() {
            thread
                .join()
                .map_err(|_| PoolError::join(self.id, "worker thread panicked"))?;
        }
        Ok(())
    }

    /// Main worker loop
    ///
    /// Runs until the queue is closed and empty, so every queued task is
    /// executed before shutdown completes.
    fn run(
        id: usize,
        queue: Arc<BoundedQueue<BoxedTask>>,
        stats: Arc<WorkerStats>,
        sink: Arc<dyn ErrorSink>,
    ) {
        log::debug!("worker {} started", id);

        while let Some(mut task) = queue.pop() {
            Self::run_task(id, &mut task, &stats, &sink);
        }

        log::debug!(
            "worker {} shutting down ({} processed, {} failed, {} panicked)",
            id,
            stats.tasks_processed(),
            stats.tasks_failed(),
            stats.tasks_panicked()
        );
    }

    /// Execute a single task with panic protection.
    ///
    /// Failures and panics are counted and reported to the sink; neither is
    /// allowed to escape and kill the worker thread.
    fn run_task(id: usize, task: &mut BoxedTask, stats: &WorkerStats, sink: &Arc<dyn ErrorSink>) {
        let outcome = catch_unwind(AssertUnwindSafe(|| task.run()));

        match outcome {
            Ok(Ok(())) => {
                stats.record_processed();
            }
            Ok(Err(e)) => {
                stats.record_failed();
                sink.task_failed(id, task.task_type(), &e);
            }
            Err(panic_info) => {
                let message = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "unknown panic".to_string()
                };
                stats.record_panicked();
                sink.task_panicked(id, task.task_type(), &message);
            }
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        if let Some(thread) = self.thread.take() {
            if thread.is_finished() {
                // Join a finished thread to surface shutdown panics
                if thread.join().is_err() {
                    log::error!("worker {} panicked during shutdown", self.id);
                }
            } else {
                // Blocking here could deadlock if the queue was never
                // closed; leave the thread to exit on queue close.
                log::warn!("worker {} dropped while still running", self.id);
            }
        }
    }
}
