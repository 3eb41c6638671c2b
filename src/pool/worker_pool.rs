//! Worker pool implementation

use crate::core::{BoxedTask, ClosureTask, ErrorSink, LogSink, PoolError, Result, Task};
use crate::pool::worker::{Worker, WorkerStats};
use crate::queue::{BoundedQueue, PushError};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Configuration for a worker pool
#[derive(Clone)]
pub struct WorkerPoolConfig {
    /// Number of worker threads (0 = number of logical CPUs)
    pub num_threads: usize,
    /// Capacity of the shared task queue. Must be greater than 0; the
    /// queue is always bounded to provide backpressure on producers.
    pub queue_capacity: usize,
    /// Thread name prefix; workers are named `{prefix}-{id}`
    pub thread_name_prefix: String,
    /// Receives task failure and panic reports from workers
    error_sink: Arc<dyn ErrorSink>,
}

impl std::fmt::Debug for WorkerPoolConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPoolConfig")
            .field("num_threads", &self.num_threads)
            .field("queue_capacity", &self.queue_capacity)
            .field("thread_name_prefix", &self.thread_name_prefix)
            .field("error_sink", &"<sink>")
            .finish()
    }
}

impl Default for WorkerPoolConfig {
    fn default() -> Self {
        Self {
            num_threads: num_cpus::get(),
            // Bounded by default to prevent memory exhaustion under load
            queue_capacity: 10_000,
            thread_name_prefix: "worker".to_string(),
            error_sink: Arc::new(LogSink),
        }
    }
}

impl WorkerPoolConfig {
    /// Create a new configuration with the specified number of threads
    #[must_use]
    pub fn new(num_threads: usize) -> Self {
        Self {
            num_threads: if num_threads == 0 {
                num_cpus::get()
            } else {
                num_threads
            },
            ..Default::default()
        }
    }

    /// Set the task queue capacity
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Set the thread name prefix
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_thread_name_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    /// Set a custom error sink for task failure reports.
    ///
    /// By default failures are reported through the `log` facade via
    /// [`LogSink`]. Injecting a sink lets applications route reports to
    /// their own collector, and lets tests assert on them.
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_error_sink(mut self, sink: Arc<dyn ErrorSink>) -> Self {
        self.error_sink = sink;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.num_threads == 0 {
            return Err(PoolError::invalid_config(
                "num_threads",
                "number of threads must be greater than 0",
            ));
        }
        if self.queue_capacity == 0 {
            return Err(PoolError::invalid_config(
                "queue_capacity",
                "queue capacity must be greater than 0",
            ));
        }
        Ok(())
    }
}

/// Lifecycle state of a [`WorkerPool`].
///
/// Transitions are strictly one-way:
/// `Running -> ShuttingDown -> Stopped`. A stopped pool cannot be restarted;
/// construct a new one instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolState {
    /// Workers are processing; submissions are accepted
    Running,
    /// Shutdown has begun; the queue is closed and workers are draining
    ShuttingDown,
    /// All workers have exited
    Stopped,
}

const STATE_RUNNING: u8 = 0;
const STATE_SHUTTING_DOWN: u8 = 1;
const STATE_STOPPED: u8 = 2;

impl PoolState {
    fn from_u8(value: u8) -> Self {
        match value {
            STATE_RUNNING => PoolState::Running,
            STATE_SHUTTING_DOWN => PoolState::ShuttingDown,
            _ => PoolState::Stopped,
        }
    }
}

/// A fixed-size pool of worker threads executing tasks from a shared
/// bounded queue.
///
/// Workers start at construction and run until [`shutdown`](WorkerPool::shutdown).
///
/// # Shutdown Mechanism
///
/// Shutdown closes the queue rather than interrupting workers:
///
/// 1. The pool transitions to `ShuttingDown`; new submissions are rejected
///    with [`PoolError::Shutdown`].
/// 2. The queue is closed, waking every blocked producer and consumer.
/// 3. Workers drain the remaining queued tasks, then exit; `shutdown`
///    joins them all before returning.
///
/// Every task accepted by `submit` is therefore executed exactly once.
/// A running task is never interrupted mid-execution.
///
/// # Example
///
/// ```rust
/// use taskwell::prelude::*;
///
/// # fn main() -> Result<()> {
/// let pool = WorkerPool::with_threads(4)?;
///
/// for i in 0..10 {
///     pool.execute(move || {
///         println!("task {} executing", i);
///         Ok(())
///     })?;
/// }
///
/// pool.shutdown()?;
/// # Ok(())
/// # }
/// ```
pub struct WorkerPool {
    config: WorkerPoolConfig,
    queue: Arc<BoundedQueue<BoxedTask>>,
    workers: Mutex<Vec<Worker>>,
    // Retained past shutdown so totals stay observable after workers join
    stats: Vec<Arc<WorkerStats>>,
    state: AtomicU8,
    tasks_submitted: AtomicU64,
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("config", &self.config)
            .field("state", &self.state())
            .field("queue_len", &self.queue.len())
            .field(
                "tasks_submitted",
                &self.tasks_submitted.load(Ordering::Relaxed),
            )
            .finish()
    }
}

impl WorkerPool {
    /// Create a worker pool with the default configuration.
    ///
    /// Workers are spawned immediately and begin waiting for tasks.
    pub fn new() -> Result<Self> {
        Self::with_config(WorkerPoolConfig::default())
    }

    /// Create a worker pool with the specified number of threads
    pub fn with_threads(num_threads: usize) -> Result<Self> {
        Self::with_config(WorkerPoolConfig::new(num_threads))
    }

    /// Create a worker pool with a custom configuration.
    ///
    /// All `num_threads` workers are spawned before this returns. If any
    /// spawn fails, the queue is closed, already-spawned workers are joined,
    /// and the error is returned.
    pub fn with_config(config: WorkerPoolConfig) -> Result<Self> {
        config.validate()?;

        let queue = Arc::new(BoundedQueue::new(config.queue_capacity));

        let mut workers = Vec::with_capacity(config.num_threads);
        let mut stats = Vec::with_capacity(config.num_threads);
        for id in 0..config.num_threads {
            match Worker::new(
                id,
                Arc::clone(&queue),
                &config.thread_name_prefix,
                Arc::clone(&config.error_sink),
            ) {
                Ok(worker) => {
                    stats.push(worker.stats());
                    workers.push(worker);
                }
                Err(e) => {
                    queue.close();
                    for worker in workers {
                        let _ = worker.join();
                    }
                    return Err(e);
                }
            }
        }

        Ok(Self {
            config,
            queue,
            workers: Mutex::new(workers),
            stats,
            state: AtomicU8::new(STATE_RUNNING),
            tasks_submitted: AtomicU64::new(0),
        })
    }

    /// Submit a task to the pool, blocking while the queue is full.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Shutdown`] if shutdown has begun, including when
    /// shutdown begins while this call is blocked waiting for queue space.
    pub fn submit<T: Task + 'static>(&self, task: T) -> Result<()> {
        self.submit_boxed(Box::new(task))
    }

    /// Submit a closure as a task, blocking while the queue is full
    pub fn execute<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        self.submit(ClosureTask::new(f))
    }

    /// Attempt to submit a task without blocking.
    ///
    /// # Errors
    ///
    /// - [`PoolError::QueueFull`] if the queue is at capacity
    /// - [`PoolError::Shutdown`] if shutdown has begun
    pub fn try_submit<T: Task + 'static>(&self, task: T) -> Result<()> {
        if self.state() != PoolState::Running {
            return Err(PoolError::shutdown(self.queue.len()));
        }

        self.queue
            .try_push(Box::new(task))
            .map_err(|e| match e {
                PushError::Full(_) => {
                    PoolError::queue_full(self.queue.len(), self.config.queue_capacity)
                }
                _ => PoolError::shutdown(self.queue.len()),
            })?;

        self.tasks_submitted.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Attempt to submit a closure without blocking
    pub fn try_execute<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        self.try_submit(ClosureTask::new(f))
    }

    /// Submit a task, waiting up to `timeout` for queue space.
    ///
    /// # Errors
    ///
    /// - [`PoolError::SubmissionTimeout`] if no space became available
    /// - [`PoolError::Shutdown`] if shutdown has begun
    pub fn submit_timeout<T: Task + 'static>(&self, task: T, timeout: Duration) -> Result<()> {
        if self.state() != PoolState::Running {
            return Err(PoolError::shutdown(self.queue.len()));
        }

        self.queue
            .push_timeout(Box::new(task), timeout)
            .map_err(|e| match e {
                PushError::Timeout(_) => {
                    PoolError::submission_timeout(timeout.as_millis() as u64)
                }
                _ => PoolError::shutdown(self.queue.len()),
            })?;

        self.tasks_submitted.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Submit a closure, waiting up to `timeout` for queue space
    pub fn execute_timeout<F>(&self, f: F, timeout: Duration) -> Result<()>
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        self.submit_timeout(ClosureTask::new(f), timeout)
    }

    fn submit_boxed(&self, task: BoxedTask) -> Result<()> {
        if self.state() != PoolState::Running {
            return Err(PoolError::shutdown(self.queue.len()));
        }

        // A blocking push fails only if the queue is closed under us,
        // which means shutdown began while we were waiting.
        self.queue
            .push(task)
            .map_err(|_| PoolError::shutdown(self.queue.len()))?;

        self.tasks_submitted.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Get the current lifecycle state
    pub fn state(&self) -> PoolState {
        PoolState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Check if the pool is accepting submissions
    pub fn is_running(&self) -> bool {
        self.state() == PoolState::Running
    }

    /// Get the number of worker threads
    pub fn num_threads(&self) -> usize {
        self.config.num_threads
    }

    /// Get the current number of queued tasks (snapshot)
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Get total number of tasks accepted by the pool
    pub fn total_tasks_submitted(&self) -> u64 {
        self.tasks_submitted.load(Ordering::Relaxed)
    }

    /// Get per-worker statistics
    pub fn worker_stats(&self) -> Vec<Arc<WorkerStats>> {
        self.stats.clone()
    }

    /// Get total tasks completed successfully across all workers
    pub fn total_tasks_processed(&self) -> u64 {
        self.stats.iter().map(|s| s.tasks_processed()).sum()
    }

    /// Get total tasks that returned an error across all workers
    pub fn total_tasks_failed(&self) -> u64 {
        self.stats.iter().map(|s| s.tasks_failed()).sum()
    }

    /// Get total tasks that panicked across all workers
    pub fn total_tasks_panicked(&self) -> u64 {
        self.stats.iter().map(|s| s.tasks_panicked()).sum()
    }

    /// Shut down the pool and wait for all workers to finish.
    ///
    /// Closes the queue (no more submissions accepted), then joins every
    /// worker. Workers drain all queued tasks before exiting, so this
    /// returns only after every accepted task has executed exactly once.
    ///
    /// Idempotent: only the first call performs the shutdown, later calls
    /// return immediately.
    pub fn shutdown(&self) -> Result<()> {
        if self
            .state
            .compare_exchange(
                STATE_RUNNING,
                STATE_SHUTTING_DOWN,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_err()
        {
            // Already shutting down or stopped
            return Ok(());
        }

        self.queue.close();

        let workers = std::mem::take(&mut *self.workers.lock());
        for worker in workers {
            worker.join()?;
        }

        self.state.store(STATE_STOPPED, Ordering::Release);
        Ok(())
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        if self.state() == PoolState::Running {
            if let Err(e) = self.shutdown() {
                log::error!(
                    "failed to shut down worker pool '{}' during drop: {}",
                    self.config.thread_name_prefix,
                    e
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::SharedCounter;
    use std::thread;

    #[test]
    fn test_pool_creation() {
        let pool = WorkerPool::new().expect("failed to create pool");
        assert!(pool.is_running());
        assert_eq!(pool.state(), PoolState::Running);
        assert_eq!(pool.num_threads(), num_cpus::get());

        pool.shutdown().expect("failed to shutdown pool");
        assert_eq!(pool.state(), PoolState::Stopped);
    }

    #[test]
    fn test_pool_with_threads() {
        let pool = WorkerPool::with_threads(4).expect("failed to create pool");
        assert_eq!(pool.num_threads(), 4);
        pool.shutdown().expect("failed to shutdown pool");
    }

    #[test]
    fn test_config_zero_threads_uses_cpu_count() {
        let config = WorkerPoolConfig::new(0);
        assert_eq!(config.num_threads, num_cpus::get());
    }

    #[test]
    fn test_invalid_queue_capacity() {
        let config = WorkerPoolConfig::new(2).with_queue_capacity(0);
        let result = WorkerPool::with_config(config);
        assert!(matches!(result, Err(PoolError::InvalidConfig { .. })));
    }

    #[test]
    fn test_task_execution() {
        let pool = WorkerPool::with_threads(2).expect("failed to create pool");
        let counter = SharedCounter::new(0);

        for _ in 0..10 {
            let counter = counter.clone();
            pool.execute(move || {
                counter.increment();
                Ok(())
            })
            .expect("failed to submit task");
        }

        pool.shutdown().expect("failed to shutdown pool");

        assert_eq!(counter.get(), 10);
        assert_eq!(pool.total_tasks_submitted(), 10);
        assert_eq!(pool.total_tasks_processed(), 10);
    }

    #[test]
    fn test_shutdown_drains_all_queued_tasks() {
        let pool = WorkerPool::with_threads(4).expect("failed to create pool");
        let counter = SharedCounter::new(0);
        let task_count = 100;

        for _ in 0..task_count {
            let counter = counter.clone();
            pool.execute(move || {
                counter.increment();
                Ok(())
            })
            .expect("failed to submit task");
        }

        // Shutdown must wait for every accepted task to run exactly once
        pool.shutdown().expect("failed to shutdown pool");

        assert_eq!(counter.get(), task_count);
        assert_eq!(pool.total_tasks_processed(), task_count as u64);
    }

    #[test]
    fn test_submit_after_shutdown() {
        let pool = WorkerPool::with_threads(2).expect("failed to create pool");
        pool.execute(|| Ok(())).expect("failed to submit task");
        pool.shutdown().expect("failed to shutdown pool");

        let result = pool.execute(|| Ok(()));
        assert!(matches!(result, Err(PoolError::Shutdown { .. })));
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let pool = WorkerPool::with_threads(2).expect("failed to create pool");
        pool.shutdown().expect("first shutdown failed");
        pool.shutdown().expect("second shutdown failed");
        assert_eq!(pool.state(), PoolState::Stopped);
    }

    #[test]
    fn test_failed_tasks_are_counted() {
        let pool = WorkerPool::with_threads(2).expect("failed to create pool");
        let counter = SharedCounter::new(0);

        for i in 0..10 {
            let counter = counter.clone();
            pool.execute(move || {
                counter.increment();
                if i % 2 == 0 {
                    Err(PoolError::other("test error"))
                } else {
                    Ok(())
                }
            })
            .expect("failed to submit task");
        }

        pool.shutdown().expect("failed to shutdown pool");

        // All tasks were attempted
        assert_eq!(counter.get(), 10);
        assert_eq!(pool.total_tasks_submitted(), 10);
        // Half succeeded, half failed
        assert_eq!(pool.total_tasks_processed(), 5);
        assert_eq!(pool.total_tasks_failed(), 5);
    }

    #[test]
    fn test_panicking_task_does_not_kill_worker() {
        let pool = WorkerPool::with_threads(1).expect("failed to create pool");
        let counter = SharedCounter::new(0);

        pool.execute(|| panic!("intentional panic"))
            .expect("failed to submit task");

        for _ in 0..5 {
            let counter = counter.clone();
            pool.execute(move || {
                counter.increment();
                Ok(())
            })
            .expect("failed to submit task");
        }

        pool.shutdown().expect("failed to shutdown pool");

        // The single worker survived the panic and ran the rest
        assert_eq!(counter.get(), 5);
        assert_eq!(pool.total_tasks_panicked(), 1);
        assert_eq!(pool.total_tasks_processed(), 5);
    }

    #[test]
    fn test_try_submit_when_queue_full() {
        let config = WorkerPoolConfig::new(1).with_queue_capacity(2);
        let pool = WorkerPool::with_config(config).expect("failed to create pool");

        // Block the single worker so queued tasks stay queued
        let (started_tx, started_rx) = crossbeam_channel::bounded(1);
        let (done_tx, done_rx) = crossbeam_channel::bounded::<()>(1);

        pool.execute(move || {
            started_tx.send(()).unwrap();
            let _ = done_rx.recv();
            Ok(())
        })
        .expect("failed to submit blocking task");

        started_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("blocking task should start");

        // Fill the queue (capacity 2)
        pool.try_execute(|| Ok(())).expect("failed to fill queue");
        pool.try_execute(|| Ok(())).expect("failed to fill queue");

        // Queue is full now
        let result = pool.try_execute(|| Ok(()));
        assert!(
            matches!(result, Err(PoolError::QueueFull { .. })),
            "expected QueueFull error, got: {:?}",
            result
        );

        let _ = done_tx.send(());
        pool.shutdown().expect("failed to shutdown pool");
    }

    #[test]
    fn test_execute_timeout_times_out_when_queue_full() {
        let config = WorkerPoolConfig::new(1).with_queue_capacity(1);
        let pool = WorkerPool::with_config(config).expect("failed to create pool");

        let (started_tx, started_rx) = crossbeam_channel::bounded(1);
        let (done_tx, done_rx) = crossbeam_channel::bounded::<()>(1);

        pool.execute(move || {
            started_tx.send(()).unwrap();
            let _ = done_rx.recv();
            Ok(())
        })
        .expect("failed to submit blocking task");

        started_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("blocking task should start");

        // Fill the queue (capacity 1)
        pool.execute(|| Ok(())).expect("failed to fill queue");

        let start = std::time::Instant::now();
        let result = pool.execute_timeout(|| Ok(()), Duration::from_millis(50));
        let elapsed = start.elapsed();

        assert!(
            matches!(result, Err(PoolError::SubmissionTimeout { .. })),
            "expected SubmissionTimeout error, got: {:?}",
            result
        );
        assert!(
            elapsed >= Duration::from_millis(40),
            "should have waited at least 40ms, waited {:?}",
            elapsed
        );

        let _ = done_tx.send(());
        pool.shutdown().expect("failed to shutdown pool");
    }

    #[test]
    fn test_concurrent_submit() {
        let pool = Arc::new(WorkerPool::with_threads(4).expect("failed to create pool"));
        let counter = SharedCounter::new(0);

        let mut handles = vec![];
        for _ in 0..10 {
            let pool = Arc::clone(&pool);
            let counter = counter.clone();
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    let counter = counter.clone();
                    pool.execute(move || {
                        counter.increment();
                        Ok(())
                    })
                    .expect("failed to submit task");
                }
            }));
        }

        for handle in handles {
            handle.join().expect("submitter thread panicked");
        }

        pool.shutdown().expect("failed to shutdown pool");

        assert_eq!(counter.get(), 1000);
        assert_eq!(pool.total_tasks_submitted(), 1000);
    }

    #[test]
    fn test_custom_error_sink_receives_reports() {
        use parking_lot::Mutex as PlMutex;

        #[derive(Default)]
        struct CaptureSink {
            reports: PlMutex<Vec<String>>,
        }

        impl ErrorSink for CaptureSink {
            fn task_failed(&self, _id: usize, task_type: &str, error: &PoolError) {
                self.reports
                    .lock()
                    .push(format!("failed {}: {}", task_type, error));
            }
            fn task_panicked(&self, _id: usize, task_type: &str, message: &str) {
                self.reports
                    .lock()
                    .push(format!("panicked {}: {}", task_type, message));
            }
        }

        let sink = Arc::new(CaptureSink::default());
        let config = WorkerPoolConfig::new(1)
            .with_error_sink(Arc::clone(&sink) as Arc<dyn ErrorSink>);
        let pool = WorkerPool::with_config(config).expect("failed to create pool");

        pool.execute(|| Err(PoolError::other("boom"))).unwrap();
        pool.execute(|| panic!("bang")).unwrap();
        pool.shutdown().expect("failed to shutdown pool");

        let reports = sink.reports.lock();
        assert_eq!(reports.len(), 2);
        assert!(reports[0].contains("boom"));
        assert!(reports[1].contains("bang"));
    }

    #[test]
    fn test_drop_shuts_down_running_pool() {
        let counter = SharedCounter::new(0);
        {
            let pool = WorkerPool::with_threads(2).expect("failed to create pool");
            for _ in 0..10 {
                let counter = counter.clone();
                pool.execute(move || {
                    counter.increment();
                    Ok(())
                })
                .expect("failed to submit task");
            }
            // Dropped without explicit shutdown
        }
        assert_eq!(counter.get(), 10);
    }
}
