//! Worker-boundary failure reporting.
//!
//! Errors raised inside a task are isolated to that task: the worker catches
//! them (and panics) and hands them to an [`ErrorSink`] instead of letting
//! them escape the worker loop. The default sink reports through the `log`
//! facade; tests and embedding applications can inject their own sink via
//! [`WorkerPoolConfig::with_error_sink`].
//!
//! [`WorkerPoolConfig::with_error_sink`]: crate::pool::WorkerPoolConfig::with_error_sink

use crate::core::PoolError;

/// Receives failure reports from worker threads.
///
/// Implementations must be cheap and must not panic; they are invoked on the
/// worker thread between tasks.
pub trait ErrorSink: Send + Sync {
    /// Called when a task body returns an error.
    fn task_failed(&self, worker_id: usize, task_type: &str, error: &PoolError);

    /// Called when a task body panics. The panic is already caught; the
    /// worker thread survives and keeps processing.
    fn task_panicked(&self, worker_id: usize, task_type: &str, message: &str);
}

/// Default sink that reports failures through the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ErrorSink for LogSink {
    fn task_failed(&self, worker_id: usize, task_type: &str, error: &PoolError) {
        log::warn!(
            "worker {}: task '{}' failed: {}",
            worker_id,
            task_type,
            error
        );
    }

    fn task_panicked(&self, worker_id: usize, task_type: &str, message: &str) {
        log::error!(
            "worker {}: task '{}' panicked: {}",
            worker_id,
            task_type,
            message
        );
    }
}
