//! Error types for the worker pool

/// Result type for worker pool operations
pub type Result<T> = std::result::Result<T, PoolError>;

/// Errors that can occur in the worker pool
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PoolError {
    /// Pool shutdown has begun; no new tasks are accepted
    #[error("worker pool is shut down ({pending_tasks} tasks pending)")]
    Shutdown {
        /// Number of tasks still queued at the time of rejection
        pending_tasks: usize,
    },

    /// Task queue is at capacity
    #[error("task queue is full: {current}/{max} tasks queued")]
    QueueFull {
        /// Current queue size
        current: usize,
        /// Maximum queue size
        max: usize,
    },

    /// Task submission timed out waiting for queue space
    #[error("task submission timed out after {timeout_ms}ms")]
    SubmissionTimeout {
        /// Timeout duration in milliseconds
        timeout_ms: u64,
    },

    /// Failed to spawn a worker thread
    #[error("failed to spawn worker thread #{worker_id}: {message}")]
    Spawn {
        /// ID of the worker that failed to spawn
        worker_id: usize,
        /// Error message
        message: String,
        /// Source IO error
        #[source]
        source: Option<std::io::Error>,
    },

    /// Failed to join a worker thread
    #[error("failed to join worker thread #{worker_id}: {message}")]
    Join {
        /// ID of the worker that failed to join
        worker_id: usize,
        /// Error message
        message: String,
    },

    /// Task body failed during execution
    #[error("task execution failed ({task_type}): {message}")]
    Execution {
        /// Type name of the failed task
        task_type: String,
        /// Error message
        message: String,
    },

    /// Invalid configuration
    #[error("invalid configuration for '{parameter}': {message}")]
    InvalidConfig {
        /// Configuration parameter name
        parameter: String,
        /// Error message
        message: String,
    },

    /// General error
    #[error("{0}")]
    Other(String),
}

impl PoolError {
    /// Create a shutdown error
    pub fn shutdown(pending_tasks: usize) -> Self {
        PoolError::Shutdown { pending_tasks }
    }

    /// Create a queue full error
    pub fn queue_full(current: usize, max: usize) -> Self {
        PoolError::QueueFull { current, max }
    }

    /// Create a submission timeout error
    pub fn submission_timeout(timeout_ms: u64) -> Self {
        PoolError::SubmissionTimeout { timeout_ms }
    }

    /// Create a spawn error
    pub fn spawn(worker_id: usize, message: impl Into<String>) -> Self {
        PoolError::Spawn {
            worker_id,
            message: message.into(),
            source: None,
        }
    }

    /// Create a spawn error with the underlying IO error
    pub fn spawn_with_source(
        worker_id: usize,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        PoolError::Spawn {
            worker_id,
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create a join error
    pub fn join(worker_id: usize, message: impl Into<String>) -> Self {
        PoolError::Join {
            worker_id,
            message: message.into(),
        }
    }

    /// Create an execution error
    pub fn execution(task_type: impl Into<String>, message: impl Into<String>) -> Self {
        PoolError::Execution {
            task_type: task_type.into(),
            message: message.into(),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        PoolError::InvalidConfig {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        PoolError::Other(msg.into())
    }
}
