//! Task trait and related types

use crate::core::error::Result;
use std::fmt;

/// A trait representing a deferred unit of work executed by the worker pool.
///
/// A task runs exactly once: it is owned by the queue from submission until
/// a worker dequeues and executes it.
pub trait Task: Send {
    /// Run the task
    ///
    /// # Errors
    ///
    /// Returns an error if the task body fails. The error is reported at
    /// the worker boundary and never crashes the worker thread.
    fn run(&mut self) -> Result<()>;

    /// Get the task's type name for reporting and statistics
    fn task_type(&self) -> &str {
        "Task"
    }
}

impl fmt::Debug for dyn Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Task({})", self.task_type())
    }
}

/// A boxed task that can be sent across threads
pub type BoxedTask = Box<dyn Task>;

/// Helper to create a task from a closure
pub struct ClosureTask<F>
where
    F: FnOnce() -> Result<()> + Send,
{
    closure: Option<F>,
    name: String,
}

impl<F> ClosureTask<F>
where
    F: FnOnce() -> Result<()> + Send,
{
    /// Create a new closure task
    pub fn new(closure: F) -> Self {
        Self {
            closure: Some(closure),
            name: "ClosureTask".to_string(),
        }
    }

    /// Create a new closure task with a custom name
    pub fn with_name<S: Into<String>>(closure: F, name: S) -> Self {
        Self {
            closure: Some(closure),
            name: name.into(),
        }
    }
}

impl<F> Task for ClosureTask<F>
where
    F: FnOnce() -> Result<()> + Send,
{
    fn run(&mut self) -> Result<()> {
        if let Some(closure) = self.closure.take() {
            closure()
        } else {
            // Closure already consumed, return error instead of silently succeeding
            Err(crate::core::PoolError::execution(
                self.name.as_str(),
                "ClosureTask already executed - cannot run twice",
            ))
        }
    }

    fn task_type(&self) -> &str {
        &self.name
    }
}
