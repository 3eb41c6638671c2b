//! Core types and traits for the worker pool

pub mod error;
pub mod sink;
pub mod task;

pub use error::{PoolError, Result};
pub use sink::{ErrorSink, LogSink};
pub use task::{BoxedTask, ClosureTask, Task};
