//! Convenient re-exports for common types and traits

pub use crate::core::{
    BoxedTask, ClosureTask, ErrorSink, LogSink, PoolError, Result, Task,
};
pub use crate::counter::SharedCounter;
pub use crate::pool::{PoolState, WorkerPool, WorkerPoolConfig, WorkerStats};
pub use crate::queue::{BoundedQueue, PushError, TryPopError};
