//! # Taskwell
//!
//! A bounded blocking task queue feeding a fixed-size worker pool, with
//! graceful drain-on-shutdown semantics.
//!
//! ## Features
//!
//! - **Bounded Queue**: capacity-bounded FIFO hand-off channel built on a
//!   mutex and condition variables; producers block when full, consumers
//!   block when empty
//! - **Worker Pool**: fixed set of worker threads started at construction,
//!   pulling tasks from the shared queue until shutdown
//! - **Graceful Shutdown**: closing drains every queued task before workers
//!   exit; each accepted task runs exactly once
//! - **Failure Isolation**: task errors and panics are caught at the worker
//!   boundary and reported to an injected sink, never killing a worker
//! - **Shared Counter**: minimal atomic counter for cross-thread bookkeeping
//!
//! ## Quick Start
//!
//! ```rust
//! use taskwell::prelude::*;
//!
//! # fn main() -> Result<()> {
//! // Workers start immediately at construction
//! let pool = WorkerPool::with_threads(4)?;
//!
//! let completed = SharedCounter::new(0);
//! for _ in 0..10 {
//!     let completed = completed.clone();
//!     pool.execute(move || {
//!         completed.increment();
//!         Ok(())
//!     })?;
//! }
//!
//! // Blocks until every accepted task has run
//! pool.shutdown()?;
//! assert_eq!(completed.get(), 10);
//! # Ok(())
//! # }
//! ```
//!
//! ## Pool Configuration
//!
//! ```rust
//! use taskwell::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let config = WorkerPoolConfig::new(8)
//!     .with_queue_capacity(1000)
//!     .with_thread_name_prefix("my-worker");
//!
//! let pool = WorkerPool::with_config(config)?;
//! # pool.shutdown()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Custom Tasks
//!
//! ```rust
//! use taskwell::prelude::*;
//!
//! struct IndexTask {
//!     document: String,
//! }
//!
//! impl Task for IndexTask {
//!     fn run(&mut self) -> Result<()> {
//!         println!("indexing: {}", self.document);
//!         Ok(())
//!     }
//!
//!     fn task_type(&self) -> &str {
//!         "IndexTask"
//!     }
//! }
//!
//! # fn main() -> Result<()> {
//! # let pool = WorkerPool::with_threads(2)?;
//! pool.submit(IndexTask {
//!     document: "report.txt".to_string(),
//! })?;
//! # pool.shutdown()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Using the Queue Directly
//!
//! The queue is exposed as a standalone producer/consumer channel:
//!
//! ```rust
//! use taskwell::queue::BoundedQueue;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let queue = Arc::new(BoundedQueue::new(5));
//!
//! let producer = {
//!     let queue = Arc::clone(&queue);
//!     thread::spawn(move || {
//!         for i in 0..10 {
//!             queue.push(i).unwrap();
//!         }
//!         queue.close();
//!     })
//! };
//!
//! let mut received = Vec::new();
//! while let Some(item) = queue.pop() {
//!     received.push(item);
//! }
//! producer.join().unwrap();
//! assert_eq!(received, (0..10).collect::<Vec<_>>());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod core;
pub mod counter;
pub mod pool;
pub mod prelude;
pub mod queue;

pub use crate::core::{BoxedTask, ClosureTask, ErrorSink, LogSink, PoolError, Result, Task};
pub use counter::SharedCounter;
pub use pool::{PoolState, WorkerPool, WorkerPoolConfig, WorkerStats};
pub use queue::{BoundedQueue, PushError, TryPopError};
