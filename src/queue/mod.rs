//! Thread-safe hand-off queues between producers and consumers.
//!
//! The central type is [`BoundedQueue`], a capacity-bounded blocking FIFO
//! channel with a closeable "finished" state. Producers block when the queue
//! is full, consumers block when it is empty, and [`BoundedQueue::close`]
//! transitions the queue into drain mode: no new items are accepted, but
//! everything already queued can still be popped.
//!
//! # Example
//!
//! ```rust
//! use taskwell::queue::{BoundedQueue, PushError};
//!
//! let queue = BoundedQueue::new(2);
//! queue.push(1).unwrap();
//! queue.push(2).unwrap();
//! queue.close();
//!
//! // Pushing after close hands the item back to the caller.
//! match queue.push(3) {
//!     Err(PushError::Closed(item)) => assert_eq!(item, 3),
//!     _ => panic!("expected Closed error"),
//! }
//!
//! // Queued items drain before the queue reports empty-and-closed.
//! assert_eq!(queue.pop(), Some(1));
//! assert_eq!(queue.pop(), Some(2));
//! assert_eq!(queue.pop(), None);
//! ```

mod bounded;

pub use bounded::BoundedQueue;

use std::fmt;

/// Errors returned by push-side queue operations.
///
/// Every variant hands the rejected item back to the caller so it can be
/// retried, redirected, or dropped deliberately rather than lost inside
/// the queue.
#[derive(Debug, PartialEq, Eq)]
pub enum PushError<T> {
    /// The queue has been closed and accepts no new items.
    Closed(T),
    /// The queue is at capacity (non-blocking push only).
    Full(T),
    /// The wait for free space timed out (timed push only).
    Timeout(T),
}

impl<T> PushError<T> {
    /// Recovers the item that was rejected by the queue.
    pub fn into_inner(self) -> T {
        match self {
            PushError::Closed(item) | PushError::Full(item) | PushError::Timeout(item) => item,
        }
    }

    /// Returns `true` if the push failed because the queue was closed.
    pub fn is_closed(&self) -> bool {
        matches!(self, PushError::Closed(_))
    }
}

impl<T> fmt::Display for PushError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PushError::Closed(_) => write!(f, "queue is closed"),
            PushError::Full(_) => write!(f, "queue is full"),
            PushError::Timeout(_) => write!(f, "push timed out waiting for space"),
        }
    }
}

impl<T: fmt::Debug> std::error::Error for PushError<T> {}

/// Errors returned by [`BoundedQueue::try_pop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TryPopError {
    /// The queue is currently empty but still open.
    Empty,
    /// The queue is closed and fully drained.
    Closed,
}

impl fmt::Display for TryPopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TryPopError::Empty => write!(f, "queue is empty"),
            TryPopError::Closed => write!(f, "queue is closed and drained"),
        }
    }
}

impl std::error::Error for TryPopError {}
