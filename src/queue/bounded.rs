//! Bounded blocking FIFO queue with a closeable finished state.

use super::{PushError, TryPopError};
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

struct Inner<T> {
    items: VecDeque<T>,
    closed: bool,
}

/// A capacity-bounded, thread-safe FIFO hand-off channel.
///
/// All state lives behind a single `parking_lot::Mutex`; producers suspend on
/// the `not_full` condition variable when the queue is at capacity and
/// consumers suspend on `not_empty` when it is drained. [`close`] is a
/// one-way transition that wakes every waiter so blocked threads observe the
/// new state instead of sleeping forever.
///
/// # Guarantees
///
/// - `len()` never exceeds the configured capacity.
/// - Items are delivered in FIFO order relative to a single producer and a
///   single consumer; ordering across multiple producers or consumers is
///   unspecified.
/// - No item is lost or delivered twice: each pushed item is popped exactly
///   once, or remains queued until drained after [`close`].
///
/// [`close`]: BoundedQueue::close
///
/// # Example
///
/// ```rust
/// use taskwell::queue::BoundedQueue;
///
/// let queue = BoundedQueue::new(8);
/// queue.push("job").unwrap();
/// assert_eq!(queue.pop(), Some("job"));
/// ```
pub struct BoundedQueue<T> {
    inner: Mutex<Inner<T>>,
    not_full: Condvar,
    not_empty: Condvar,
    capacity: usize,
}

impl<T> BoundedQueue<T> {
    /// Creates a new bounded queue with the specified capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be greater than 0");
        Self {
            inner: Mutex::new(Inner {
                items: VecDeque::with_capacity(capacity),
                closed: false,
            }),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
            capacity,
        }
    }

    /// Returns the maximum capacity of this queue.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Appends an item to the tail, blocking while the queue is full.
    ///
    /// Wakes one waiting consumer on success.
    ///
    /// # Errors
    ///
    /// Returns [`PushError::Closed`] with the item handed back if the queue
    /// has been closed, including when close happens while this call is
    /// blocked waiting for space.
    pub fn push(&self, item: T) -> Result<(), PushError<T>> {
        let mut inner = self.inner.lock();
        while inner.items.len() == self.capacity && !inner.closed {
            self.not_full.wait(&mut inner);
        }
        if inner.closed {
            return Err(PushError::Closed(item));
        }
        inner.items.push_back(item);
        drop(inner);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Attempts to append an item without blocking.
    ///
    /// # Errors
    ///
    /// - [`PushError::Full`] if the queue is at capacity
    /// - [`PushError::Closed`] if the queue has been closed
    pub fn try_push(&self, item: T) -> Result<(), PushError<T>> {
        let mut inner = self.inner.lock();
        if inner.closed {
            return Err(PushError::Closed(item));
        }
        if inner.items.len() == self.capacity {
            return Err(PushError::Full(item));
        }
        inner.items.push_back(item);
        drop(inner);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Appends an item, waiting up to `timeout` for space.
    ///
    /// # Errors
    ///
    /// - [`PushError::Timeout`] if no space became available in time
    /// - [`PushError::Closed`] if the queue has been closed
    pub fn push_timeout(&self, item: T, timeout: Duration) -> Result<(), PushError<T>> {
        let deadline = Instant::now() + timeout;
        let mut inner = self.inner.lock();
        loop {
            if inner.closed {
                return Err(PushError::Closed(item));
            }
            if inner.items.len() < self.capacity {
                break;
            }
            if self.not_full.wait_until(&mut inner, deadline).timed_out() {
                if inner.closed {
                    return Err(PushError::Closed(item));
                }
                if inner.items.len() < self.capacity {
                    break;
                }
                return Err(PushError::Timeout(item));
            }
        }
        inner.items.push_back(item);
        drop(inner);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Removes and returns the head item, blocking while the queue is empty.
    ///
    /// Returns `None` only once the queue is closed AND fully drained, so
    /// every item pushed before [`close`](BoundedQueue::close) is still
    /// delivered. Wakes one waiting producer on success.
    pub fn pop(&self) -> Option<T> {
        let mut inner = self.inner.lock();
        while inner.items.is_empty() && !inner.closed {
            self.not_empty.wait(&mut inner);
        }
        match inner.items.pop_front() {
            Some(item) => {
                drop(inner);
                self.not_full.notify_one();
                Some(item)
            }
            None => None,
        }
    }

    /// Attempts to remove the head item without blocking.
    ///
    /// # Errors
    ///
    /// - [`TryPopError::Empty`] if the queue is empty but still open
    /// - [`TryPopError::Closed`] if the queue is closed and drained
    pub fn try_pop(&self) -> Result<T, TryPopError> {
        let mut inner = self.inner.lock();
        match inner.items.pop_front() {
            Some(item) => {
                drop(inner);
                self.not_full.notify_one();
                Ok(item)
            }
            None => Err(if inner.closed {
                TryPopError::Closed
            } else {
                TryPopError::Empty
            }),
        }
    }

    /// Closes the queue, rejecting all subsequent pushes.
    ///
    /// Idempotent. Items already queued can still be popped; once they are
    /// drained, [`pop`](BoundedQueue::pop) returns `None`. All threads
    /// blocked in `push` or `pop` are woken so they observe the closed state.
    pub fn close(&self) {
        let mut inner = self.inner.lock();
        if inner.closed {
            return;
        }
        inner.closed = true;
        drop(inner);
        self.not_full.notify_all();
        self.not_empty.notify_all();
    }

    /// Returns `true` if the queue has been closed.
    pub fn is_closed(&self) -> bool {
        self.inner.lock().closed
    }

    /// Returns the exact number of queued items as a snapshot under the lock.
    pub fn len(&self) -> usize {
        self.inner.lock().items.len()
    }

    /// Returns `true` if the queue holds no items.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().items.is_empty()
    }
}

impl<T> fmt::Debug for BoundedQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("BoundedQueue")
            .field("len", &inner.items.len())
            .field("capacity", &self.capacity)
            .field("closed", &inner.closed)
            .finish()
    }
}
