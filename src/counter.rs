//! Shared atomic counter.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// A thread-safe integer counter shared between threads by cloning.
///
/// All mutations are atomic: concurrent increments from any number of
/// threads never lose an update. Clones share the same underlying value.
///
/// # Example
///
/// ```rust
/// use taskwell::counter::SharedCounter;
/// use std::thread;
///
/// let counter = SharedCounter::new(0);
/// let handles: Vec<_> = (0..4)
///     .map(|_| {
///         let counter = counter.clone();
///         thread::spawn(move || {
///             for _ in 0..100 {
///                 counter.increment();
///             }
///         })
///     })
///     .collect();
/// for h in handles {
///     h.join().unwrap();
/// }
/// assert_eq!(counter.get(), 400);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SharedCounter {
    value: Arc<AtomicI64>,
}

impl SharedCounter {
    /// Create a counter with the given initial value
    pub fn new(initial: i64) -> Self {
        Self {
            value: Arc::new(AtomicI64::new(initial)),
        }
    }

    /// Atomically add 1
    pub fn increment(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    /// Atomically subtract 1
    pub fn decrement(&self) {
        self.value.fetch_sub(1, Ordering::Relaxed);
    }

    /// Atomically add `delta` (which may be negative)
    pub fn add(&self, delta: i64) {
        self.value.fetch_add(delta, Ordering::Relaxed);
    }

    /// Read the current value
    pub fn get(&self) -> i64 {
        self.value.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_basic_operations() {
        let counter = SharedCounter::new(10);
        counter.increment();
        counter.increment();
        counter.decrement();
        counter.add(5);
        counter.add(-3);
        assert_eq!(counter.get(), 13);
    }

    #[test]
    fn test_default_starts_at_zero() {
        let counter = SharedCounter::default();
        assert_eq!(counter.get(), 0);
    }

    #[test]
    fn test_clones_share_state() {
        let counter = SharedCounter::new(0);
        let clone = counter.clone();
        clone.increment();
        assert_eq!(counter.get(), 1);
    }

    #[test]
    fn test_concurrent_increments_lose_nothing() {
        let counter = SharedCounter::new(0);
        let threads: i64 = 8;
        let increments_per_thread: i64 = 1000;

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let counter = counter.clone();
                thread::spawn(move || {
                    for _ in 0..increments_per_thread {
                        counter.increment();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(counter.get(), threads * increments_per_thread);
    }
}
