//! Producer/consumer hand-off over a bounded queue.
//!
//! Two producers push into a small queue while one consumer drains it; the
//! capacity bound applies backpressure to the producers. Closing the queue
//! lets the consumer drain the remainder and exit.
//!
//! Run with: `cargo run --example producer_consumer`

use std::sync::Arc;
use std::thread;
use std::time::Duration;
use taskwell::queue::BoundedQueue;

fn main() {
    env_logger::init();

    let queue = Arc::new(BoundedQueue::new(5));

    let mut producers = Vec::new();
    for p in 0..2 {
        let queue = Arc::clone(&queue);
        producers.push(thread::spawn(move || {
            for i in 0..10 {
                let item = p * 100 + i;
                queue.push(item).unwrap();
                println!("producer {} pushed {:3} (queue len {})", p, item, queue.len());
                thread::sleep(Duration::from_millis(5));
            }
        }));
    }

    let consumer = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || {
            let mut consumed = 0;
            while let Some(item) = queue.pop() {
                println!("consumer popped  {:3}", item);
                consumed += 1;
                thread::sleep(Duration::from_millis(10));
            }
            consumed
        })
    };

    for producer in producers {
        producer.join().unwrap();
    }

    // No more producers: close and let the consumer drain the rest
    queue.close();

    let consumed = consumer.join().unwrap();
    println!("consumed {} items, queue drained: {}", consumed, queue.is_empty());
}
