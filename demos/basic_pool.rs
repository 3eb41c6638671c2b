//! Basic worker pool usage: construct a pool, enqueue tasks, shut down cleanly.
//!
//! Run with: `cargo run --example basic_pool`

use taskwell::prelude::*;

fn main() -> Result<()> {
    env_logger::init();

    let config = WorkerPoolConfig::new(4)
        .with_queue_capacity(16)
        .with_thread_name_prefix("demo-worker");
    let pool = WorkerPool::with_config(config)?;

    let completed = SharedCounter::new(0);

    for i in 0..20 {
        let completed = completed.clone();
        pool.execute(move || {
            let name = std::thread::current()
                .name()
                .unwrap_or("unnamed")
                .to_string();
            println!("task {:2} running on {}", i, name);
            completed.increment();
            Ok(())
        })?;
    }

    // One task that fails: reported through the log facade, pool unaffected
    pool.execute(|| Err(PoolError::other("simulated task failure")))?;

    pool.shutdown()?;

    println!();
    println!("completed tasks:  {}", completed.get());
    println!("submitted:        {}", pool.total_tasks_submitted());
    println!("processed:        {}", pool.total_tasks_processed());
    println!("failed:           {}", pool.total_tasks_failed());

    Ok(())
}
