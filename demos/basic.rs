//! Basic usage examples for pipekit
//!
//! Run with: cargo run --example basic

use pipekit::prelude::*;
use std::time::Duration;

/// Example 1: Sequence to queue and back
async fn round_trip_example() {
    println!("=== Produce and Collect ===");

    let queue = produce(3, 1..=10);
    let items = collect(queue).await;
    println!("Collected: {:?}", items);

    println!();
}

/// Example 2: Parallel transform
async fn multiplex_example() {
    println!("=== Multiplex ===");

    let squares = multiplex(produce(8, 1..=16), 4, |x: u64| x * x);
    let mut items = collect(squares).await;
    println!("Unordered squares: {:?}", items);
    items.sort();
    println!("Sorted squares:    {:?}", items);

    println!();
}

/// Example 3: Duplicating a queue
async fn tee_example() {
    println!("=== Tee ===");

    let (evens, odds) = tee(produce(4, 0..10));
    let evens = multiplex(evens, 1, |x: i32| if x % 2 == 0 { Some(x) } else { None });
    let odds = multiplex(odds, 1, |x: i32| if x % 2 == 1 { Some(x) } else { None });

    let (evens, odds) = tokio::join!(collect(evens), collect(odds));
    println!("Evens: {:?}", evens.into_iter().flatten().collect::<Vec<_>>());
    println!("Odds:  {:?}", odds.into_iter().flatten().collect::<Vec<_>>());

    println!();
}

/// Example 4: Timeouts
async fn timeout_example() -> Result<()> {
    println!("=== Timeouts ===");

    let queue = Queue::new(1);
    let signal = Signal::with_timeout(Duration::from_millis(25));

    enqueue_with_signal(&queue, "first", &signal).await?;
    match enqueue_with_signal(&queue, "second", &signal).await {
        Ok(()) => println!("Unexpectedly accepted a second item"),
        Err(e) => println!("Second enqueue failed: {}", e),
    }

    println!();
    Ok(())
}

/// Example 5: Pipelines with a shared deadline
async fn pipeline_example() {
    println!("=== Pipeline ===");

    let config = PipelineConfig::default()
        .buffer_size(4)
        .workers(2)
        .timeout(Duration::from_millis(100));

    let start = std::time::Instant::now();
    let items = Pipeline::with_config(0u64.., config)
        .map_async(|x| async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            x * 10
        })
        .collect()
        .await;

    println!(
        "Endless input cut off after {:.2}s with {} items",
        start.elapsed().as_secs_f64(),
        items.len()
    );

    println!();
}

#[tokio::main]
async fn main() -> Result<()> {
    round_trip_example().await;
    multiplex_example().await;
    tee_example().await;
    timeout_example().await?;
    pipeline_example().await;
    Ok(())
}
