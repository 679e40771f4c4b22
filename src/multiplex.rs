//! Fan-out/fan-in transformation across a fixed pool of worker tasks.

use std::future::{self, Future};
use std::sync::Arc;
use tokio::task::JoinSet;

use crate::enqueue::enqueue_with_signal;
use crate::instrument::{count, debug_event, warn_event};
use crate::queue::Queue;
use crate::signal::Signal;

/// Spawn `workers` tasks that read from `source`, apply `transform` and
/// write the results to a new queue.
///
/// The output has the source's capacity. Each worker stops when the source
/// is drained, the signal fires, or its write fails. The output is closed
/// once every worker has stopped. With zero workers the output is closed
/// right away and the source is left alone.
///
/// Workers race each other, so the output order is unspecified even for a
/// deterministic transform. A transform that panics only takes down its own
/// worker.
///
/// # Panics
///
/// Panics if called outside of a tokio runtime.
///
/// # Examples
///
/// ```rust
/// use pipekit::{collect, multiplex, produce};
///
/// #[tokio::main]
/// async fn main() {
///     let squares = multiplex(produce(5, 0..5), 3, |x: u32| x * x);
///     let mut squares = collect(squares).await;
///     squares.sort();
///     assert_eq!(squares, vec![0, 1, 4, 9, 16]);
/// }
/// ```
pub fn multiplex_with_signal<T, U, F>(
    source: Queue<T>,
    workers: usize,
    transform: F,
    signal: Signal,
) -> Queue<U>
where
    T: Send + 'static,
    U: Send + 'static,
    F: Fn(T) -> U + Send + Sync + 'static,
{
    multiplex_async_with_signal(
        source,
        workers,
        move |item| future::ready(transform(item)),
        signal,
    )
}

/// [`multiplex_with_signal`] with a signal that never fires.
pub fn multiplex<T, U, F>(source: Queue<T>, workers: usize, transform: F) -> Queue<U>
where
    T: Send + 'static,
    U: Send + 'static,
    F: Fn(T) -> U + Send + Sync + 'static,
{
    multiplex_with_signal(source, workers, transform, Signal::never())
}

/// Like [`multiplex_with_signal`], for a transform that returns a future.
///
/// A transform already in flight when the signal fires runs to completion;
/// its result is dropped if the write that follows is cancelled.
///
/// # Panics
///
/// Panics if called outside of a tokio runtime.
pub fn multiplex_async_with_signal<T, U, F, Fut>(
    source: Queue<T>,
    workers: usize,
    transform: F,
    signal: Signal,
) -> Queue<U>
where
    T: Send + 'static,
    U: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = U> + Send + 'static,
{
    let output = Queue::new(source.capacity());
    let closer = output.close_guard();
    let transform = Arc::new(transform);

    let mut pool = JoinSet::new();
    for _ in 0..workers {
        pool.spawn(run_worker(
            source.clone(),
            output.clone(),
            Arc::clone(&transform),
            signal.clone(),
        ));
    }

    tokio::spawn(async move {
        while let Some(joined) = pool.join_next().await {
            if let Err(e) = joined {
                if e.is_panic() {
                    count!("pipekit_worker_panics_total");
                }
                warn_event!(error = %e, "multiplex worker failed");
            }
        }
        debug_event!(workers, "multiplex workers finished, closing output");
        drop(closer);
    });

    output
}

/// [`multiplex_async_with_signal`] with a signal that never fires.
pub fn multiplex_async<T, U, F, Fut>(source: Queue<T>, workers: usize, transform: F) -> Queue<U>
where
    T: Send + 'static,
    U: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = U> + Send + 'static,
{
    multiplex_async_with_signal(source, workers, transform, Signal::never())
}

async fn run_worker<T, U, F, Fut>(
    source: Queue<T>,
    output: Queue<U>,
    transform: Arc<F>,
    signal: Signal,
) where
    F: Fn(T) -> Fut,
    Fut: Future<Output = U>,
{
    #[cfg(feature = "tracing")]
    let mut processed = 0usize;
    while signal.is_active() {
        let next = tokio::select! {
            biased;
            _ = signal.cancelled() => None,
            item = source.recv() => item,
        };
        let Some(item) = next else {
            break;
        };

        let result = transform(item).await;
        if enqueue_with_signal(&output, result, &signal).await.is_err() {
            break;
        }
        #[cfg(feature = "tracing")]
        {
            processed += 1;
        }
    }
    debug_event!(processed, "multiplex worker stopped");
}
