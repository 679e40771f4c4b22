//! Feeding a finite sequence into a new queue from a background task.

use futures_core::Stream;
use tokio_stream::StreamExt;

use crate::enqueue::enqueue_with_signal;
use crate::instrument::debug_event;
use crate::queue::Queue;
use crate::signal::Signal;

/// Spawn a task that enqueues every item of `items`, in order, into a new
/// queue of `buffer_size`.
///
/// The task stops early at the first failed enqueue (the signal fired or
/// someone closed the queue). Either way the queue is closed when the task
/// exits, so a reader draining it never waits forever.
///
/// # Panics
///
/// Panics if called outside of a tokio runtime.
///
/// # Examples
///
/// ```rust
/// use pipekit::{collect, produce};
///
/// #[tokio::main]
/// async fn main() {
///     let queue = produce(3, vec!["a", "b", "c"]);
///     assert_eq!(collect(queue).await, vec!["a", "b", "c"]);
/// }
/// ```
pub fn produce_with_signal<I>(buffer_size: usize, items: I, signal: Signal) -> Queue<I::Item>
where
    I: IntoIterator,
    I::IntoIter: Send + 'static,
    I::Item: Send + 'static,
{
    let queue = Queue::new(buffer_size);
    let writer = queue.close_guard();
    let items = items.into_iter();

    tokio::spawn(async move {
        for item in items {
            if enqueue_with_signal(writer.queue(), item, &signal).await.is_err() {
                break;
            }
        }
        debug_event!(
            cancelled = signal.is_cancelled(),
            closed = writer.queue().is_closed(),
            "producer finished"
        );
    });

    queue
}

/// [`produce_with_signal`] with a signal that never fires.
pub fn produce<I>(buffer_size: usize, items: I) -> Queue<I::Item>
where
    I: IntoIterator,
    I::IntoIter: Send + 'static,
    I::Item: Send + 'static,
{
    produce_with_signal(buffer_size, items, Signal::never())
}

/// Spawn a task that enqueues every item of `stream` into a new queue of
/// `buffer_size`.
///
/// Same contract as [`produce_with_signal`]. Waiting on the stream for its
/// next item is interrupted by the signal as well.
///
/// # Panics
///
/// Panics if called outside of a tokio runtime.
pub fn produce_stream_with_signal<S>(
    buffer_size: usize,
    stream: S,
    signal: Signal,
) -> Queue<S::Item>
where
    S: Stream + Send + 'static,
    S::Item: Send + 'static,
{
    let queue = Queue::new(buffer_size);
    let writer = queue.close_guard();

    tokio::spawn(async move {
        tokio::pin!(stream);
        loop {
            let next = tokio::select! {
                biased;
                _ = signal.cancelled() => None,
                item = stream.next() => item,
            };
            let Some(item) = next else {
                break;
            };
            if enqueue_with_signal(writer.queue(), item, &signal).await.is_err() {
                break;
            }
        }
        debug_event!(cancelled = signal.is_cancelled(), "stream producer finished");
    });

    queue
}

/// [`produce_stream_with_signal`] with a signal that never fires.
pub fn produce_stream<S>(buffer_size: usize, stream: S) -> Queue<S::Item>
where
    S: Stream + Send + 'static,
    S::Item: Send + 'static,
{
    produce_stream_with_signal(buffer_size, stream, Signal::never())
}
