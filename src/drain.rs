//! Turning a queue back into an ordered sequence.

use futures::stream::{self, BoxStream, StreamExt};

use crate::queue::Queue;
use crate::signal::Signal;

/// Read `queue` as a lazy stream until it is drained or `signal` fires.
///
/// The stream ends, without error, at whichever comes first: the queue
/// being closed and empty, or the signal being cancelled. Items already
/// read are kept, so a cancelled drain yields the partial sequence.
///
/// The stream is single-pass: items it yields are removed from the queue.
pub fn drain_with_signal<T>(queue: Queue<T>, signal: Signal) -> BoxStream<'static, T>
where
    T: Send + 'static,
{
    stream::unfold((queue, signal), |(queue, signal)| async move {
        if signal.is_cancelled() {
            return None;
        }
        let next = tokio::select! {
            biased;
            _ = signal.cancelled() => None,
            item = queue.recv() => item,
        };
        next.map(|item| (item, (queue, signal)))
    })
    .boxed()
}

/// Read `queue` as a lazy stream until it is closed and empty.
pub fn drain<T>(queue: Queue<T>) -> BoxStream<'static, T>
where
    T: Send + 'static,
{
    drain_with_signal(queue, Signal::never())
}

/// Collect `queue` into a `Vec` until it is drained or `signal` fires.
pub async fn collect_with_signal<T>(queue: Queue<T>, signal: Signal) -> Vec<T>
where
    T: Send + 'static,
{
    drain_with_signal(queue, signal).collect().await
}

/// Collect `queue` into a `Vec` once it is closed.
///
/// Waits forever if nothing ever closes the queue.
pub async fn collect<T>(queue: Queue<T>) -> Vec<T>
where
    T: Send + 'static,
{
    drain(queue).collect().await
}
