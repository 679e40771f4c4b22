//! Cancellable enqueue, the write primitive every other operation builds on.

use crate::error::{Error, Result};
use crate::instrument::{count, debug_event};
use crate::queue::Queue;
use crate::signal::Signal;

/// Put `value` into `queue`, waiting for space unless `signal` fires first.
///
/// Returns [`Error::Cancelled`] if the signal is (or becomes) cancelled
/// before the queue accepts the value. When both are ready at once the
/// signal wins, so this never waits once the signal is cancelled. Returns
/// [`Error::Closed`] if the queue is closed. On error the value is dropped.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use pipekit::{enqueue_with_signal, Error, Queue, Signal};
///
/// #[tokio::main]
/// async fn main() {
///     let queue = Queue::new(1);
///     let signal = Signal::with_timeout(Duration::from_millis(25));
///
///     assert!(enqueue_with_signal(&queue, 1, &signal).await.is_ok());
///     assert_eq!(
///         enqueue_with_signal(&queue, 2, &signal).await,
///         Err(Error::Cancelled)
///     );
/// }
/// ```
pub async fn enqueue_with_signal<T>(queue: &Queue<T>, value: T, signal: &Signal) -> Result<()> {
    let result = tokio::select! {
        biased;
        _ = signal.cancelled() => Err(Error::Cancelled),
        sent = queue.send(value) => sent,
    };

    match result {
        Ok(()) => count!("pipekit_enqueued_total"),
        Err(Error::Cancelled) => {
            count!("pipekit_enqueue_cancelled_total");
            debug_event!("enqueue cancelled");
        }
        Err(Error::Closed) => debug_event!("enqueue into closed queue"),
    }
    result
}

/// Put `value` into `queue`, waiting for space as long as it takes.
///
/// Only fails with [`Error::Closed`].
pub async fn enqueue<T>(queue: &Queue<T>, value: T) -> Result<()> {
    enqueue_with_signal(queue, value, &Signal::never()).await
}
