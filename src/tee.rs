//! Duplicating one queue into two.

use crate::enqueue::enqueue_with_signal;
use crate::instrument::debug_event;
use crate::queue::Queue;
use crate::signal::Signal;

/// Spawn a task that copies every item of `source` into two new queues.
///
/// Both outputs get the source's capacity. Each item is written to the
/// first output and then, only if that write succeeded, to the second. The
/// task stops when the source is drained, the signal fires, or a write
/// fails, and closes both outputs on exit.
///
/// Without cancellation both outputs are exact, order-preserving copies of
/// the source. A cancellation that lands between the two writes of one item
/// leaves that item in the first output only; it is not rolled back.
///
/// The task writes to the first output before the second, so a reader that
/// only drains the second output stalls once the first one fills up.
///
/// # Panics
///
/// Panics if called outside of a tokio runtime.
///
/// # Examples
///
/// ```rust
/// use pipekit::{collect, produce, tee};
///
/// #[tokio::main]
/// async fn main() {
///     let (left, right) = tee(produce(3, vec![1, 2, 3]));
///     let (left, right) = tokio::join!(collect(left), collect(right));
///     assert_eq!(left, vec![1, 2, 3]);
///     assert_eq!(right, vec![1, 2, 3]);
/// }
/// ```
pub fn tee_with_signal<T>(source: Queue<T>, signal: Signal) -> (Queue<T>, Queue<T>)
where
    T: Clone + Send + 'static,
{
    let first = Queue::new(source.capacity());
    let second = Queue::new(source.capacity());
    let first_writer = first.close_guard();
    let second_writer = second.close_guard();

    tokio::spawn(async move {
        loop {
            if signal.is_cancelled() {
                break;
            }
            let next = tokio::select! {
                biased;
                _ = signal.cancelled() => None,
                item = source.recv() => item,
            };
            let Some(item) = next else {
                break;
            };

            if enqueue_with_signal(first_writer.queue(), item.clone(), &signal)
                .await
                .is_err()
            {
                break;
            }
            if enqueue_with_signal(second_writer.queue(), item, &signal)
                .await
                .is_err()
            {
                break;
            }
        }
        debug_event!(
            cancelled = signal.is_cancelled(),
            source_drained = source.is_drained(),
            "tee finished"
        );
    });

    (first, second)
}

/// [`tee_with_signal`] with a signal that never fires.
pub fn tee<T>(source: Queue<T>) -> (Queue<T>, Queue<T>)
where
    T: Clone + Send + 'static,
{
    tee_with_signal(source, Signal::never())
}
