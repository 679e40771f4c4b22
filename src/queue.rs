//! Bounded FIFO queue with an explicit close.
//!
//! A [`Queue`] is a handle: clones share the same channel, so any number of
//! tasks can write to or read from one queue. Closing is one-way. Once a
//! queue is closed, writes fail while buffered items remain readable, and
//! readers observe `None` after the last one.

use std::fmt;

use crate::error::{Error, Result, TrySendError};
use crate::instrument::debug_event;

/// A bounded, ordered, concurrency-safe buffer.
///
/// # Examples
///
/// ```rust
/// use pipekit::Queue;
///
/// #[tokio::main]
/// async fn main() {
///     let queue = Queue::new(2);
///     queue.send(1).await.unwrap();
///     queue.send(2).await.unwrap();
///     queue.close();
///
///     assert_eq!(queue.recv().await, Some(1));
///     assert_eq!(queue.recv().await, Some(2));
///     assert_eq!(queue.recv().await, None);
/// }
/// ```
pub struct Queue<T> {
    sender: async_channel::Sender<T>,
    receiver: async_channel::Receiver<T>,
    capacity: usize,
}

impl<T> Queue<T> {
    /// Create an open queue holding at most `capacity` items.
    ///
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (sender, receiver) = async_channel::bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Maximum number of buffered items
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of items currently buffered
    pub fn len(&self) -> usize {
        self.sender.len()
    }

    /// Returns true if no items are buffered
    pub fn is_empty(&self) -> bool {
        self.sender.is_empty()
    }

    /// Returns true once the queue has been closed
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Returns true once the queue is closed and every item has been read
    pub fn is_drained(&self) -> bool {
        self.is_closed() && self.is_empty()
    }

    /// Close the queue.
    ///
    /// Returns true for the call that performed the transition and false for
    /// every later call. Wakes all waiting readers and writers.
    pub fn close(&self) -> bool {
        let closed = self.sender.close();
        if closed {
            debug_event!(capacity = self.capacity, "queue closed");
        }
        closed
    }

    /// Create a guard that closes this queue when dropped.
    pub fn close_guard(&self) -> CloseGuard<T> {
        CloseGuard {
            queue: self.clone(),
        }
    }

    /// Push an item without waiting.
    pub fn try_send(&self, value: T) -> std::result::Result<(), TrySendError<T>> {
        self.sender.try_send(value).map_err(|e| match e {
            async_channel::TrySendError::Full(value) => TrySendError::Full(value),
            async_channel::TrySendError::Closed(value) => TrySendError::Closed(value),
        })
    }

    /// Push an item, waiting while the queue is full.
    ///
    /// Fails with [`Error::Closed`] if the queue is closed before the item
    /// is accepted. Dropping the returned future before it completes drops
    /// the item without enqueuing it.
    pub async fn send(&self, value: T) -> Result<()> {
        self.sender.send(value).await.map_err(|_| Error::Closed)
    }

    /// Pop an item without waiting.
    ///
    /// Returns `None` if the queue is currently empty, whether or not it is closed.
    pub fn try_recv(&self) -> Option<T> {
        self.receiver.try_recv().ok()
    }

    /// Pop the next item, waiting while the queue is empty and open.
    ///
    /// Returns `None` once the queue is closed and empty.
    pub async fn recv(&self) -> Option<T> {
        self.receiver.recv().await.ok()
    }
}

impl<T> Clone for Queue<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            receiver: self.receiver.clone(),
            capacity: self.capacity,
        }
    }
}

impl<T> fmt::Debug for Queue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Queue")
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Closes its queue when dropped.
///
/// Background tasks hold one of these for every queue they write to, so the
/// queue closes on every exit path, including a panic.
#[must_use = "the queue closes as soon as the guard is dropped"]
pub struct CloseGuard<T> {
    queue: Queue<T>,
}

impl<T> CloseGuard<T> {
    /// The guarded queue
    pub fn queue(&self) -> &Queue<T> {
        &self.queue
    }
}

impl<T> Drop for CloseGuard<T> {
    fn drop(&mut self) {
        self.queue.close();
    }
}
