//! Error types for queue operations.

use std::fmt;

/// The main error type for queue operations.
///
/// Reaching the end of a queue is not an error: readers see `None` once a
/// queue is closed and empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The cancellation signal fired before the write completed
    #[error("Operation was cancelled")]
    Cancelled,

    /// The destination queue was closed before the write completed
    #[error("Queue was closed")]
    Closed,
}

impl Error {
    /// Returns true if this error was caused by a cancellation signal
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }

    /// Returns true if this error was caused by a closed queue
    pub fn is_closed(&self) -> bool {
        matches!(self, Error::Closed)
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, Error>;

/// Error returned by [`Queue::try_send`](crate::queue::Queue::try_send).
///
/// Both variants hand the rejected value back to the caller.
#[derive(PartialEq, Eq, Clone, Copy)]
pub enum TrySendError<T> {
    /// The queue is at capacity
    Full(T),
    /// The queue is closed
    Closed(T),
}

impl<T> TrySendError<T> {
    /// Take back the value that could not be sent
    pub fn into_inner(self) -> T {
        match self {
            TrySendError::Full(value) | TrySendError::Closed(value) => value,
        }
    }
}

impl<T> fmt::Debug for TrySendError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrySendError::Full(_) => write!(f, "Full(..)"),
            TrySendError::Closed(_) => write!(f, "Closed(..)"),
        }
    }
}

impl<T> fmt::Display for TrySendError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrySendError::Full(_) => write!(f, "Queue is full"),
            TrySendError::Closed(_) => write!(f, "Queue was closed"),
        }
    }
}

impl<T> std::error::Error for TrySendError<T> {}
