//! One-way cancellation signals shared between tasks.

use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// A broadcastable, monotonic cancellation flag.
///
/// A signal starts out active and becomes cancelled either when [`cancel`]
/// is called on any clone of it, when its parent is cancelled, or when its
/// deadline passes. It never becomes active again.
///
/// Clones share the same underlying flag, so a signal can be handed to every
/// task an operation spawns.
///
/// # Examples
///
/// ```rust
/// use pipekit::Signal;
///
/// let signal = Signal::new();
/// let observer = signal.clone();
/// assert!(observer.is_active());
///
/// signal.cancel();
/// assert!(observer.is_cancelled());
/// ```
///
/// [`cancel`]: Signal::cancel
#[derive(Debug, Clone, Default)]
pub struct Signal {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Signal {
    /// Create a new signal that is cancelled manually
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: None,
        }
    }

    /// Create a signal nobody holds a reason to cancel.
    ///
    /// This is what the operations without a `_with_signal` suffix use.
    pub fn never() -> Self {
        Self::new()
    }

    /// Create a signal that cancels itself once `timeout` has elapsed.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// Create a signal that cancels itself at `deadline`.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Some(deadline),
        }
    }

    /// Derive a signal that is cancelled whenever this one is.
    ///
    /// Cancelling the child leaves the parent untouched.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    /// Derive a child signal that additionally expires after `timeout`.
    ///
    /// The child keeps the earlier of the two deadlines.
    pub fn child_with_timeout(&self, timeout: Duration) -> Self {
        let own = Instant::now() + timeout;
        Self {
            token: self.token.child_token(),
            deadline: Some(self.deadline.map_or(own, |parent| parent.min(own))),
        }
    }

    /// Trigger the signal. Idempotent.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Non-blocking check.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled() || self.deadline_passed()
    }

    /// Non-blocking check, the negation of [`is_cancelled`](Signal::is_cancelled).
    pub fn is_active(&self) -> bool {
        !self.is_cancelled()
    }

    /// The instant at which this signal expires on its own, if any
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Wait until the signal is cancelled.
    ///
    /// Completes immediately if it already is.
    pub async fn cancelled(&self) {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = self.token.cancelled() => {}
                    _ = tokio::time::sleep_until(deadline) => {}
                }
            }
            None => self.token.cancelled().await,
        }
    }

    fn deadline_passed(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

impl From<CancellationToken> for Signal {
    fn from(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }
}
