//! # Cancellable operations over bounded async queues
//!
//! This crate provides a handful of building blocks for moving data between
//! tokio tasks through bounded FIFO queues, where every blocking step can be
//! interrupted by a shared cancellation signal.
//!
//! ## Core Concepts
//!
//! - **Queue**: A bounded buffer with a one-way close
//! - **Signal**: A broadcastable cancellation flag, optionally with a deadline
//! - **Enqueue**: The cancellable write every other operation is built on
//! - **Produce / Drain**: Turn a sequence into a queue and back
//! - **Tee**: Duplicate one queue into two
//! - **Multiplex**: Transform a queue on a fixed pool of worker tasks
//!
//! Each operation has a `_with_signal` form taking a [`Signal`], and a
//! shorthand that uses a signal which never fires.
//!
//! ## Example
//!
//! ```rust
//! use pipekit::prelude::*;
//!
//! #[tokio::main]
//! async fn main() {
//!     let numbers = produce(10, 0..10);
//!     let (left, right) = tee(numbers);
//!
//!     let squares = multiplex(left, 4, |x: u64| x * x);
//!     let (mut squares, plain) = tokio::join!(collect(squares), collect(right));
//!     squares.sort();
//!
//!     assert_eq!(plain, (0..10).collect::<Vec<_>>());
//!     assert_eq!(squares, vec![0, 1, 4, 9, 16, 25, 36, 49, 64, 81]);
//! }
//! ```

mod instrument;

pub mod drain;
pub mod enqueue;
pub mod error;
pub mod multiplex;
pub mod pipeline;
pub mod produce;
pub mod queue;
pub mod signal;
pub mod tee;

// Re-export commonly used items
pub mod prelude {
    pub use crate::drain::{collect, collect_with_signal, drain, drain_with_signal};
    pub use crate::enqueue::{enqueue, enqueue_with_signal};
    pub use crate::error::{Error, Result};
    pub use crate::multiplex::{
        multiplex, multiplex_async, multiplex_async_with_signal, multiplex_with_signal,
    };
    pub use crate::pipeline::{Pipeline, PipelineConfig};
    pub use crate::produce::{
        produce, produce_stream, produce_stream_with_signal, produce_with_signal,
    };
    pub use crate::queue::Queue;
    pub use crate::signal::Signal;
    pub use crate::tee::{tee, tee_with_signal};
}

pub use drain::{collect, collect_with_signal, drain, drain_with_signal};
pub use enqueue::{enqueue, enqueue_with_signal};
pub use error::{Error, Result, TrySendError};
pub use multiplex::{
    multiplex, multiplex_async, multiplex_async_with_signal, multiplex_with_signal,
};
pub use pipeline::{Pipeline, PipelineConfig};
pub use produce::{produce, produce_stream, produce_stream_with_signal, produce_with_signal};
pub use queue::{CloseGuard, Queue};
pub use signal::Signal;
pub use tee::{tee, tee_with_signal};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
