//! Pipeline composition on top of the queue operations.
//!
//! A [`Pipeline`] carries a queue together with the signal and
//! configuration every stage built from it shares, so stages can be chained
//! without threading those through by hand.

use futures::stream::BoxStream;
use std::future::Future;
use std::time::Duration;

use crate::drain::{collect_with_signal, drain_with_signal};
use crate::multiplex::{multiplex_async_with_signal, multiplex_with_signal};
use crate::produce::produce_with_signal;
use crate::queue::Queue;
use crate::signal::Signal;
use crate::tee::tee_with_signal;

/// Configuration for pipeline execution
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PipelineConfig {
    /// Capacity of the queue created from the input items
    pub buffer_size: usize,
    /// Number of worker tasks used by `map` stages
    pub workers: usize,
    /// Cancel the whole pipeline after this long
    pub timeout: Option<Duration>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            buffer_size: 100,
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            timeout: None,
        }
    }
}

impl PipelineConfig {
    /// Set the buffer size
    pub fn buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    /// Set the number of workers for `map` stages
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set the pipeline timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// A queue flowing through a chain of stages that share one signal.
///
/// # Examples
///
/// ```rust
/// use pipekit::{Pipeline, PipelineConfig};
///
/// #[tokio::main]
/// async fn main() {
///     let config = PipelineConfig::default().buffer_size(8).workers(1);
///     let doubled = Pipeline::with_config(1..=4, config)
///         .map(|x: i32| x * 2)
///         .collect()
///         .await;
///     assert_eq!(doubled, vec![2, 4, 6, 8]);
/// }
/// ```
pub struct Pipeline<T> {
    queue: Queue<T>,
    signal: Signal,
    config: PipelineConfig,
}

impl<T> Pipeline<T>
where
    T: Send + 'static,
{
    /// Start a pipeline from `items` with the default configuration.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a tokio runtime.
    pub fn from_items<I>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: Send + 'static,
    {
        Self::with_config(items, PipelineConfig::default())
    }

    /// Start a pipeline from `items`.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a tokio runtime.
    pub fn with_config<I>(items: I, config: PipelineConfig) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: Send + 'static,
    {
        Self::with_signal(items, config, Signal::never())
    }

    /// Start a pipeline from `items`, cancelled whenever `signal` is.
    ///
    /// The pipeline runs under a child of `signal`, bounded by the
    /// configured timeout if there is one.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a tokio runtime.
    pub fn with_signal<I>(items: I, config: PipelineConfig, signal: Signal) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: Send + 'static,
    {
        let signal = match config.timeout {
            Some(timeout) => signal.child_with_timeout(timeout),
            None => signal.child(),
        };
        let queue = produce_with_signal(config.buffer_size, items, signal.clone());
        Self {
            queue,
            signal,
            config,
        }
    }

    /// Wrap an existing queue.
    ///
    /// Nothing is spawned; `signal` is used as is.
    pub fn from_queue(queue: Queue<T>, config: PipelineConfig, signal: Signal) -> Self {
        Self {
            queue,
            signal,
            config,
        }
    }

    /// Transform every item on `config.workers` worker tasks.
    ///
    /// Output order is only preserved with a single worker.
    pub fn map<U, F>(self, transform: F) -> Pipeline<U>
    where
        U: Send + 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let queue = multiplex_with_signal(
            self.queue,
            self.config.workers,
            transform,
            self.signal.clone(),
        );
        Pipeline {
            queue,
            signal: self.signal,
            config: self.config,
        }
    }

    /// Transform every item with an async function on `config.workers` worker tasks.
    pub fn map_async<U, F, Fut>(self, transform: F) -> Pipeline<U>
    where
        U: Send + 'static,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = U> + Send + 'static,
    {
        let queue = multiplex_async_with_signal(
            self.queue,
            self.config.workers,
            transform,
            self.signal.clone(),
        );
        Pipeline {
            queue,
            signal: self.signal,
            config: self.config,
        }
    }

    /// Split into two pipelines that each see every item.
    pub fn tee(self) -> (Pipeline<T>, Pipeline<T>)
    where
        T: Clone,
    {
        let (first, second) = tee_with_signal(self.queue, self.signal.clone());
        (
            Pipeline {
                queue: first,
                signal: self.signal.clone(),
                config: self.config.clone(),
            },
            Pipeline {
                queue: second,
                signal: self.signal,
                config: self.config,
            },
        )
    }

    /// Collect the remaining items, stopping early if the pipeline is cancelled.
    pub async fn collect(self) -> Vec<T> {
        collect_with_signal(self.queue, self.signal).await
    }

    /// Read the remaining items as a stream.
    pub fn into_stream(self) -> BoxStream<'static, T> {
        drain_with_signal(self.queue, self.signal)
    }

    /// Take the underlying queue
    pub fn into_queue(self) -> Queue<T> {
        self.queue
    }

    /// Cancel every stage of this pipeline
    pub fn cancel(&self) {
        self.signal.cancel();
    }

    /// The signal shared by every stage
    pub fn signal(&self) -> &Signal {
        &self.signal
    }

    /// The pipeline configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[test]
    fn test_config_builder() {
        let config = PipelineConfig::default()
            .buffer_size(16)
            .workers(3)
            .timeout(Duration::from_secs(1));
        assert_eq!(config.buffer_size, 16);
        assert_eq!(config.workers, 3);
        assert_eq!(config.timeout, Some(Duration::from_secs(1)));
        assert!(PipelineConfig::default().workers >= 1);
    }

    #[tokio::test]
    async fn test_map_then_collect() {
        let config = PipelineConfig::default().buffer_size(4).workers(4);
        let mut lengths = Pipeline::with_config(vec!["a", "bb", "ccc"], config)
            .map(|s: &str| s.len())
            .collect()
            .await;
        lengths.sort();
        assert_eq!(lengths, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_tee_branches() {
        let (left, right) = Pipeline::from_items(0..5).tee();
        let left = left.map(|x: i32| x * 10);
        let (mut left, right) = tokio::join!(left.collect(), right.collect());
        left.sort();
        assert_eq!(left, vec![0, 10, 20, 30, 40]);
        assert_eq!(right, vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_map_async_stream() {
        let config = PipelineConfig::default().workers(1);
        let items: Vec<_> = Pipeline::with_config(1..4, config)
            .map_async(|x: u64| async move { x + 100 })
            .into_stream()
            .collect()
            .await;
        assert_eq!(items, vec![101, 102, 103]);
    }

    #[tokio::test]
    async fn test_parent_signal_cancels_pipeline() {
        let parent = Signal::new();
        let pipeline = Pipeline::with_signal(0.., PipelineConfig::default(), parent.clone());
        assert!(pipeline.signal().is_active());

        parent.cancel();
        assert!(pipeline.signal().is_cancelled());
        let queue = pipeline.into_queue();
        let _ = crate::drain::collect(queue.clone()).await;
        assert!(queue.is_drained());
    }

    #[tokio::test]
    async fn test_timeout_bounds_endless_input() {
        let config = PipelineConfig::default()
            .buffer_size(2)
            .workers(2)
            .timeout(Duration::from_millis(20));
        let pipeline = Pipeline::with_config(0u64.., config);
        let slow = pipeline.map_async(|x| async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            x
        });
        let items = slow.collect().await;
        assert!(items.len() < 100);
    }

    #[tokio::test]
    async fn test_cancel_from_pipeline_handle() {
        let pipeline = Pipeline::from_items(0..);
        pipeline.cancel();
        assert!(pipeline.collect().await.is_empty());
    }
}
