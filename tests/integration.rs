//! Integration tests for the queue operations

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use pipekit::prelude::*;
use tokio_test::{assert_err, assert_ok};

/// A sorted list of made-up dictionary words, a few thousand long.
fn the_words() -> Vec<String> {
    let onsets = ["b", "br", "c", "d", "f", "gl", "k", "m", "pr", "st", "tr", "z"];
    let vowels = ["a", "e", "i", "o", "u", "ea", "oo"];
    let codas = ["", "n", "nd", "ck", "sh", "st", "x"];

    let mut words = Vec::new();
    for onset in onsets {
        for vowel in vowels {
            for coda in codas {
                for suffix in ["", "er", "ing", "ly"] {
                    words.push(format!("{onset}{vowel}{coda}{suffix}"));
                }
            }
        }
    }
    words.sort();
    words.dedup();
    words
}

#[tokio::test]
async fn test_signal_done_and_not_done() {
    let signal = Signal::new();
    assert!(!signal.is_cancelled());
    assert!(signal.is_active());

    signal.cancel();
    tokio::time::sleep(Duration::from_millis(5)).await;
    assert!(signal.is_cancelled());
    assert!(!signal.is_active());
}

#[tokio::test]
async fn test_enqueue_with_signal_times_out_on_full_queue() {
    let signal = Signal::with_timeout(Duration::from_millis(25));
    let queue = Queue::new(1);

    assert_ok!(enqueue_with_signal(&queue, 1, &signal).await);
    let err = assert_err!(enqueue_with_signal(&queue, 2, &signal).await);
    assert_eq!(err, Error::Cancelled);
}

#[tokio::test]
async fn test_produce_and_collect_round_trip() {
    let sample = the_words();
    let contents = collect(produce(sample.len(), sample.clone())).await;

    assert_eq!(contents.len(), sample.len());
    assert_eq!(contents, sample);
}

#[tokio::test]
async fn test_round_trip_with_tiny_buffer() {
    let sample = the_words();
    let contents = collect(produce(1, sample.clone())).await;
    assert_eq!(contents, sample);
}

#[tokio::test]
async fn test_tee_both_outputs_match() {
    let sample = the_words();
    let (a, b) = tee(produce(sample.len(), sample.clone()));
    let (got_a, got_b) = tokio::join!(collect(a), collect(b));

    assert_eq!(got_a.len(), sample.len());
    assert_eq!(got_a, sample);
    assert_eq!(got_b.len(), sample.len());
    assert_eq!(got_b, sample);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_multiplex_squares() {
    let f = |i: i64| i * i;
    let work = Queue::new(50);
    let mut want = Vec::with_capacity(50);
    for i in 0..50 {
        assert_ok!(enqueue(&work, i).await);
        want.push(f(i));
    }
    work.close();

    let mut results = collect(multiplex_with_signal(work, 100, f, Signal::never())).await;
    results.sort();
    assert_eq!(results, want);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_multiplex_any_worker_count() {
    for workers in [1, 2, 7, 64] {
        let mut results = collect(multiplex(produce(8, 0..200), workers, |x: u32| x * 3)).await;
        results.sort();
        assert_eq!(results, (0..200).map(|x| x * 3).collect::<Vec<_>>());
    }
}

#[tokio::test]
async fn test_closure_propagates_downstream() {
    let source = Queue::new(4);
    let (a, b) = tee(source.clone());
    let mapped = multiplex(a, 3, |x: i32| x + 1);

    assert_ok!(enqueue(&source, 1).await);
    source.close();

    assert_eq!(collect(mapped.clone()).await, vec![2]);
    assert_eq!(collect(b.clone()).await, vec![1]);
    assert!(mapped.is_drained());
    assert!(b.is_drained());
}

#[tokio::test]
async fn test_cancel_mid_pipeline_keeps_ordered_prefix() {
    let signal = Signal::new();
    let numbers = produce_with_signal(2, 0..10_000, signal.clone());
    let mut stream = drain_with_signal(numbers, signal.clone());

    let mut seen = Vec::new();
    while let Some(n) = stream.next().await {
        seen.push(n);
        if seen.len() == 5 {
            signal.cancel();
        }
    }

    assert_eq!(seen, vec![0, 1, 2, 3, 4]);
}

#[tokio::test]
async fn test_cancelled_tee_delivers_prefixes() {
    let signal = Signal::new();
    let (a, b) = tee_with_signal(produce(16, 0..1_000), signal.clone());

    let first =
        collect_with_signal(a.clone(), Signal::with_timeout(Duration::from_millis(10))).await;
    signal.cancel();
    let rest_a = collect(a).await;
    let got_b = collect(b).await;

    let mut got_a = first;
    got_a.extend(rest_a);
    assert!(got_a.len() < 1_000);
    assert_eq!(got_a, (0..got_a.len() as i32).collect::<Vec<_>>());
    assert_eq!(got_b, (0..got_b.len() as i32).collect::<Vec<_>>());
    // At most one item can land in the first output only.
    assert!(got_a.len() - got_b.len() <= 1);
}

#[tokio::test]
async fn test_in_flight_transform_completes_after_cancel() {
    let started = Arc::new(AtomicUsize::new(0));
    let finished = Arc::new(AtomicUsize::new(0));
    let signal = Signal::new();
    let source = Queue::new(1);

    let (s, f) = (Arc::clone(&started), Arc::clone(&finished));
    let output = multiplex_async_with_signal(
        source.clone(),
        1,
        move |x: u8| {
            let (s, f) = (Arc::clone(&s), Arc::clone(&f));
            async move {
                s.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                f.fetch_add(1, Ordering::SeqCst);
                x
            }
        },
        signal.clone(),
    );

    assert_ok!(enqueue(&source, 1).await);
    while started.load(Ordering::SeqCst) == 0 {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    signal.cancel();

    // The output closes only once the worker is done with its transform.
    let _ = collect(output.clone()).await;
    assert_eq!(finished.load(Ordering::SeqCst), 1);
    assert!(output.is_drained());
}

#[tokio::test]
async fn test_pipeline_end_to_end() {
    let config = PipelineConfig::default().buffer_size(32).workers(4);
    let (upper, plain) = Pipeline::with_config(the_words(), config).tee();

    let upper = upper.map(|w: String| w.to_uppercase());
    let (mut upper, plain) = tokio::join!(upper.collect(), plain.collect());
    upper.sort();

    let mut expected: Vec<String> = the_words().iter().map(|w| w.to_uppercase()).collect();
    expected.sort();
    assert_eq!(upper, expected);
    assert_eq!(plain, the_words());
}

#[tokio::test]
async fn test_empty_input_everywhere() {
    let (a, b) = tee(produce(0, Vec::<u8>::new()));
    let mapped = multiplex(a, 4, |x| x);
    let (mapped, b) = tokio::join!(collect(mapped), collect(b));
    assert!(mapped.is_empty());
    assert!(b.is_empty());
}
