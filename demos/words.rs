//! Word statistics over a dictionary file
//!
//! Run with: cargo run --example words [-- /path/to/words]
//!
//! Defaults to /usr/share/dict/words.

use pipekit::prelude::*;
use std::collections::BTreeMap;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/usr/share/dict/words".to_string());

    let text = tokio::fs::read_to_string(&path).await?;
    let mut words: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    words.sort();
    println!("Read {} words from {}", words.len(), path);

    let (for_lengths, for_copy) = tee(produce(256, words.clone()));
    let lengths = multiplex(for_lengths, 8, |word: String| word.chars().count());

    let (lengths, copy) = tokio::join!(collect(lengths), collect(for_copy));

    let mut histogram = BTreeMap::new();
    for len in lengths {
        *histogram.entry(len).or_insert(0usize) += 1;
    }
    for (len, count) in histogram {
        println!("{:>3} letters: {}", len, count);
    }

    println!("Copy matches input: {}", copy == words);
    Ok(())
}
