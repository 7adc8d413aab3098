//! Streaming Demo: Demonstrates high-frequency token batching.
//!
//! This example simulates an LLM-style producer emitting ~125 tokens/s and
//! shows how the streamer coalesces them: the consumer is invoked once per
//! batch instead of once per token, while the accumulated transcript stays
//! byte-identical to the input.
//!
//! Run with `RUST_LOG=debug` to watch the flush loop's lifecycle events.

use slipstream::{sink_fn, Streamer, StreamerConfig};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Sample text to stream (simulating an LLM response).
const SAMPLE_TEXT: &str = "Batching turns a firehose of tiny fragments into a \
manageable trickle of consumer calls. Each token lands in a shared buffer; a \
flush fires either when the buffer reaches capacity or when the background \
timer ticks, whichever comes first. The consumer sees whole batches, the \
producer never waits on the consumer, and the transcript records everything \
in arrival order.";

fn main() -> Result<(), slipstream::StreamError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("Slipstream Streaming Demo");
    println!("=========================");
    println!("Simulating ~125 tokens/s, capacity 8, 40ms flush interval.\n");

    let streamer = Streamer::with_config(StreamerConfig {
        capacity: 8,
        interval: Duration::from_millis(40),
    })?;

    let batches = Arc::new(AtomicUsize::new(0));
    let batch_counter = Arc::clone(&batches);
    streamer.set_sink(sink_fn(move |batch| {
        batch_counter.fetch_add(1, Ordering::Relaxed);
        print!("{batch}");
        let _ = std::io::stdout().flush();
    }));

    streamer.start();

    let mut tokens = 0usize;
    for word in SAMPLE_TEXT.split_inclusive(' ') {
        streamer.push(word)?;
        tokens += 1;
        thread::sleep(Duration::from_millis(8));
    }

    streamer.stop()?;

    println!("\n");
    println!(
        "{tokens} tokens coalesced into {} sink invocations",
        batches.load(Ordering::Relaxed)
    );
    println!(
        "transcript intact: {}",
        streamer.full_text() == SAMPLE_TEXT
    );
    Ok(())
}
