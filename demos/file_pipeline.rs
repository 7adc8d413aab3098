//! File Pipeline Demo: stream a source file through the batcher.
//!
//! Mirrors the embedding use case: a host loads a file with the stateless
//! file helpers, feeds it line by line into the streamer, and a `WriteSink`
//! forwards coalesced batches to stdout.
//!
//! Usage: `cargo run --example file_pipeline [path]` (defaults to this
//! crate's `src/lib.rs`).

use slipstream::{fs, Streamer, StreamerConfig, WriteSink};
use std::error::Error;
use std::thread;
use std::time::Duration;

fn main() -> Result<(), Box<dyn Error>> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "src/lib.rs".to_owned());

    if !fs::has_extension(&path, "rs") && !fs::is_python_source(&path) {
        eprintln!("note: {path} is neither Rust nor Python source, streaming anyway");
    }

    let bytes = fs::read_file_bytes(&path)?;
    let text = String::from_utf8_lossy(&bytes);
    eprintln!("loaded {} bytes from {path}", bytes.len());

    let streamer = Streamer::with_config(StreamerConfig {
        capacity: 16,
        interval: Duration::from_millis(50),
    })?;
    streamer.set_sink(WriteSink::new(std::io::stdout()));
    streamer.start();

    for line in text.split_inclusive('\n') {
        streamer.push(line)?;
        thread::sleep(Duration::from_millis(2));
    }

    streamer.stop()?;
    eprintln!("done: {} bytes streamed", streamer.full_text().len());
    Ok(())
}
