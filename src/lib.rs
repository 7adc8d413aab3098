//! # Slipstream
//!
//! An adaptive batching buffer for high-frequency token streams.
//!
//! Slipstream sits between a producer that emits many small text fragments
//! (an LLM decode loop, a log tailer, a protocol parser) and a consumer that
//! is cheaper to invoke in bulk (a UI update, a socket write). Fragments are
//! coalesced and handed to the consumer either when a configured count is
//! reached or when a background timer fires, whichever comes first — trading
//! a small, bounded latency for far fewer consumer invocations.
//!
//! ## Core Concepts
//!
//! - **Dual trigger**: size-triggered flush on the producer's thread, plus a
//!   time-triggered flush from a dedicated background thread
//! - **Drain outside the lock**: batches are snapshotted under the buffer lock
//!   and delivered after it is released, so sinks may re-enter the streamer
//! - **Opaque sink**: delivery goes through a single-method trait; closures,
//!   channels and writers all plug in
//!
//! ## Example
//!
//! ```rust,ignore
//! use slipstream::{sink_fn, Streamer};
//!
//! let streamer = Streamer::new();
//! streamer.set_sink(sink_fn(|batch| print!("{batch}")));
//! streamer.start();
//!
//! streamer.push("Hello, ")?;
//! streamer.push("world!")?;
//!
//! streamer.stop()?; // joins the flush loop and delivers what's left
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod error;
pub mod ffi;
pub mod fs;
pub mod stream;

// Re-exports for convenience
pub use error::{SinkError, StreamError};
pub use stream::{sink_fn, BatchSink, Streamer, StreamerConfig, TokenBuffer, WriteSink};
