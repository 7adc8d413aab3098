//! Streaming core: coalesce token fragments into batched deliveries.
//!
//! This module implements the adaptive batching streamer. Fragments pushed by
//! a producer accumulate in a [`TokenBuffer`]; a flush drains them into one
//! batch and hands it to the registered [`BatchSink`]. Flushes fire on two
//! triggers:
//!
//! 1. **Size**: `push` flushes synchronously once the pending count reaches
//!    the configured capacity. This is the common case under sustained load.
//!
//! 2. **Time**: a background thread flushes on a configured interval, so a
//!    trickle of fragments never sits in the buffer longer than one tick.
//!
//! Both triggers converge on a single flush routine that snapshots and clears
//! the pending fragments under the buffer lock, releases it, and only then
//! invokes the sink. Holding the lock across the callback would deadlock a
//! sink that reads back into the streamer and would stall every producer
//! behind slow consumer work.
//!
//! # Example
//!
//! ```rust,ignore
//! use slipstream::stream::{Streamer, StreamerConfig};
//! use std::time::Duration;
//!
//! let streamer = Streamer::with_config(StreamerConfig {
//!     capacity: 8,
//!     interval: Duration::from_millis(50),
//! })?;
//! streamer.set_sink(slipstream::sink_fn(|batch| ui.append(batch)));
//! streamer.start();
//! ```

mod buffer;
mod config;
mod flusher;
mod sink;
mod streamer;

pub use buffer::TokenBuffer;
pub use config::{StreamerConfig, ENV_CAPACITY, ENV_FLUSH_INTERVAL_MS};
pub use sink::{sink_fn, BatchSink, WriteSink};
pub use streamer::Streamer;
