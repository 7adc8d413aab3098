//! Delivery sinks: where flushed batches go.
//!
//! The streamer treats its consumer as an opaque, single-capability value:
//! something that can receive one batch of text. [`BatchSink`] is that seam.
//! Closures, crossbeam channels and `io::Write` implementors all plug in
//! directly, so the same streamer can feed a UI widget in one program and a
//! socket in another.

use crate::error::SinkError;
use std::io::Write;

/// Receiver of flushed batches.
///
/// Delivery is serialized: the streamer never invokes a sink from two threads
/// at once, and never while holding the buffer lock. A sink may therefore
/// re-enter the streamer's read accessors (`full_text`, `pending_count`) and
/// push further tokens below the capacity threshold. It must not call
/// `flush`, `stop`, or a capacity-triggering `push` from inside
/// [`deliver`](Self::deliver) — those re-acquire the delivery lock the sink
/// is already running under.
pub trait BatchSink: Send {
    /// Receive one coalesced batch.
    ///
    /// # Errors
    ///
    /// Returns a [`SinkError`] if the batch cannot be accepted; the error
    /// propagates to whichever call triggered the flush.
    fn deliver(&mut self, batch: &str) -> Result<(), SinkError>;
}

impl<F> BatchSink for F
where
    F: FnMut(&str) -> Result<(), SinkError> + Send,
{
    fn deliver(&mut self, batch: &str) -> Result<(), SinkError> {
        self(batch)
    }
}

/// Channel-backed sink: each batch arrives as one message.
///
/// Fails with [`SinkError::Disconnected`] once the receiving half is gone.
impl BatchSink for crossbeam_channel::Sender<String> {
    fn deliver(&mut self, batch: &str) -> Result<(), SinkError> {
        self.send(batch.to_owned())
            .map_err(|_| SinkError::Disconnected)
    }
}

/// Wrap an infallible closure as a sink.
///
/// Convenience for consumers that cannot fail, like appending to an in-memory
/// widget or collecting into a `String`.
pub fn sink_fn<F>(mut f: F) -> impl BatchSink
where
    F: FnMut(&str) + Send,
{
    move |batch: &str| -> Result<(), SinkError> {
        f(batch);
        Ok(())
    }
}

/// Sink that writes each batch to an [`io::Write`](std::io::Write) target.
///
/// The writer is flushed after every batch so coalesced output becomes
/// visible at batch granularity, not at the writer's buffer size.
#[derive(Debug)]
pub struct WriteSink<W> {
    writer: W,
}

impl<W: Write + Send> WriteSink<W> {
    /// Wrap a writer as a sink.
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Unwrap the inner writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> BatchSink for WriteSink<W> {
    fn deliver(&mut self, batch: &str) -> Result<(), SinkError> {
        self.writer.write_all(batch.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_sink() {
        let mut seen = Vec::new();
        {
            let mut sink = sink_fn(|batch: &str| seen.push(batch.to_owned()));
            sink.deliver("abc").unwrap();
            sink.deliver("def").unwrap();
        }
        // `seen` borrows end with the sink.
        assert_eq!(seen, vec!["abc", "def"]);
    }

    #[test]
    fn test_fallible_closure_sink() {
        let mut sink =
            |_: &str| -> Result<(), SinkError> { Err(SinkError::Rejected("nope".to_owned())) };
        assert!(sink.deliver("x").is_err());
    }

    #[test]
    fn test_channel_sink_delivers_batches() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut sink = tx;
        sink.deliver("first").unwrap();
        sink.deliver("second").unwrap();

        assert_eq!(rx.try_recv().unwrap(), "first");
        assert_eq!(rx.try_recv().unwrap(), "second");
    }

    #[test]
    fn test_channel_sink_disconnected() {
        let (tx, rx) = crossbeam_channel::unbounded::<String>();
        drop(rx);

        let mut sink = tx;
        assert!(matches!(sink.deliver("lost"), Err(SinkError::Disconnected)));
    }

    #[test]
    fn test_write_sink_appends_bytes() {
        let mut sink = WriteSink::new(Vec::new());
        sink.deliver("hello ").unwrap();
        sink.deliver("world").unwrap();

        assert_eq!(sink.into_inner(), b"hello world");
    }
}
