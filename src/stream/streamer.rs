//! The streamer: shared state, flush triggers and delivery.

use super::buffer::TokenBuffer;
use super::config::StreamerConfig;
use super::flusher;
use super::sink::BatchSink;
use crate::error::StreamError;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::warn;

/// State shared between producer threads and the flush loop.
pub(super) struct Shared {
    /// Pending fragments and the accumulated transcript.
    buffer: Mutex<TokenBuffer>,
    /// Registered delivery sink, if any.
    ///
    /// This lock is held across drain *and* delivery: it is what serializes
    /// concurrent flushes and keeps batches in drain order. The buffer lock
    /// above is only ever held for the snapshot itself, never while the sink
    /// runs.
    sink: Mutex<Option<Box<dyn BatchSink>>>,
    /// Pending-count threshold for the synchronous flush path.
    capacity: AtomicUsize,
    /// Flush-loop sleep duration, in nanoseconds.
    interval_nanos: AtomicU64,
    /// Whether the flush loop is (or should keep) running.
    pub(super) active: AtomicBool,
}

impl Shared {
    fn new(config: &StreamerConfig) -> Self {
        Self {
            buffer: Mutex::new(TokenBuffer::new()),
            sink: Mutex::new(None),
            capacity: AtomicUsize::new(config.capacity),
            interval_nanos: AtomicU64::new(duration_to_nanos(config.interval)),
            active: AtomicBool::new(false),
        }
    }

    /// Currently configured flush-loop interval.
    pub(super) fn interval(&self) -> Duration {
        Duration::from_nanos(self.interval_nanos.load(Ordering::Relaxed))
    }

    /// Drain pending fragments and deliver them as one batch.
    ///
    /// Lock order is sink, then buffer; the buffer lock is released before
    /// the sink is invoked. Without a registered sink the batch is discarded
    /// after the drain, which still resets the pending count.
    pub(super) fn flush(&self) -> Result<(), StreamError> {
        let mut sink = self.sink.lock();
        let batch = self.buffer.lock().drain_batch();
        if let (Some(sink), Some(batch)) = (sink.as_mut(), batch) {
            sink.deliver(&batch)?;
        }
        Ok(())
    }
}

fn duration_to_nanos(interval: Duration) -> u64 {
    u64::try_from(interval.as_nanos()).unwrap_or(u64::MAX)
}

/// Adaptive batching streamer.
///
/// Accumulates incrementally arriving text fragments and delivers them to a
/// [`BatchSink`] in coalesced batches, either when the pending count reaches
/// the configured capacity or when the background flush loop ticks, whichever
/// comes first.
///
/// All methods take `&self`; the streamer can be shared across producer
/// threads behind an `Arc`. Dropping it stops the flush loop and delivers
/// whatever is still pending.
pub struct Streamer {
    shared: Arc<Shared>,
    /// Join handle of the flush loop while one is running (or has terminated
    /// on its own and not yet been reaped).
    flusher: Mutex<Option<JoinHandle<()>>>,
}

impl Streamer {
    /// Create a streamer with the default thresholds (capacity 20, 100ms
    /// interval). The background loop is not started.
    pub fn new() -> Self {
        let config = StreamerConfig::default();
        Self {
            shared: Arc::new(Shared::new(&config)),
            flusher: Mutex::new(None),
        }
    }

    /// Create a streamer with the given thresholds.
    ///
    /// # Errors
    ///
    /// Rejects a zero capacity or a zero interval.
    pub fn with_config(config: StreamerConfig) -> Result<Self, StreamError> {
        config.validate()?;
        Ok(Self {
            shared: Arc::new(Shared::new(&config)),
            flusher: Mutex::new(None),
        })
    }

    /// Register the delivery sink, replacing any previous registration.
    pub fn set_sink(&self, sink: impl BatchSink + 'static) {
        *self.shared.sink.lock() = Some(Box::new(sink));
    }

    /// Remove the registered sink.
    ///
    /// Subsequent flushes still drain the buffer; the batches are discarded.
    pub fn clear_sink(&self) {
        *self.shared.sink.lock() = None;
    }

    /// Append a fragment, flushing synchronously when capacity is reached.
    ///
    /// The fragment is recorded in the accumulated transcript regardless of
    /// flush timing. Empty fragments are accepted and count toward the
    /// pending total.
    ///
    /// # Errors
    ///
    /// Propagates the sink's failure if this push triggered a flush and
    /// delivery failed. The batch was already drained at that point, so the
    /// pending count is reset either way.
    pub fn push(&self, token: &str) -> Result<(), StreamError> {
        let at_capacity = {
            let mut buffer = self.shared.buffer.lock();
            buffer.push(token);
            buffer.pending_len() >= self.shared.capacity.load(Ordering::Relaxed)
        };

        if at_capacity {
            self.flush()?;
        }
        Ok(())
    }

    /// Drain pending fragments and deliver them as one batch.
    ///
    /// A no-op when nothing is pending (the sink is not invoked). Without a
    /// registered sink the batch is discarded; the accumulated transcript is
    /// unaffected either way.
    ///
    /// # Errors
    ///
    /// Propagates the sink's failure.
    pub fn flush(&self) -> Result<(), StreamError> {
        self.shared.flush()
    }

    /// Start the background flush loop. No-op if it is already running.
    pub fn start(&self) {
        let mut flusher = self.flusher.lock();
        if self.shared.active.swap(true, Ordering::Relaxed) {
            return;
        }

        // A previous loop may have terminated on its own after a sink
        // failure; reap it before spawning the replacement.
        if let Some(handle) = flusher.take() {
            let _ = handle.join();
        }
        *flusher = Some(flusher::spawn(Arc::clone(&self.shared)));
    }

    /// Stop the background flush loop and force a final flush.
    ///
    /// Blocks until the loop thread has exited (bounded by one interval plus
    /// teardown), then flushes whatever arrived after its last tick. No-op
    /// when the loop was never started since the last stop.
    ///
    /// # Errors
    ///
    /// Propagates a sink failure from the final flush.
    pub fn stop(&self) -> Result<(), StreamError> {
        // The lifecycle lock is held through the join so a concurrent start
        // cannot spawn a second loop while the old one is still winding down.
        // The loop thread never touches this lock, so the join cannot hang
        // on it.
        let mut flusher = self.flusher.lock();
        self.shared.active.store(false, Ordering::Relaxed);

        let Some(handle) = flusher.take() else {
            return Ok(());
        };
        let _ = handle.join();
        self.flush()
    }

    /// Whether the background flush loop is currently running.
    pub fn is_active(&self) -> bool {
        self.shared.active.load(Ordering::Relaxed)
    }

    /// Full text accumulated since construction or the last [`clear`](Self::clear).
    ///
    /// Unaffected by flush timing; grows without bound until cleared.
    pub fn full_text(&self) -> String {
        self.shared.buffer.lock().full_text().to_owned()
    }

    /// Number of fragments awaiting flush.
    pub fn pending_count(&self) -> usize {
        self.shared.buffer.lock().pending_len()
    }

    /// Discard pending fragments and the accumulated transcript.
    ///
    /// Nothing is delivered. Sink registration and loop state are unaffected.
    pub fn clear(&self) {
        self.shared.buffer.lock().clear();
    }

    /// Current capacity threshold.
    pub fn capacity(&self) -> usize {
        self.shared.capacity.load(Ordering::Relaxed)
    }

    /// Replace the capacity threshold; applies to subsequent pushes.
    ///
    /// # Errors
    ///
    /// Rejects a zero capacity.
    pub fn set_capacity(&self, capacity: usize) -> Result<(), StreamError> {
        if capacity == 0 {
            return Err(StreamError::ZeroCapacity);
        }
        self.shared.capacity.store(capacity, Ordering::Relaxed);
        Ok(())
    }

    /// Current flush-loop interval.
    pub fn interval(&self) -> Duration {
        self.shared.interval()
    }

    /// Replace the flush-loop interval.
    ///
    /// The loop picks the new value up on its next sleep cycle, not the one
    /// already in progress.
    ///
    /// # Errors
    ///
    /// Rejects a zero interval.
    pub fn set_interval(&self, interval: Duration) -> Result<(), StreamError> {
        if interval.is_zero() {
            return Err(StreamError::ZeroInterval);
        }
        self.shared
            .interval_nanos
            .store(duration_to_nanos(interval), Ordering::Relaxed);
        Ok(())
    }
}

impl Default for Streamer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Streamer {
    fn drop(&mut self) {
        // Stop the loop if one is running, then make sure nothing pending is
        // lost even when the loop was never started.
        if let Err(err) = self.stop().and(self.flush()) {
            warn!(%err, "final flush failed during streamer teardown");
        }
    }
}
