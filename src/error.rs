//! Error types for the streaming core.
//!
//! Two layers: [`SinkError`] is what a sink reports when it cannot accept a
//! batch; [`StreamError`] is the crate-level error surfaced by the streamer's
//! fallible operations (configuration rejection and delivery failure).

use thiserror::Error;

/// Failure reported by a [`BatchSink`](crate::stream::BatchSink) when a
/// delivered batch cannot be accepted.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The receiving half of a channel-backed sink has disconnected.
    #[error("sink receiver disconnected")]
    Disconnected,

    /// An I/O-backed sink failed to write the batch.
    #[error("sink write failed")]
    Io(#[from] std::io::Error),

    /// Application-defined delivery failure.
    #[error("{0}")]
    Rejected(String),
}

/// Errors surfaced by [`Streamer`](crate::stream::Streamer) operations.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The capacity threshold must be at least one pending fragment.
    #[error("capacity must be at least 1")]
    ZeroCapacity,

    /// The flush interval must be non-zero.
    #[error("flush interval must be non-zero")]
    ZeroInterval,

    /// A sink rejected a delivered batch.
    ///
    /// The batch was already drained when the sink ran, so the buffer itself
    /// is consistent; only the delivery failed.
    #[error("sink delivery failed: {0}")]
    Sink(#[from] SinkError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(StreamError::ZeroCapacity.to_string(), "capacity must be at least 1");
        assert_eq!(StreamError::ZeroInterval.to_string(), "flush interval must be non-zero");
        assert_eq!(SinkError::Disconnected.to_string(), "sink receiver disconnected");
    }

    #[test]
    fn test_sink_error_converts_to_stream_error() {
        let err: StreamError = SinkError::Rejected("consumer gone".to_owned()).into();
        assert!(matches!(err, StreamError::Sink(SinkError::Rejected(_))));
        assert_eq!(err.to_string(), "sink delivery failed: consumer gone");
    }
}
