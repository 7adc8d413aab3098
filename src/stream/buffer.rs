//! Token buffer: pending fragments plus the accumulated transcript.
//!
//! This is the plain data structure underneath the streamer; it knows nothing
//! about locking, timers or sinks. The streamer wraps it in a mutex and is
//! the only place it is drained.

use std::collections::VecDeque;

/// Ordered store of pending fragments and the full accumulated text.
///
/// Fragments await the next flush in `pending`; every fragment is also
/// appended to `accumulated`, which grows monotonically across flushes and
/// only shrinks on [`clear`](Self::clear). Callers needing bounded memory
/// must clear explicitly — the transcript is never capped.
#[derive(Debug, Default)]
pub struct TokenBuffer {
    /// Fragments awaiting flush, in arrival order.
    pending: VecDeque<String>,
    /// Concatenation of every fragment since construction or the last clear.
    accumulated: String,
}

impl TokenBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment, recording it in the accumulated transcript.
    ///
    /// Empty fragments are accepted; they still count toward the pending
    /// total.
    pub fn push(&mut self, token: &str) {
        self.accumulated.push_str(token);
        self.pending.push_back(token.to_owned());
    }

    /// Number of fragments awaiting flush.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Whether any fragments await flush.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// The full text accumulated since construction or the last clear.
    pub fn full_text(&self) -> &str {
        &self.accumulated
    }

    /// Drain all pending fragments into a single in-order batch.
    ///
    /// Returns `None` when nothing is pending. The accumulated transcript is
    /// unaffected.
    pub fn drain_batch(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }

        let total: usize = self.pending.iter().map(String::len).sum();
        let mut batch = String::with_capacity(total);
        for token in self.pending.drain(..) {
            batch.push_str(&token);
        }
        Some(batch)
    }

    /// Discard pending fragments and the accumulated transcript.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.accumulated.clear();
    }
}
