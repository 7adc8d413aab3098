//! Flush loop: dedicated thread driving time-triggered flushes.
//!
//! The loop owns no state of its own; everything lives in the streamer's
//! shared core. Each cycle sleeps for the configured interval, then drives
//! the shared flush routine — a no-op tick when nothing is pending. The
//! sleep happens in short slices so a stop request is observed within
//! roughly a millisecond instead of a full interval.

use super::streamer::Shared;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// Upper bound on a single sleep while waiting for the next tick.
const SLEEP_SLICE: Duration = Duration::from_millis(1);

/// Spawn the flush-loop thread over the shared core.
///
/// # Panics
///
/// Panics if the OS fails to spawn the thread.
pub(super) fn spawn(shared: Arc<Shared>) -> JoinHandle<()> {
    thread::Builder::new()
        .name("slipstream-flush".to_string())
        .spawn(move || run_loop(&shared))
        .expect("Failed to spawn flush thread")
}

/// Main flush loop.
///
/// The interval is re-read at the top of every cycle, so a runtime change
/// takes effect on the next sleep, not the one in progress. A sink failure
/// terminates the loop: the error is logged, the active flag is lowered, and
/// the thread exits so a broken consumer cannot be hammered once per tick.
fn run_loop(shared: &Arc<Shared>) {
    debug!("flush loop started");

    while shared.active.load(Ordering::Relaxed) {
        let deadline = Instant::now() + shared.interval();

        loop {
            if !shared.active.load(Ordering::Relaxed) {
                debug!("flush loop stopped");
                return;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            thread::sleep(remaining.min(SLEEP_SLICE));
        }

        if let Err(err) = shared.flush() {
            error!(%err, "sink failed during timed flush; terminating flush loop");
            shared.active.store(false, Ordering::Relaxed);
            return;
        }
    }

    debug!("flush loop stopped");
}
