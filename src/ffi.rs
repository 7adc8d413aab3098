//! C Foreign Function Interface (FFI) for Slipstream.
//!
//! This module provides a C-compatible API for embedding the streamer in a
//! host process (a GUI shell, a Python extension, another runtime). All
//! functions are `extern "C"` with stable ABI.
//!
//! # Safety
//!
//! All functions that accept pointers require valid, non-null pointers
//! unless documented otherwise. The caller is responsible for proper memory
//! management of handles and for freeing returned strings and byte buffers
//! with the matching `*_free` function.
//!
//! # Example (C)
//!
//! ```c
//! #include "slipstream.h"
//!
//! static int on_batch(const char* batch, void* user_data) {
//!     fputs(batch, stdout);
//!     return 0;
//! }
//!
//! int main() {
//!     SlipstreamStreamer* s = slipstream_streamer_new(20, 100);
//!     if (!s) return 1;
//!
//!     slipstream_streamer_set_sink(s, on_batch, NULL);
//!     slipstream_streamer_start(s);
//!     slipstream_streamer_push(s, "hello ");
//!     slipstream_streamer_push(s, "world");
//!     slipstream_streamer_stop(s);
//!
//!     slipstream_streamer_destroy(s);
//!     return 0;
//! }
//! ```

// FFI modules intentionally use unsafe and no_mangle
#![allow(unsafe_code)]
#![allow(unsafe_op_in_unsafe_fn)]
#![allow(clippy::missing_safety_doc)]
#![allow(clippy::not_unsafe_ptr_arg_deref)]

use crate::error::{SinkError, StreamError};
use crate::fs;
use crate::stream::{BatchSink, Streamer, StreamerConfig};
use std::ffi::{c_void, CStr, CString};
use std::os::raw::{c_char, c_int};
use std::ptr;
use std::time::Duration;

// =============================================================================
// Opaque Handle Types
// =============================================================================

/// Opaque handle to a streamer.
pub struct SlipstreamStreamer(Streamer);

// =============================================================================
// Result Codes
// =============================================================================

/// Result codes for FFI functions.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlipstreamResult {
    /// Operation succeeded.
    Ok = 0,
    /// Null pointer passed.
    NullPointer = 1,
    /// Invalid UTF-8 string.
    InvalidUtf8 = 2,
    /// Rejected configuration value (zero capacity or interval).
    InvalidConfig = 3,
    /// The sink reported a delivery failure.
    SinkFailure = 4,
}

/// Batch delivery callback.
///
/// Receives the batch as a NUL-terminated UTF-8 string, valid only for the
/// duration of the call, plus the `user_data` pointer registered alongside
/// it. Return 0 to accept the batch; any other value is reported as a sink
/// failure to the call that triggered the flush.
pub type SlipstreamSinkCallback = extern "C" fn(batch: *const c_char, user_data: *mut c_void) -> c_int;

/// Sink adapter around a C callback and its context pointer.
struct CallbackSink {
    callback: SlipstreamSinkCallback,
    user_data: *mut c_void,
}

// Contract with the registering caller: `user_data` must remain valid until
// the sink is replaced or the streamer destroyed, and must be safe to use
// from the flush thread.
unsafe impl Send for CallbackSink {}

impl BatchSink for CallbackSink {
    fn deliver(&mut self, batch: &str) -> Result<(), SinkError> {
        let text = CString::new(batch)
            .map_err(|_| SinkError::Rejected("batch contains interior NUL byte".to_owned()))?;
        match (self.callback)(text.as_ptr(), self.user_data) {
            0 => Ok(()),
            status => Err(SinkError::Rejected(format!(
                "sink callback returned {status}"
            ))),
        }
    }
}

fn result_code(result: Result<(), StreamError>) -> SlipstreamResult {
    match result {
        Ok(()) => SlipstreamResult::Ok,
        Err(StreamError::ZeroCapacity | StreamError::ZeroInterval) => {
            SlipstreamResult::InvalidConfig
        }
        Err(StreamError::Sink(_)) => SlipstreamResult::SinkFailure,
    }
}

// =============================================================================
// Streamer Functions
// =============================================================================

/// Create a new streamer.
///
/// Returns NULL if `capacity` or `interval_ms` is zero.
#[unsafe(no_mangle)]
pub extern "C" fn slipstream_streamer_new(
    capacity: usize,
    interval_ms: u64,
) -> *mut SlipstreamStreamer {
    let config = StreamerConfig {
        capacity,
        interval: Duration::from_millis(interval_ms),
    };
    match Streamer::with_config(config) {
        Ok(streamer) => Box::into_raw(Box::new(SlipstreamStreamer(streamer))),
        Err(_) => ptr::null_mut(),
    }
}

/// Destroy a streamer.
///
/// Stops the flush loop if it is running and delivers any pending content
/// before freeing the handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn slipstream_streamer_destroy(streamer: *mut SlipstreamStreamer) {
    if !streamer.is_null() {
        drop(Box::from_raw(streamer));
    }
}

/// Register the delivery sink, replacing any previous registration.
///
/// Passing NULL for `callback` removes the sink; subsequent flushes drain
/// without delivering.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn slipstream_streamer_set_sink(
    streamer: *mut SlipstreamStreamer,
    callback: Option<SlipstreamSinkCallback>,
    user_data: *mut c_void,
) -> SlipstreamResult {
    if streamer.is_null() {
        return SlipstreamResult::NullPointer;
    }
    match callback {
        Some(callback) => (*streamer).0.set_sink(CallbackSink {
            callback,
            user_data,
        }),
        None => (*streamer).0.clear_sink(),
    }
    SlipstreamResult::Ok
}

/// Append a token, flushing synchronously when capacity is reached.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn slipstream_streamer_push(
    streamer: *mut SlipstreamStreamer,
    token: *const c_char,
) -> SlipstreamResult {
    if streamer.is_null() || token.is_null() {
        return SlipstreamResult::NullPointer;
    }
    let Ok(token) = CStr::from_ptr(token).to_str() else {
        return SlipstreamResult::InvalidUtf8;
    };
    result_code((*streamer).0.push(token))
}

/// Start the background flush loop. No-op if already running.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn slipstream_streamer_start(streamer: *mut SlipstreamStreamer) {
    if !streamer.is_null() {
        (*streamer).0.start();
    }
}

/// Stop the background flush loop and force a final flush.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn slipstream_streamer_stop(
    streamer: *mut SlipstreamStreamer,
) -> SlipstreamResult {
    if streamer.is_null() {
        return SlipstreamResult::NullPointer;
    }
    result_code((*streamer).0.stop())
}

/// Drain pending tokens and deliver them as one batch.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn slipstream_streamer_flush(
    streamer: *mut SlipstreamStreamer,
) -> SlipstreamResult {
    if streamer.is_null() {
        return SlipstreamResult::NullPointer;
    }
    result_code((*streamer).0.flush())
}

/// Get the full accumulated text since construction or the last clear.
///
/// Returns a heap-allocated NUL-terminated string that must be released
/// with [`slipstream_string_free`], or NULL if the handle is NULL or the
/// transcript contains an interior NUL byte.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn slipstream_streamer_full_text(
    streamer: *const SlipstreamStreamer,
) -> *mut c_char {
    if streamer.is_null() {
        return ptr::null_mut();
    }
    CString::new((*streamer).0.full_text())
        .map_or(ptr::null_mut(), CString::into_raw)
}

/// Release a string returned by [`slipstream_streamer_full_text`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn slipstream_string_free(text: *mut c_char) {
    if !text.is_null() {
        drop(CString::from_raw(text));
    }
}

/// Discard pending tokens and the accumulated transcript.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn slipstream_streamer_clear(streamer: *mut SlipstreamStreamer) {
    if !streamer.is_null() {
        (*streamer).0.clear();
    }
}

/// Number of tokens awaiting flush.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn slipstream_streamer_pending_count(
    streamer: *const SlipstreamStreamer,
) -> usize {
    if streamer.is_null() {
        return 0;
    }
    (*streamer).0.pending_count()
}

/// Whether the background flush loop is currently running.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn slipstream_streamer_is_active(
    streamer: *const SlipstreamStreamer,
) -> bool {
    if streamer.is_null() {
        return false;
    }
    (*streamer).0.is_active()
}

/// Replace the capacity threshold; applies to subsequent pushes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn slipstream_streamer_set_capacity(
    streamer: *mut SlipstreamStreamer,
    capacity: usize,
) -> SlipstreamResult {
    if streamer.is_null() {
        return SlipstreamResult::NullPointer;
    }
    result_code((*streamer).0.set_capacity(capacity))
}

/// Replace the flush interval in milliseconds; the loop picks it up on its
/// next sleep cycle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn slipstream_streamer_set_interval_ms(
    streamer: *mut SlipstreamStreamer,
    interval_ms: u64,
) -> SlipstreamResult {
    if streamer.is_null() {
        return SlipstreamResult::NullPointer;
    }
    result_code((*streamer).0.set_interval(Duration::from_millis(interval_ms)))
}

// =============================================================================
// File Helper Functions
// =============================================================================

/// Read an entire file into a heap-allocated byte buffer.
///
/// On success, stores the buffer length through `out_len` and returns a
/// pointer that must be released with [`slipstream_bytes_free`]. Returns
/// NULL on a null/invalid path or an I/O failure.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn slipstream_read_file(
    path: *const c_char,
    out_len: *mut usize,
) -> *mut u8 {
    if path.is_null() || out_len.is_null() {
        return ptr::null_mut();
    }
    let Ok(path) = CStr::from_ptr(path).to_str() else {
        return ptr::null_mut();
    };
    match fs::read_file_bytes(path) {
        Ok(bytes) => {
            let boxed = bytes.into_boxed_slice();
            *out_len = boxed.len();
            Box::into_raw(boxed).cast::<u8>()
        }
        Err(_) => ptr::null_mut(),
    }
}

/// Release a buffer returned by [`slipstream_read_file`].
///
/// `len` must be the length stored through `out_len` by that call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn slipstream_bytes_free(bytes: *mut u8, len: usize) {
    if !bytes.is_null() {
        let slice = ptr::slice_from_raw_parts_mut(bytes, len);
        drop(Box::from_raw(slice));
    }
}

/// Check whether a path names a Python source file (`.py` suffix).
#[unsafe(no_mangle)]
pub unsafe extern "C" fn slipstream_is_python_file(path: *const c_char) -> bool {
    if path.is_null() {
        return false;
    }
    CStr::from_ptr(path)
        .to_str()
        .is_ok_and(|path| fs::is_python_source(path))
}

// =============================================================================
// Version Information
// =============================================================================

/// Get the Slipstream version string.
#[unsafe(no_mangle)]
pub extern "C" fn slipstream_version() -> *const c_char {
    static VERSION: &[u8] = b"0.1.0\0";
    VERSION.as_ptr().cast::<c_char>()
}
