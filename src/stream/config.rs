//! Streamer configuration: thresholds, defaults, environment overrides.

use crate::error::StreamError;
use std::time::Duration;
use tracing::warn;

/// Environment variable overriding the default capacity.
pub const ENV_CAPACITY: &str = "SLIPSTREAM_CAPACITY";

/// Environment variable overriding the default flush interval (milliseconds).
pub const ENV_FLUSH_INTERVAL_MS: &str = "SLIPSTREAM_FLUSH_INTERVAL_MS";

/// Configuration for a [`Streamer`](super::Streamer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamerConfig {
    /// Pending-fragment count that triggers an immediate flush from `push`.
    pub capacity: usize,
    /// Sleep duration of the background flush loop between flush attempts.
    pub interval: Duration,
}

impl Default for StreamerConfig {
    fn default() -> Self {
        Self {
            capacity: 20,
            interval: Duration::from_millis(100),
        }
    }
}

impl StreamerConfig {
    /// Defaults layered with environment overrides.
    ///
    /// [`ENV_CAPACITY`] and [`ENV_FLUSH_INTERVAL_MS`] replace the
    /// corresponding default when set and parseable; unparseable values are
    /// logged and ignored. The result still goes through
    /// [`validate`](Self::validate) at construction time, so an override of
    /// `0` is rejected there rather than silently accepted.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(capacity) = read_env(ENV_CAPACITY) {
            config.capacity = capacity;
        }
        if let Some(ms) = read_env(ENV_FLUSH_INTERVAL_MS) {
            config.interval = Duration::from_millis(ms);
        }
        config
    }

    /// Reject thresholds that would make the streamer degenerate.
    ///
    /// A zero capacity would turn every push into a flush of nothing; a zero
    /// interval would spin the flush loop.
    ///
    /// # Errors
    ///
    /// [`StreamError::ZeroCapacity`] or [`StreamError::ZeroInterval`].
    pub const fn validate(&self) -> Result<(), StreamError> {
        if self.capacity == 0 {
            return Err(StreamError::ZeroCapacity);
        }
        if self.interval.is_zero() {
            return Err(StreamError::ZeroInterval);
        }
        Ok(())
    }
}

fn read_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparseable environment override");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StreamerConfig::default();
        assert_eq!(config.capacity, 20);
        assert_eq!(config.interval, Duration::from_millis(100));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_thresholds() {
        let config = StreamerConfig {
            capacity: 0,
            ..StreamerConfig::default()
        };
        assert!(matches!(config.validate(), Err(StreamError::ZeroCapacity)));

        let config = StreamerConfig {
            interval: Duration::ZERO,
            ..StreamerConfig::default()
        };
        assert!(matches!(config.validate(), Err(StreamError::ZeroInterval)));
    }

    // Single test for all env interaction: the variables are process-global
    // and tests run concurrently.
    #[test]
    fn test_from_env_overrides() {
        std::env::set_var(ENV_CAPACITY, "7");
        std::env::set_var(ENV_FLUSH_INTERVAL_MS, "250");
        let config = StreamerConfig::from_env();
        assert_eq!(config.capacity, 7);
        assert_eq!(config.interval, Duration::from_millis(250));

        std::env::set_var(ENV_CAPACITY, "not a number");
        let config = StreamerConfig::from_env();
        assert_eq!(config.capacity, 20);
        assert_eq!(config.interval, Duration::from_millis(250));

        std::env::remove_var(ENV_CAPACITY);
        std::env::remove_var(ENV_FLUSH_INTERVAL_MS);
        assert_eq!(StreamerConfig::from_env(), StreamerConfig::default());
    }
}
