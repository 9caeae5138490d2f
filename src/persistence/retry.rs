//! Bounded retry with exponential backoff for store operations.
//!
//! Transient storage errors (a locked file, a disk hiccup) are recoverable
//! by retrying the same call a bounded number of times. Permanent errors
//! (malformed data, schema mismatch) are returned immediately. When retries
//! exhaust, the last error is surfaced and the operation must be treated as
//! not applied.

use std::time::Duration;

use super::store::StoreError;

/// Configuration for exponential backoff retry.
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (not including the initial attempt).
    pub max_retries: u32,

    /// Delay before the first retry.
    pub initial_delay: Duration,

    /// Cap on the delay between retries.
    pub max_delay: Duration,

    /// Multiplier for exponential backoff.
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    /// Default policy: 3 retries at 100ms, 200ms, 400ms.
    pub const DEFAULT: Self = Self {
        max_retries: 3,
        initial_delay: Duration::from_millis(100),
        max_delay: Duration::from_secs(1),
        backoff_multiplier: 2.0,
    };

    /// Computes the delay for the given retry attempt (0-indexed): the
    /// initial delay grown exponentially, capped at `max_delay`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let multiplier = self.backoff_multiplier.powi(attempt as i32);
        let delay_secs = self.initial_delay.as_secs_f64() * multiplier;
        Duration::from_secs_f64(delay_secs.min(self.max_delay.as_secs_f64()))
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Runs a store operation, retrying transient failures per the config.
///
/// The operation is re-invoked as-is; it must be safe to repeat (loads are,
/// and atomic saves are: a repeated rename just wins again).
pub fn with_retry<T>(
    config: &RetryConfig,
    mut op: impl FnMut() -> Result<T, StoreError>,
) -> Result<T, StoreError> {
    let mut attempt = 0;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < config.max_retries => {
                let delay = config.delay_for_attempt(attempt);
                tracing::warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "transient store error, retrying: {e}"
                );
                std::thread::sleep(delay);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn transient() -> StoreError {
        StoreError::Io(io::Error::new(io::ErrorKind::Other, "locked"))
    }

    fn permanent() -> StoreError {
        StoreError::SchemaMismatch {
            expected: 1,
            got: 2,
        }
    }

    /// A fast config so tests don't sleep for real.
    fn fast() -> RetryConfig {
        RetryConfig {
            max_retries: 3,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
            backoff_multiplier: 2.0,
        }
    }

    #[test]
    fn delays_grow_exponentially_and_cap() {
        let config = RetryConfig {
            max_retries: 5,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(300),
            backoff_multiplier: 2.0,
        };

        assert_eq!(config.delay_for_attempt(0), Duration::from_millis(100));
        assert_eq!(config.delay_for_attempt(1), Duration::from_millis(200));
        // 400ms would exceed the cap.
        assert_eq!(config.delay_for_attempt(2), Duration::from_millis(300));
        assert_eq!(config.delay_for_attempt(3), Duration::from_millis(300));
    }

    #[test]
    fn succeeds_first_try_without_retrying() {
        let mut calls = 0;
        let result = with_retry(&fast(), || {
            calls += 1;
            Ok::<_, StoreError>(7)
        });

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls, 1);
    }

    #[test]
    fn retries_transient_errors_until_success() {
        let mut calls = 0;
        let result = with_retry(&fast(), || {
            calls += 1;
            if calls < 3 {
                Err(transient())
            } else {
                Ok(calls)
            }
        });

        assert_eq!(result.unwrap(), 3);
    }

    #[test]
    fn gives_up_after_max_retries() {
        let mut calls = 0;
        let result: Result<(), _> = with_retry(&fast(), || {
            calls += 1;
            Err(transient())
        });

        assert!(result.is_err());
        // Initial attempt plus three retries.
        assert_eq!(calls, 4);
    }

    #[test]
    fn permanent_errors_are_not_retried() {
        let mut calls = 0;
        let result: Result<(), _> = with_retry(&fast(), || {
            calls += 1;
            Err(permanent())
        });

        assert!(matches!(result, Err(StoreError::SchemaMismatch { .. })));
        assert_eq!(calls, 1);
    }
}
