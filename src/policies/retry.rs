//! # Retry policy for the credential bootstrap.
//!
//! [`RetryPolicy`] is deliberately flat: every failed attempt is followed by the
//! same [`RetryPolicy::interval`], there is no growth and no attempt ceiling.
//! A credential pair that never works is retried for as long as the session lives.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use sermas_link::RetryPolicy;
//!
//! let retry = RetryPolicy::default();
//! assert_eq!(retry.next(1), Duration::from_millis(1000));
//! assert_eq!(retry.next(500), Duration::from_millis(1000));
//! ```

use std::time::Duration;

/// Default delay between two bootstrap attempts.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_millis(1000);

/// Fixed-interval retry policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay armed after each failed attempt.
    pub interval: Duration,
}

impl Default for RetryPolicy {
    /// Returns a policy retrying every 1000ms.
    fn default() -> Self {
        Self {
            interval: DEFAULT_RETRY_INTERVAL,
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with the given fixed interval.
    pub const fn fixed(interval: Duration) -> Self {
        Self { interval }
    }

    /// Delay to wait after the failed attempt number `attempt` (1-based).
    ///
    /// The attempt number is accepted for logging symmetry only; the delay never changes.
    pub fn next(&self, _attempt: u32) -> Duration {
        self.interval
    }
}
