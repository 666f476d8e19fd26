//! # Backoff after consecutive failures.
//!
//! [`BackoffPolicy`] leaves isolated failures alone and only starts delaying once the
//! consecutive-failure counter reaches [`BackoffPolicy::threshold`]:
//! - below the threshold the delay is zero;
//! - from the threshold on it is `base × 2^(failures − threshold)`, clamped to `cap`.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use rotor_core::BackoffPolicy;
//!
//! let backoff = BackoffPolicy::default();
//!
//! assert_eq!(backoff.delay(2), Duration::ZERO);
//! assert_eq!(backoff.delay(3), Duration::from_secs(5));
//! assert_eq!(backoff.delay(4), Duration::from_secs(10));
//! assert_eq!(backoff.delay(100), Duration::from_secs(300));
//! ```

use std::time::Duration;

/// Delay policy driven by the number of consecutive failed attempts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackoffPolicy {
    /// Failures tolerated before any delay kicks in.
    pub threshold: u32,
    /// Delay at exactly `threshold` failures.
    pub base: Duration,
    /// Upper bound for any delay.
    pub cap: Duration,
}

impl Default for BackoffPolicy {
    /// Returns a policy with:
    /// - `threshold = 3`;
    /// - `base = 5s`;
    /// - `cap = 300s`.
    fn default() -> Self {
        Self {
            threshold: 3,
            base: Duration::from_secs(5),
            cap: Duration::from_secs(300),
        }
    }
}

impl BackoffPolicy {
    /// Extra wait after `failures` consecutive failures.
    ///
    /// Monotonically non-decreasing in `failures` and never above [`BackoffPolicy::cap`];
    /// arithmetic overflow saturates to the cap.
    pub fn delay(&self, failures: u32) -> Duration {
        if failures < self.threshold {
            return Duration::ZERO;
        }
        let exp = failures - self.threshold;
        2u32.checked_pow(exp)
            .and_then(|factor| self.base.checked_mul(factor))
            .map_or(self.cap, |d| d.min(self.cap))
    }
}
