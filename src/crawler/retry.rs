//! Retry policy for failed page fetches
//!
//! | Failure | Delay before next attempt | Gives up at attempt |
//! |---------|---------------------------|---------------------|
//! | RateLimited | `base × 2^(attempt−1)`, capped | `rate_limited_max_attempts` (5) |
//! | Forbidden | `max_delay` | `forbidden_max_attempts` (2) |
//! | TransientNetwork / Malformed | `attempt × transient_base`, capped | `transient_max_attempts` (3) |
//! | NotFound | never retried | 1 |
//!
//! Decisions depend only on the attempt number, the failure kind and the
//! immutable configuration. Callers count attempts per page.

use crate::config::RetryConfig;
use crate::crawler::fetcher::FailureKind;
use std::time::Duration;

/// What to do after a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Wait this long, then try again
    Retry(Duration),

    /// Stop trying this page
    GiveUp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    base_delay: Duration,
    transient_base_delay: Duration,
    max_delay: Duration,
    rate_limited_max_attempts: u32,
    forbidden_max_attempts: u32,
    transient_max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

impl RetryPolicy {
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            base_delay: Duration::from_millis(config.base_delay_ms),
            transient_base_delay: Duration::from_millis(config.transient_base_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
            rate_limited_max_attempts: config.rate_limited_max_attempts,
            forbidden_max_attempts: config.forbidden_max_attempts,
            transient_max_attempts: config.transient_max_attempts,
        }
    }

    /// Total attempts allowed for a page failing with `kind`
    pub fn max_attempts(&self, kind: FailureKind) -> u32 {
        match kind {
            FailureKind::RateLimited => self.rate_limited_max_attempts,
            FailureKind::Forbidden => self.forbidden_max_attempts,
            FailureKind::TransientNetwork | FailureKind::Malformed => self.transient_max_attempts,
            FailureKind::NotFound => 1,
        }
    }

    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// Decides whether to retry after attempt number `attempt` (1-based) failed
    ///
    /// # Example
    ///
    /// ```
    /// use sozluk_ripple::crawler::{FailureKind, RetryDecision, RetryPolicy};
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy::default();
    /// assert_eq!(
    ///     policy.decide(2, FailureKind::RateLimited),
    ///     RetryDecision::Retry(Duration::from_secs(20))
    /// );
    /// assert_eq!(policy.decide(1, FailureKind::NotFound), RetryDecision::GiveUp);
    /// ```
    pub fn decide(&self, attempt: u32, kind: FailureKind) -> RetryDecision {
        let attempt = attempt.max(1);

        if attempt >= self.max_attempts(kind) {
            return RetryDecision::GiveUp;
        }

        let delay = match kind {
            FailureKind::RateLimited => self.exponential_delay(attempt),
            FailureKind::Forbidden => self.max_delay,
            FailureKind::TransientNetwork | FailureKind::Malformed => self
                .transient_base_delay
                .saturating_mul(attempt)
                .min(self.max_delay),
            FailureKind::NotFound => return RetryDecision::GiveUp,
        };

        RetryDecision::Retry(delay)
    }

    /// Lengthens a delay to honour a server `Retry-After` hint
    ///
    /// The result never exceeds `max_delay` unless `delay` already did.
    pub fn honor_hint(&self, delay: Duration, hint: Option<Duration>) -> Duration {
        match hint {
            Some(hint) => delay.max(hint.min(self.max_delay)),
            None => delay,
        }
    }

    fn exponential_delay(&self, attempt: u32) -> Duration {
        let exponent = (attempt - 1).min(31);
        self.base_delay
            .saturating_mul(1u32 << exponent)
            .min(self.max_delay)
    }
}
