//! Backoff schedule shared by manifest and resource fetches.

use std::time::Duration;

use crate::config::{FetchConfig, RetryConfig};

/// What went wrong with one fetch attempt, as far as retrying is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Timeout,
    /// 429 or 503.
    Throttled,
    /// DNS, connect, reset, short read.
    Unreachable,
    /// Any other 5xx status.
    ServerError(u32),
    /// 4xx, aborts, protocol and local errors.
    Permanent,
}

impl FailureKind {
    pub fn is_transient(self) -> bool {
        !matches!(self, FailureKind::Permanent)
    }
}

/// Outcome of consulting the policy after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    GiveUp,
    Wait(Duration),
}

/// Bounded exponential backoff. `max_attempts` counts the first try.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Attempts from `fetch` (`max_retries + 1`), delays from `retry` when set.
    pub fn from_config(fetch: &FetchConfig, retry: Option<&RetryConfig>) -> Self {
        let mut policy = Self {
            max_attempts: fetch.max_attempts(),
            ..Self::default()
        };
        if let Some(r) = retry {
            policy.base_delay = Duration::from_secs_f64(r.base_delay_secs.max(0.0));
            policy.max_delay = Duration::from_secs(r.max_delay_secs);
        }
        policy
    }

    /// Wait before attempt `attempt + 1`: `base_delay * 2^(attempt-1)`, at most `max_delay`.
    pub fn delay(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(16);
        self.base_delay
            .saturating_mul(1u32 << shift)
            .min(self.max_delay)
    }

    /// `attempt` is the 1-based number of the attempt that just failed.
    pub fn after_failure(&self, attempt: u32, kind: FailureKind) -> Backoff {
        if attempt >= self.max_attempts || !kind.is_transient() {
            Backoff::GiveUp
        } else {
            Backoff::Wait(self.delay(attempt))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(700),
        }
    }

    #[test]
    fn delay_doubles_then_caps() {
        let p = policy(10);
        let delays: Vec<u64> = (1..=5).map(|a| p.delay(a).as_millis() as u64).collect();
        assert_eq!(delays, [100, 200, 400, 700, 700]);
        assert_eq!(p.delay(200), Duration::from_millis(700));
    }

    #[test]
    fn permanent_failures_give_up_at_once() {
        assert_eq!(policy(4).after_failure(1, FailureKind::Permanent), Backoff::GiveUp);
    }

    #[test]
    fn transient_failures_wait_until_attempts_run_out() {
        let p = policy(3);
        assert_eq!(
            p.after_failure(1, FailureKind::Throttled),
            Backoff::Wait(Duration::from_millis(100))
        );
        assert_eq!(
            p.after_failure(2, FailureKind::ServerError(502)),
            Backoff::Wait(Duration::from_millis(200))
        );
        assert_eq!(p.after_failure(3, FailureKind::Timeout), Backoff::GiveUp);
    }

    #[test]
    fn from_config_counts_first_attempt() {
        let fetch = FetchConfig {
            timeout_secs: 5,
            max_retries: 3,
        };
        let p = RetryPolicy::from_config(&fetch, None);
        assert_eq!(p.max_attempts, 4);
        assert_eq!(p.base_delay, RetryPolicy::default().base_delay);

        let retry = RetryConfig {
            base_delay_secs: 0.5,
            max_delay_secs: 2,
        };
        let p = RetryPolicy::from_config(&fetch, Some(&retry));
        assert_eq!(p.base_delay, Duration::from_millis(500));
        assert_eq!(p.max_delay, Duration::from_secs(2));
    }

    #[test]
    fn zero_retries_never_waits() {
        let fetch = FetchConfig {
            timeout_secs: 5,
            max_retries: 0,
        };
        let p = RetryPolicy::from_config(&fetch, None);
        assert_eq!(p.after_failure(1, FailureKind::Timeout), Backoff::GiveUp);
    }
}
