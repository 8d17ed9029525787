//! Retry loop: run a closure until success or policy says stop.

use super::error::FetchError;
use super::policy::{Backoff, RetryPolicy};

/// Calls `f` until it succeeds, fails permanently or runs out of attempts,
/// sleeping between attempts. The last error is returned.
pub fn run_with_retry<T, F>(policy: &RetryPolicy, mut f: F) -> Result<T, FetchError>
where
    F: FnMut() -> Result<T, FetchError>,
{
    let mut attempt = 1u32;
    loop {
        match f() {
            Ok(v) => return Ok(v),
            Err(e) => {
                let kind = e.failure_kind();
                match policy.after_failure(attempt, kind) {
                    Backoff::GiveUp => return Err(e),
                    Backoff::Wait(d) => {
                        tracing::warn!(
                            url = e.url(),
                            attempt,
                            ?kind,
                            delay_ms = d.as_millis() as u64,
                            "fetch failed, retrying: {}",
                            e
                        );
                        std::thread::sleep(d);
                        attempt += 1;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn quick(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
        }
    }

    fn http(status: u32) -> FetchError {
        FetchError::Http {
            url: "https://h/x".into(),
            status,
        }
    }

    #[test]
    fn retries_until_success() {
        let mut calls = 0;
        let out = run_with_retry(&quick(4), || {
            calls += 1;
            if calls < 3 {
                Err(http(503))
            } else {
                Ok(calls)
            }
        });
        assert_eq!(out.unwrap(), 3);
    }

    #[test]
    fn gives_up_after_max_attempts() {
        let mut calls = 0;
        let out: Result<(), _> = run_with_retry(&quick(3), || {
            calls += 1;
            Err(http(500))
        });
        assert!(matches!(out, Err(FetchError::Http { status: 500, .. })));
        assert_eq!(calls, 3);
    }

    #[test]
    fn non_retryable_fails_at_once() {
        let mut calls = 0;
        let out: Result<(), _> = run_with_retry(&quick(5), || {
            calls += 1;
            Err(http(404))
        });
        assert!(out.is_err());
        assert_eq!(calls, 1);
    }
}
