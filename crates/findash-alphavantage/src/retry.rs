//! Retry policy for provider calls.

use findash_core::{DashError, Result};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Status codes that are retried.
pub const RETRY_STATUSES: &[u16] = &[500, 502, 503, 504];

/// Upper bound for a single backoff sleep.
pub const MAX_BACKOFF: Duration = Duration::from_secs(120);

/// Bounded exponential backoff.
///
/// The first retry happens immediately, the n-th after
/// `backoff_factor * 2^(n-1)`, capped at [`MAX_BACKOFF`]. Only the statuses in
/// `retry_statuses` and transient transport errors are retried.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the initial attempt.
    pub max_retries: u32,
    /// Base of the exponential backoff.
    pub backoff_factor: Duration,
    /// Retryable HTTP statuses.
    pub retry_statuses: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 6,
            backoff_factor: Duration::from_millis(100),
            retry_statuses: RETRY_STATUSES.to_vec(),
        }
    }
}

/// Outcome of one attempt as seen by the policy.
#[derive(Debug)]
pub enum Attempt<T> {
    /// Usable result; stop.
    Done(T),
    /// Retryable status; try again if budget remains.
    RetryStatus(u16),
}

impl RetryPolicy {
    /// A policy that never retries.
    #[must_use]
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Sets the number of retries.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the backoff factor.
    #[must_use]
    pub const fn with_backoff_factor(mut self, factor: Duration) -> Self {
        self.backoff_factor = factor;
        self
    }

    /// Total attempts allowed, including the first one.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Returns true if `status` should be retried.
    #[must_use]
    pub fn retries_status(&self, status: u16) -> bool {
        self.retry_statuses.contains(&status)
    }

    /// Sleep before retry number `retry` (1-based).
    #[must_use]
    pub fn backoff(&self, retry: u32) -> Duration {
        if retry <= 1 {
            return Duration::ZERO;
        }
        let exp = 2u32.saturating_pow(retry - 1);
        self.backoff_factor
            .checked_mul(exp)
            .map_or(MAX_BACKOFF, |d| d.min(MAX_BACKOFF))
    }

    /// Runs `op` until it yields a final outcome or the budget is spent.
    ///
    /// Transient errors and [`Attempt::RetryStatus`] outcomes are retried.
    ///
    /// # Errors
    /// Returns [`DashError::RetriesExhausted`] once the budget is spent, and
    /// non-transient errors from `op` immediately.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Attempt<T>>>,
    {
        let mut retry = 0u32;
        loop {
            let reason = match op().await {
                Ok(Attempt::Done(value)) => return Ok(value),
                Ok(Attempt::RetryStatus(status)) => format!("HTTP {status}"),
                Err(e) if e.is_transient() => e.to_string(),
                Err(e) => return Err(e),
            };

            if retry >= self.max_retries {
                return Err(DashError::RetriesExhausted {
                    attempts: retry + 1,
                    reason,
                });
            }

            retry += 1;
            let delay = self.backoff(retry);
            warn!(
                retry,
                max_retries = self.max_retries,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                reason = %reason,
                "Retrying request"
            );
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[rstest]
    #[case(1, 0)]
    #[case(2, 200)]
    #[case(3, 400)]
    #[case(4, 800)]
    #[case(6, 3200)]
    fn test_backoff_schedule(#[case] retry: u32, #[case] millis: u64) {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(retry), Duration::from_millis(millis));
    }

    #[test]
    fn test_backoff_is_capped() {
        let policy = RetryPolicy::default().with_backoff_factor(Duration::from_secs(10));
        assert_eq!(policy.backoff(10), MAX_BACKOFF);
        assert_eq!(policy.backoff(40), MAX_BACKOFF);
    }

    #[test]
    fn test_default_statuses() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 7);
        assert!(policy.retries_status(503));
        assert!(!policy.retries_status(404));
        assert!(!policy.retries_status(429));
    }

    #[tokio::test]
    async fn test_run_retries_transient_errors() {
        let policy = RetryPolicy::default().with_backoff_factor(Duration::ZERO);
        let calls = AtomicU32::new(0);

        let result = policy
            .run(|| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(DashError::Network("reset".into()))
                    } else {
                        Ok(Attempt::Done(n))
                    }
                }
            })
            .await
            .unwrap();

        assert_eq!(result, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_run_exhausts_budget() {
        let policy = RetryPolicy::default()
            .with_max_retries(2)
            .with_backoff_factor(Duration::ZERO);
        let calls = AtomicU32::new(0);

        let err = policy
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<Attempt<()>, _>(DashError::Network("timeout".into())) }
            })
            .await
            .unwrap_err();

        assert!(matches!(err, DashError::RetriesExhausted { attempts: 3, .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_run_reports_last_status_when_exhausted() {
        let policy = RetryPolicy::default()
            .with_max_retries(1)
            .with_backoff_factor(Duration::ZERO);

        let err = policy
            .run(|| async { Ok::<Attempt<()>, DashError>(Attempt::RetryStatus(503)) })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DashError::RetriesExhausted { attempts: 2, ref reason } if reason == "HTTP 503"
        ));
    }

    #[tokio::test]
    async fn test_run_does_not_retry_permanent_errors() {
        let policy = RetryPolicy::default();
        let calls = AtomicU32::new(0);

        let err = policy
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<Attempt<()>, _>(DashError::Parse("bad".into())) }
            })
            .await
            .unwrap_err();

        assert!(matches!(err, DashError::Parse(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
