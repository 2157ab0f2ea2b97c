//! Retry policy for remote-call adapters.
//!
//! Retry behavior is data, not scattered control flow: a [`RetryPolicy`]
//! value is handed to the coordinator and applied to every account and
//! wallet call through [`with_retry`]. Only transient service errors are
//! retried; rejections carrying business meaning (not-found, insufficient
//! balance) are surfaced immediately.

use std::future::Future;
use std::time::Duration;

use crate::clients::ClientError;
use crate::error::SagaError;

/// Exponential backoff retry policy.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Factor applied to the delay after each retry.
    pub multiplier: u32,
}

impl RetryPolicy {
    /// Creates a new policy.
    pub fn new(max_attempts: u32, base_delay: Duration, multiplier: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            multiplier,
        }
    }

    /// A policy with no delay between attempts, for tests.
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO, 1)
    }
}

impl Default for RetryPolicy {
    /// Three attempts starting at 500ms, doubling after each failure.
    fn default() -> Self {
        Self::new(3, Duration::from_millis(500), 2)
    }
}

/// Runs a remote call under the given policy.
///
/// Transient failures are retried with exponential backoff until the
/// attempt budget is exhausted, then reported as a hard dependency error.
pub async fn with_retry<T, F, Fut>(
    policy: RetryPolicy,
    service: &'static str,
    mut call: F,
) -> Result<T, SagaError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let mut delay = policy.base_delay;
    let mut attempt = 1;
    loop {
        match call().await {
            Ok(value) => return Ok(value),
            Err(ClientError::NotFound(what)) => return Err(SagaError::NotFound(what)),
            Err(ClientError::InsufficientBalance { user_id, requested }) => {
                return Err(SagaError::InsufficientBalance { user_id, requested });
            }
            Err(ClientError::Service { reason, transient }) => {
                if !transient || attempt >= policy.max_attempts {
                    return Err(SagaError::Dependency {
                        service,
                        attempts: attempt,
                        reason,
                    });
                }
                tracing::debug!(service, attempt, %reason, "transient failure, retrying");
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                delay *= policy.multiplier;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn transient(reason: &str) -> ClientError {
        ClientError::Service {
            reason: reason.to_string(),
            transient: true,
        }
    }

    #[tokio::test]
    async fn test_first_attempt_success_does_not_retry() {
        let calls = AtomicU32::new(0);
        let result = with_retry(RetryPolicy::immediate(3), "account", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, ClientError>(42) }
        })
        .await
        .unwrap();
        assert_eq!(result, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transient_failures_are_retried_until_success() {
        let calls = AtomicU32::new(0);
        let result = with_retry(RetryPolicy::immediate(3), "wallet", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(transient("connection reset"))
                } else {
                    Ok(7)
                }
            }
        })
        .await
        .unwrap();
        assert_eq!(result, 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhaustion_becomes_dependency_error() {
        let calls = AtomicU32::new(0);
        let err = with_retry(RetryPolicy::immediate(3), "wallet", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>(transient("unavailable")) }
        })
        .await
        .unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(matches!(
            err,
            SagaError::Dependency {
                service: "wallet",
                attempts: 3,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_hard_failure_is_not_retried() {
        let calls = AtomicU32::new(0);
        let err = with_retry(RetryPolicy::immediate(5), "account", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err::<(), _>(ClientError::Service {
                    reason: "bad gateway".to_string(),
                    transient: false,
                })
            }
        })
        .await
        .unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(err, SagaError::Dependency { attempts: 1, .. }));
    }

    #[tokio::test]
    async fn test_not_found_surfaces_immediately() {
        let calls = AtomicU32::new(0);
        let err = with_retry(RetryPolicy::immediate(5), "account", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>(ClientError::NotFound("User 9".to_string())) }
        })
        .await
        .unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(err, SagaError::NotFound(_)));
    }
}
