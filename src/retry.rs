//! Bounded fixed-delay retry combinator.
//!
//! Separates the retry policy (attempt bound, inter-attempt delay) from the
//! operation being retried. The delay is fixed rather than a backoff curve,
//! and there is no cancellation: once started, an attempt runs to completion
//! or to retry exhaustion.

use std::future::Future;
use std::time::Duration;

use miette::Diagnostic;
use thiserror::Error;
use tracing::warn;

/// Attempt bound and fixed inter-attempt delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(5);

    #[must_use]
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// A policy that never sleeps, for tests.
    #[must_use]
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ATTEMPTS, Self::DEFAULT_DELAY)
    }
}

/// All attempts failed; carries the final error and how many were made.
#[derive(Debug, Error, Diagnostic)]
#[error("operation failed after {attempts} attempts: {last_error}")]
#[diagnostic(
    code(graphtune::retry::exhausted),
    help("The collaborator kept failing; the caller should skip this round and move on.")
)]
pub struct RetryExhausted<E>
where
    E: std::error::Error + 'static,
{
    pub attempts: u32,
    #[source]
    pub last_error: E,
}

/// Run `op` up to `policy.max_attempts` times, sleeping `policy.delay`
/// between attempts (never after the last).
///
/// `op` receives the 1-based attempt number, mainly for logging.
pub async fn attempt<T, E, F, Fut>(policy: RetryPolicy, mut op: F) -> Result<T, RetryExhausted<E>>
where
    E: std::error::Error + 'static,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(error) if attempt < policy.max_attempts => {
                warn!(
                    attempt,
                    max_attempts = policy.max_attempts,
                    %error,
                    "attempt failed, retrying after fixed delay"
                );
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
            Err(last_error) => {
                return Err(RetryExhausted {
                    attempts: attempt,
                    last_error,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug, Error)]
    #[error("boom {0}")]
    struct Boom(u32);

    #[tokio::test]
    async fn succeeds_on_final_attempt() {
        let calls = AtomicU32::new(0);
        let result = attempt(RetryPolicy::immediate(5), |n| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { if n < 5 { Err(Boom(n)) } else { Ok(n) } }
        })
        .await;
        assert_eq!(result.unwrap(), 5);
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn exhaustion_reports_attempt_count_and_last_error() {
        let result: Result<(), _> =
            attempt(RetryPolicy::immediate(3), |n| async move { Err(Boom(n)) }).await;
        let exhausted = result.unwrap_err();
        assert_eq!(exhausted.attempts, 3);
        assert_eq!(exhausted.last_error.0, 3);
    }

    #[tokio::test]
    async fn first_success_makes_one_call() {
        let calls = AtomicU32::new(0);
        let result = attempt(RetryPolicy::default(), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, Boom>(42) }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
