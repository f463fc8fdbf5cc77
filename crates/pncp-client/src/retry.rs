//! Bounded retry with linear back-off for PNCP page requests.
//!
//! [`retry_with_backoff`] makes at most `max_attempts` calls. Before retry `n`
//! it waits `backoff_step_secs * n` seconds through a [`Sleeper`], so tests
//! can observe the schedule without waiting on the wall clock.

use std::future::Future;
use std::time::Duration;

use crate::error::PncpError;

/// Source of back-off delays.
pub trait Sleeper {
    fn sleep(&self, delay: Duration) -> impl Future<Output = ()> + Send;
}

/// Production sleeper backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, delay: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(delay)
    }
}

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:** transport failures (timeouts, connection errors, broken
/// bodies) and 5xx responses.
///
/// **Not retriable:** 4xx and other unexpected statuses, malformed bodies,
/// configuration errors and the pagination guard.
pub(crate) fn is_retriable(err: &PncpError) -> bool {
    match err {
        PncpError::Http(e) => !e.is_builder(),
        PncpError::ServerError { .. } => true,
        PncpError::ClientError { .. }
        | PncpError::UnexpectedStatus { .. }
        | PncpError::Deserialize { .. }
        | PncpError::InvalidBaseUrl { .. }
        | PncpError::PaginationLimit { .. } => false,
    }
}

/// Runs `operation` up to `max_attempts` times, retrying transient errors.
///
/// Schedule with `backoff_step_secs = 2` and `max_attempts = 3`:
///
/// | Attempt | Sleep after failure |
/// |---------|---------------------|
/// | 1       | 2 s                 |
/// | 2       | 4 s                 |
/// | 3       | - (error returned)  |
///
/// Non-retriable errors are returned immediately without sleeping.
pub(crate) async fn retry_with_backoff<T, F, Fut, S>(
    max_attempts: u32,
    backoff_step_secs: u64,
    sleeper: &S,
    mut operation: F,
) -> Result<T, PncpError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, PncpError>>,
    S: Sleeper,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_attempts {
                    return Err(err);
                }
                let delay_secs = backoff_step_secs.saturating_mul(u64::from(attempt));
                tracing::warn!(
                    attempt,
                    max_attempts,
                    delay_secs,
                    error = %err,
                    "PNCP transient error, retrying after back-off"
                );
                sleeper.sleep(Duration::from_secs(delay_secs)).await;
                attempt += 1;
            }
        }
    }
}
