//! github::rate_limit
//!
//! Quota gate run before request batches.
//!
//! When the core quota is used up, the gate sleeps until the window resets,
//! padded by [`RESET_PADDING_SECS`] and capped at [`MAX_WAIT_SECS`].

use std::time::Duration;

use chrono::Utc;

use super::traits::{ApiError, ForkApi, RateLimitStatus};

/// Longest the gate will ever sleep.
pub const MAX_WAIT_SECS: i64 = 3600;

/// Extra seconds slept past the reported reset instant.
pub const RESET_PADDING_SECS: i64 = 5;

/// How long to wait given a quota status and the current epoch time.
///
/// Returns `None` when there is quota left or the padded reset instant has
/// already passed.
///
/// ```
/// use std::time::Duration;
/// use forkindex::github::{wait_duration, RateLimitStatus};
///
/// let status = RateLimitStatus { remaining: 0, reset: 1_010 };
/// assert_eq!(wait_duration(&status, 1_000), Some(Duration::from_secs(15)));
/// ```
pub fn wait_duration(status: &RateLimitStatus, now: i64) -> Option<Duration> {
    if !status.is_exhausted() {
        return None;
    }
    let secs = status
        .reset
        .saturating_sub(now)
        .saturating_add(RESET_PADDING_SECS)
        .min(MAX_WAIT_SECS);
    if secs <= 0 {
        return None;
    }
    Some(Duration::from_secs(secs as u64))
}

/// Block until the API has quota again.
///
/// Errors from the quota request propagate unchanged.
pub async fn await_rate_limit<A>(api: &A) -> Result<(), ApiError>
where
    A: ForkApi + ?Sized,
{
    let status = api.rate_limit().await?;
    if let Some(wait) = wait_duration(&status, Utc::now().timestamp()) {
        tracing::warn!(
            wait_secs = wait.as_secs(),
            reset = status.reset,
            "GitHub rate limit exhausted, waiting for reset"
        );
        api.pause(wait).await;
    } else {
        tracing::debug!(remaining = status.remaining, "rate limit ok");
    }
    Ok(())
}
