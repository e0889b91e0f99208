//! Pause-and-retry for rate-limited calls.
//!
//! Only `ApiError::RateLimited` is retried, after sleeping for the duration
//! it carries. Every other error returns immediately.

use std::future::Future;
use tokio::time::sleep;

use crate::api::{ApiError, ApiResult};

/// Run `op`, pausing and re-running it while it reports a rate limit.
///
/// With `max_retries` set, the rate-limit error is returned once that many
/// pauses have been spent.
pub async fn retry_rate_limited<T, F, Fut>(step: &'static str, max_retries: Option<u32>, mut op: F) -> ApiResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ApiResult<T>>,
{
    let mut pauses = 0u32;
    loop {
        match op().await {
            Err(ApiError::RateLimited { retry_after }) => {
                if max_retries.is_some_and(|max| pauses >= max) {
                    tracing::warn!(step, pauses, "Rate limit persists, giving up");
                    return Err(ApiError::RateLimited { retry_after });
                }
                pauses += 1;
                tracing::info!(step, pause_secs = retry_after.as_secs(), attempt = pauses, "Have to sleep a bit");
                sleep(retry_after).await;
            }
            other => return other,
        }
    }
}
