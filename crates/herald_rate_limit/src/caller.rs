//! Retry-on-throttle wrapper for remote calls.

use crate::{RemoteApi, Sleeper, TokioSleeper};
use herald_error::UpstreamError;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Wraps a [`RemoteApi`] so flood waits never reach the caller.
///
/// A throttled call is suspended for exactly the server-requested duration and
/// then retried with the same parameters, without any attempt limit. Any other
/// error is returned immediately. Latency is therefore unbounded under
/// sustained throttling.
#[derive(Clone)]
pub struct RateLimitedCaller {
    api: Arc<dyn RemoteApi>,
    sleeper: Arc<dyn Sleeper>,
}

impl std::fmt::Debug for RateLimitedCaller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimitedCaller")
            .field("sleeper", &self.sleeper)
            .finish_non_exhaustive()
    }
}

impl RateLimitedCaller {
    /// Caller that waits on the Tokio timer.
    pub fn new(api: Arc<dyn RemoteApi>) -> Self {
        Self::with_sleeper(api, Arc::new(TokioSleeper))
    }

    /// Caller that waits through `sleeper`.
    pub fn with_sleeper(api: Arc<dyn RemoteApi>, sleeper: Arc<dyn Sleeper>) -> Self {
        Self { api, sleeper }
    }

    /// The sleeper used for throttle waits.
    pub fn sleeper(&self) -> &Arc<dyn Sleeper> {
        &self.sleeper
    }

    /// Call `method`, waiting out and retrying every flood wait.
    ///
    /// # Errors
    ///
    /// Returns the first non-throttle error reported by the API.
    #[instrument(skip(self, params))]
    pub async fn call(&self, method: &str, params: &JsonValue) -> Result<JsonValue, UpstreamError> {
        let mut throttles: u32 = 0;
        loop {
            match self.api.call(method, params).await {
                Ok(result) => {
                    if throttles > 0 {
                        debug!(throttles, "Call succeeded after flood waits");
                    }
                    return Ok(result);
                }
                Err(err) => match err.throttle_wait() {
                    Some(wait) => {
                        throttles += 1;
                        warn!(wait_secs = wait.as_secs(), throttles, "Flood wait, retrying");
                        self.sleeper.sleep(wait).await;
                    }
                    None => {
                        debug!(error = %err, "Remote call failed");
                        return Err(err);
                    }
                },
            }
        }
    }
}
