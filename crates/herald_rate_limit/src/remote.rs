//! Remote API seam.

use herald_error::UpstreamError;
use serde_json::Value as JsonValue;

/// A remote procedure call endpoint of the messaging API.
///
/// Implementations must report flood waits as
/// [`UpstreamErrorKind::Throttled`](herald_error::UpstreamErrorKind::Throttled),
/// typically via [`classify_remote_error`](crate::classify_remote_error).
#[async_trait::async_trait]
pub trait RemoteApi: Send + Sync {
    /// Invoke `method` with `params` and return the raw result.
    async fn call(&self, method: &str, params: &JsonValue) -> Result<JsonValue, UpstreamError>;
}
