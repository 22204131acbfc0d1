//! Flood-wait detection at the remote-call boundary.

use herald_error::{UpstreamError, UpstreamErrorKind};
use regex::Regex;
use std::sync::LazyLock;

static FLOOD_WAIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^FLOOD_WAIT_(\d+)").expect("flood wait pattern is valid"));

/// Seconds to wait if `message` is a flood-wait signal.
///
/// # Examples
///
/// ```
/// use herald_rate_limit::parse_flood_wait;
///
/// assert_eq!(parse_flood_wait("FLOOD_WAIT_17"), Some(17));
/// assert_eq!(parse_flood_wait("CHANNEL_PRIVATE"), None);
/// ```
pub fn parse_flood_wait(message: &str) -> Option<u64> {
    FLOOD_WAIT
        .captures(message)
        .and_then(|captures| captures.get(1))
        .and_then(|seconds| seconds.as_str().parse().ok())
}

/// Map a raw remote error message to an [`UpstreamError`].
///
/// Flood waits become [`UpstreamErrorKind::Throttled`]; everything else is an
/// opaque [`UpstreamErrorKind::Remote`] carrying the original message.
#[track_caller]
pub fn classify_remote_error(message: impl Into<String>) -> UpstreamError {
    let message = message.into();
    match parse_flood_wait(&message) {
        Some(wait_secs) => UpstreamError::new(UpstreamErrorKind::Throttled { wait_secs }),
        None => UpstreamError::new(UpstreamErrorKind::Remote(message)),
    }
}
