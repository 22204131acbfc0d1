//! Errors raised by the remote messaging API.

use std::time::Duration;

/// Upstream failure conditions.
///
/// `Throttled` is the only recoverable kind: the rate-limited caller waits
/// for `wait_secs` and retries. Every other kind is propagated to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum UpstreamErrorKind {
    /// Server-signaled flood wait
    #[display("Throttled: retry after {} seconds", wait_secs)]
    Throttled {
        /// Mandatory wait before the call may be retried
        wait_secs: u64,
    },
    /// Opaque error reported by the remote API
    #[display("Remote API error: {}", _0)]
    Remote(String),
    /// Request never reached the API or the response was lost
    #[display("Transport error: {}", _0)]
    Transport(String),
    /// Response did not have the expected shape
    #[display("Malformed response: {}", _0)]
    MalformedResponse(String),
    /// Channel reference did not resolve to a channel
    #[display("Peer not found: {}", _0)]
    PeerNotFound(String),
}

impl UpstreamErrorKind {
    /// Wait duration demanded by the server, if this is a throttle signal.
    pub fn throttle_wait(&self) -> Option<Duration> {
        match self {
            UpstreamErrorKind::Throttled { wait_secs } => Some(Duration::from_secs(*wait_secs)),
            _ => None,
        }
    }
}

/// Upstream error with location tracking.
///
/// # Examples
///
/// ```
/// use herald_error::{UpstreamError, UpstreamErrorKind};
/// use std::time::Duration;
///
/// let err = UpstreamError::new(UpstreamErrorKind::Throttled { wait_secs: 3 });
/// assert_eq!(err.throttle_wait(), Some(Duration::from_secs(3)));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Upstream Error: {} at line {} in {}", kind, line, file)]
pub struct UpstreamError {
    /// The kind of error that occurred
    pub kind: UpstreamErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl UpstreamError {
    /// Create a new upstream error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: UpstreamErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for [`UpstreamErrorKind::throttle_wait`].
    pub fn throttle_wait(&self) -> Option<Duration> {
        self.kind.throttle_wait()
    }
}
