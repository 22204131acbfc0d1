//! Session establishment errors.

/// Error kinds for the session precondition.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum AuthErrorKind {
    /// The session check call failed
    #[display("No valid session: {}", _0)]
    SessionUnavailable(String),
    /// The gateway answered but reported no signed-in user
    #[display("Gateway session is not signed in")]
    NotSignedIn,
}

/// Authentication error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Auth Error: {} at line {} in {}", kind, line, file)]
pub struct AuthError {
    /// The error kind
    pub kind: AuthErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// File where error occurred
    pub file: &'static str,
}

impl AuthError {
    /// Create a new AuthError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: AuthErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
