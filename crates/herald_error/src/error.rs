//! Top-level error wrapper types.

use crate::{AuthError, ConfigError, HttpError, ServerError, StorageError, UpstreamError};

/// Every error condition a Herald operation can report.
///
/// # Examples
///
/// ```
/// use herald_error::{HeraldError, HttpError};
///
/// let http_err = HttpError::new("Connection failed");
/// let err: HeraldError = http_err.into();
/// assert!(format!("{}", err).contains("HTTP Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum HeraldErrorKind {
    /// HTTP error
    #[from(HttpError)]
    Http(HttpError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Remote API error
    #[from(UpstreamError)]
    Upstream(UpstreamError),
    /// Snapshot persistence error
    #[from(StorageError)]
    Storage(StorageError),
    /// Session error
    #[from(AuthError)]
    Auth(AuthError),
    /// HTTP server error
    #[from(ServerError)]
    Server(ServerError),
}

/// Herald error with kind discrimination.
///
/// # Examples
///
/// ```
/// use herald_error::{ConfigError, HeraldResult};
///
/// fn might_fail() -> HeraldResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Herald Error: {}", _0)]
pub struct HeraldError(Box<HeraldErrorKind>);

impl HeraldError {
    /// Create a new error from a kind.
    pub fn new(kind: HeraldErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &HeraldErrorKind {
        &self.0
    }

    /// The upstream error this wraps, if any.
    pub fn as_upstream(&self) -> Option<&UpstreamError> {
        match self.kind() {
            HeraldErrorKind::Upstream(err) => Some(err),
            _ => None,
        }
    }
}

// Generic From implementation for any type that converts to HeraldErrorKind
impl<T> From<T> for HeraldError
where
    T: Into<HeraldErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Herald operations.
pub type HeraldResult<T> = std::result::Result<T, HeraldError>;
