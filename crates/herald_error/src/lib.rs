//! Error types for Herald.
//!
//! Every crate in the workspace reports failures through the types defined here.
//!
//! # Error Hierarchy
//!
//! Errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use herald_error::{HeraldResult, UpstreamError, UpstreamErrorKind};
//!
//! fn resolve() -> HeraldResult<u64> {
//!     Err(UpstreamError::new(UpstreamErrorKind::PeerNotFound("news".into())))?
//! }
//!
//! assert!(resolve().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod auth;
mod config;
mod error;
mod http;
mod server;
mod storage;
mod upstream;

pub use auth::{AuthError, AuthErrorKind};
pub use config::ConfigError;
pub use error::{HeraldError, HeraldErrorKind, HeraldResult};
pub use http::HttpError;
pub use server::{ServerError, ServerErrorKind};
pub use storage::{StorageError, StorageErrorKind};
pub use upstream::{UpstreamError, UpstreamErrorKind};
