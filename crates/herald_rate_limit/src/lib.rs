//! Throttle-aware access to the remote messaging API.
//!
//! The remote API signals throttling with an error message of the form
//! `FLOOD_WAIT_<seconds>`. This crate turns that message into a structured
//! [`UpstreamErrorKind::Throttled`] at the boundary ([`classify_remote_error`])
//! and hides it behind [`RateLimitedCaller`], which waits out every flood wait
//! and retries until the call succeeds or fails for another reason.
//!
//! ```rust,no_run
//! use herald_rate_limit::{GatewayClient, GatewayConfig, RateLimitedCaller};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GatewayClient::new(GatewayConfig::new("http://localhost:9000"))?;
//! let caller = RateLimitedCaller::new(Arc::new(client));
//!
//! let peer = caller
//!     .call("contacts.resolveUsername", &json!({ "username": "news" }))
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! [`UpstreamErrorKind::Throttled`]: herald_error::UpstreamErrorKind::Throttled

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod caller;
mod gateway;
mod remote;
mod session;
mod sleeper;
mod throttle;

pub use caller::RateLimitedCaller;
pub use gateway::{GatewayClient, GatewayConfig};
pub use herald_error::{UpstreamError, UpstreamErrorKind};
pub use remote::RemoteApi;
pub use session::ensure_session;
pub use sleeper::{RecordingSleeper, Sleeper, TokioSleeper};
pub use throttle::{classify_remote_error, parse_flood_wait};
