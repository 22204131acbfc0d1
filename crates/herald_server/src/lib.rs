//! HTTP front end for Herald.
//!
//! Serves the cached channel history and a unique-visitor count:
//!
//! - `GET /telegram?limit=<n>`: cached records, fetching first if the cache is empty
//! - `GET /uniqueUserCount`: number of distinct visitors seen
//! - `GET /health`: liveness plus whether a snapshot is loaded
//!
//! [`run`] wires the gateway client, paginator, cache and router together
//! from a [`HeraldConfig`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod api;
mod config;
mod observability;
mod server;
mod visitors;

pub use api::{AppState, create_router};
pub use config::{CacheSection, ChannelSection, HeraldConfig, ServerSection};
pub use observability::init_observability;
pub use server::{build_cache, run};
pub use visitors::{DEFAULT_VISITOR_LIMIT, VISITOR_COOKIE, VisitorCounter};
