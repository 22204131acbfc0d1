//! Snapshot cache with time-to-live and coordinated background refresh.
//!
//! [`CacheManager`] owns the current [`CacheSnapshot`](herald_core::CacheSnapshot)
//! and the [`RefreshState`]. Reads never wait on the network once a snapshot
//! exists; a stale snapshot is served as-is while at most one background
//! refresh replaces it.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod manager;
mod state;

pub use config::CacheConfig;
pub use manager::{CacheManager, CacheManagerBuilder};
pub use state::{RefreshState, RefreshTrigger, SkipReason};
