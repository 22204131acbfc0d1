//! Cache timing policy.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Freshness and refresh spacing for the snapshot cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_setters::Setters)]
#[setters(prefix = "with_")]
pub struct CacheConfig {
    /// Age in seconds after which a snapshot is stale
    #[serde(default = "default_ttl_secs")]
    ttl_secs: u64,

    /// Minimum seconds between the starts of two refresh attempts
    #[serde(default = "default_min_refresh_interval_secs")]
    min_refresh_interval_secs: u64,
}

fn default_ttl_secs() -> u64 {
    300 // 5 minutes
}

fn default_min_refresh_interval_secs() -> u64 {
    600 // 10 minutes
}

impl CacheConfig {
    /// Policy with explicit durations.
    pub fn new(ttl: Duration, min_refresh_interval: Duration) -> Self {
        Self {
            ttl_secs: ttl.as_secs(),
            min_refresh_interval_secs: min_refresh_interval.as_secs(),
        }
    }

    /// Snapshot time-to-live.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Minimum spacing between refresh attempts.
    pub fn min_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.min_refresh_interval_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            min_refresh_interval_secs: default_min_refresh_interval_secs(),
        }
    }
}
