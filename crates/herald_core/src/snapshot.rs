//! Immutable cache generations.

use crate::MessageRecord;
use chrono::{DateTime, TimeDelta, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One generation of fetched records.
///
/// A snapshot is never mutated; a refresh builds a new one and the cache swaps
/// the pointer. The persisted form is
/// `{"timestamp": <epoch-millis>, "messages": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct CacheSnapshot {
    #[serde(rename = "timestamp", with = "chrono::serde::ts_milliseconds")]
    created_at: DateTime<Utc>,
    #[serde(rename = "messages")]
    records: Vec<MessageRecord>,
}

impl CacheSnapshot {
    /// Create a snapshot of `records` fetched starting at `created_at`.
    pub fn new(created_at: DateTime<Utc>, records: Vec<MessageRecord>) -> Self {
        Self {
            created_at,
            records,
        }
    }

    /// Time elapsed since the snapshot was created, clamped at zero.
    pub fn age(&self, now: DateTime<Utc>) -> TimeDelta {
        (now - self.created_at).max(TimeDelta::zero())
    }

    /// Whether the snapshot is older than `ttl` at `now`.
    ///
    /// Exactly `ttl` old is still fresh.
    pub fn is_stale(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        let ttl = TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX);
        now - self.created_at > ttl
    }

    /// Number of records in the snapshot.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the snapshot holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
