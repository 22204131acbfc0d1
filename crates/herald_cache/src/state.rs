//! Refresh bookkeeping.

use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Whether a refresh is running and when the last one started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RefreshState {
    in_progress: bool,
    last_attempt_at: Option<DateTime<Utc>>,
}

impl RefreshState {
    /// Idle state whose last attempt started at `last_attempt_at`.
    pub fn idle_since(last_attempt_at: DateTime<Utc>) -> Self {
        Self {
            in_progress: false,
            last_attempt_at: Some(last_attempt_at),
        }
    }

    /// Whether a refresh is running.
    pub fn in_progress(&self) -> bool {
        self.in_progress
    }

    /// Start of the most recent attempt, if any.
    pub fn last_attempt_at(&self) -> Option<DateTime<Utc>> {
        self.last_attempt_at
    }

    /// Time left before another attempt is allowed at `now`.
    pub(crate) fn cooldown_remaining(&self, now: DateTime<Utc>, min_interval: Duration) -> Option<Duration> {
        let last = self.last_attempt_at?;
        let elapsed = (now - last).to_std().unwrap_or_default();
        min_interval.checked_sub(elapsed).filter(|remaining| !remaining.is_zero())
    }

    /// Mark an attempt as started at `now`.
    pub(crate) fn begin(&mut self, now: DateTime<Utc>) {
        self.in_progress = true;
        self.last_attempt_at = Some(now);
    }

    /// Mark the running attempt as finished.
    pub(crate) fn finish(&mut self) {
        self.in_progress = false;
    }

    /// Record a bootstrap fetch start without claiming the refresh slot.
    pub(crate) fn record_attempt(&mut self, now: DateTime<Utc>) {
        self.last_attempt_at = Some(now);
    }
}

/// Why [`CacheManager::maybe_refresh`](crate::CacheManager::maybe_refresh) did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum SkipReason {
    /// There is no snapshot yet; reads bootstrap instead
    #[display("cache is empty")]
    Empty,
    /// The snapshot is within its TTL
    #[display("snapshot is fresh")]
    Fresh,
    /// Another refresh is running
    #[display("refresh already in progress")]
    InProgress,
    /// The last attempt started less than the minimum interval ago
    #[display("last attempt too recent, retry in {:?}", retry_in)]
    TooSoon {
        /// Time until the next attempt is allowed
        retry_in: Duration,
    },
}

/// Result of asking for a background refresh.
#[derive(Debug)]
pub enum RefreshTrigger {
    /// A refresh task was spawned
    Started(JoinHandle<()>),
    /// No refresh was started
    Skipped(SkipReason),
}

impl RefreshTrigger {
    /// Whether a refresh task was spawned.
    pub fn is_started(&self) -> bool {
        matches!(self, RefreshTrigger::Started(_))
    }

    /// The skip reason, if nothing was started.
    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            RefreshTrigger::Skipped(reason) => Some(*reason),
            RefreshTrigger::Started(_) => None,
        }
    }

    /// Wait for the spawned refresh, if any, to finish.
    pub async fn join(self) {
        if let RefreshTrigger::Started(handle) = self
            && let Err(e) = handle.await
        {
            tracing::error!(error = %e, "Refresh task panicked");
        }
    }
}
