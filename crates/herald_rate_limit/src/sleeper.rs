//! Injectable suspension.
//!
//! Throttle waits and inter-page pauses go through a [`Sleeper`] so tests can
//! observe the requested delays without waiting for them.

use parking_lot::Mutex;
use std::fmt::Debug;
use std::time::Duration;

/// Suspends the current task.
#[async_trait::async_trait]
pub trait Sleeper: Debug + Send + Sync {
    /// Suspend for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the Tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait::async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Returns immediately and remembers every requested delay.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    requested: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    /// Create a sleeper with an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays requested so far, in order.
    pub fn requested(&self) -> Vec<Duration> {
        self.requested.lock().clone()
    }

    /// Sum of all requested delays.
    pub fn total(&self) -> Duration {
        self.requested.lock().iter().sum()
    }
}

#[async_trait::async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.requested.lock().push(duration);
        tokio::task::yield_now().await;
    }
}
