//! Scripted history sources for cache tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use herald_cache::CacheManager;
use herald_core::{CacheSnapshot, MessageRecord};
use herald_error::{StorageError, StorageErrorKind, UpstreamError, UpstreamErrorKind};
use herald_history::{FetchOutcome, HistorySource};
use herald_storage::PersistentStore;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Notify;

pub fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

pub fn record(text: &str) -> MessageRecord {
    MessageRecord::new(text, Some("alice".into()), "Alice", "Archer", start()).unwrap()
}

pub fn records(texts: &[&str]) -> Vec<MessageRecord> {
    texts.iter().map(|t| record(t)).collect()
}

pub fn snapshot_aged(now: DateTime<Utc>, age: TimeDelta, texts: &[&str]) -> CacheSnapshot {
    CacheSnapshot::new(now - age, records(texts))
}

pub fn remote_error(message: &str) -> UpstreamError {
    UpstreamError::new(UpstreamErrorKind::Remote(message.to_string()))
}

/// Returns queued results in order, then empty complete fetches.
///
/// With a gate, every fetch waits for one `release` before answering.
#[derive(Default)]
pub struct ScriptedSource {
    script: Mutex<VecDeque<Result<FetchOutcome, UpstreamError>>>,
    calls: AtomicUsize,
    gate: Option<Arc<Notify>>,
    entered: Arc<Notify>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated() -> Self {
        Self {
            gate: Some(Arc::new(Notify::new())),
            ..Self::default()
        }
    }

    pub fn then_ok(self, texts: &[&str]) -> Self {
        let pages = texts.len().max(1);
        self.script
            .lock()
            .push_back(Ok(FetchOutcome::complete(records(texts), pages)));
        self
    }

    pub fn then_outcome(self, outcome: FetchOutcome) -> Self {
        self.script.lock().push_back(Ok(outcome));
        self
    }

    pub fn then_err(self, message: &str) -> Self {
        self.script.lock().push_back(Err(remote_error(message)));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    /// Wait until a fetch has started.
    pub async fn entered(&self) {
        self.entered.notified().await;
    }
}

#[async_trait::async_trait]
impl HistorySource for ScriptedSource {
    async fn fetch(&self) -> Result<FetchOutcome, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(FetchOutcome::complete(Vec::new(), 0)))
    }
}

/// Store whose saves always fail.
#[derive(Default)]
pub struct FailingStore {
    attempts: AtomicUsize,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save_attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl PersistentStore for FailingStore {
    async fn load(&self) -> Result<Option<CacheSnapshot>, StorageError> {
        Ok(None)
    }

    async fn save(&self, _snapshot: &CacheSnapshot) -> Result<(), StorageError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::new(StorageErrorKind::FileWrite(
            "disk full".to_string(),
        )))
    }
}

/// Poll until no refresh is running.
pub async fn wait_until_idle(manager: &CacheManager) {
    for _ in 0..500 {
        if !manager.refresh_state().in_progress() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("refresh never finished");
}
