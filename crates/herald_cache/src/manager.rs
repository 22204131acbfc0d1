//! The cache and its refresh coordinator.

use crate::{CacheConfig, RefreshState, RefreshTrigger, SkipReason};
use chrono::{DateTime, Utc};
use herald_core::{CacheSnapshot, Clock, SystemClock};
use herald_error::HeraldResult;
use herald_history::HistorySource;
use herald_storage::PersistentStore;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Owns the current snapshot and decides when to replace it.
///
/// Cloning is cheap; clones share the same snapshot and refresh state.
///
/// Lifecycle: empty until the first successful fetch, then populated. Once
/// older than the TTL the snapshot is stale; a read of a stale snapshot
/// returns it unchanged and starts a background refresh if none is running
/// and the previous attempt began at least the minimum interval ago. A
/// refresh that gets past channel resolution swaps in a new snapshot, even if
/// a page failed along the way; one that cannot resolve keeps the old.
#[derive(Clone)]
pub struct CacheManager {
    inner: Arc<Inner>,
}

struct Inner {
    config: CacheConfig,
    source: Arc<dyn HistorySource>,
    store: Arc<dyn PersistentStore>,
    clock: Arc<dyn Clock>,
    snapshot: RwLock<Option<Arc<CacheSnapshot>>>,
    refresh: Mutex<RefreshState>,
    bootstrap: tokio::sync::Mutex<()>,
}

impl std::fmt::Debug for CacheManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheManager")
            .field("config", &self.inner.config)
            .field("records", &self.snapshot().map(|s| s.len()))
            .field("refresh", &self.refresh_state())
            .finish_non_exhaustive()
    }
}

/// Assembles a [`CacheManager`].
pub struct CacheManagerBuilder {
    config: CacheConfig,
    source: Arc<dyn HistorySource>,
    store: Arc<dyn PersistentStore>,
    clock: Arc<dyn Clock>,
    snapshot: Option<CacheSnapshot>,
    refresh: RefreshState,
}

impl CacheManagerBuilder {
    /// Use `clock` instead of the wall clock.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Start populated with `snapshot`.
    pub fn snapshot(mut self, snapshot: CacheSnapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    /// Start with `refresh` as the refresh bookkeeping.
    pub fn refresh_state(mut self, refresh: RefreshState) -> Self {
        self.refresh = refresh;
        self
    }

    /// Build the manager.
    pub fn build(self) -> CacheManager {
        CacheManager {
            inner: Arc::new(Inner {
                config: self.config,
                source: self.source,
                store: self.store,
                clock: self.clock,
                snapshot: RwLock::new(self.snapshot.map(Arc::new)),
                refresh: Mutex::new(self.refresh),
                bootstrap: tokio::sync::Mutex::new(()),
            }),
        }
    }
}

/// Clears `in_progress` when the refresh task ends, however it ends.
struct InProgressGuard {
    inner: Arc<Inner>,
}

impl Drop for InProgressGuard {
    fn drop(&mut self) {
        self.inner.refresh.lock().finish();
    }
}

impl CacheManager {
    /// Manager for `source`, persisting through `store`, on the wall clock.
    pub fn new(
        config: CacheConfig,
        source: Arc<dyn HistorySource>,
        store: Arc<dyn PersistentStore>,
    ) -> Self {
        Self::builder(config, source, store).build()
    }

    /// Builder for a manager with a custom clock or initial state.
    pub fn builder(
        config: CacheConfig,
        source: Arc<dyn HistorySource>,
        store: Arc<dyn PersistentStore>,
    ) -> CacheManagerBuilder {
        CacheManagerBuilder {
            config,
            source,
            store,
            clock: Arc::new(SystemClock),
            snapshot: None,
            refresh: RefreshState::default(),
        }
    }

    /// Cache policy.
    pub fn config(&self) -> &CacheConfig {
        &self.inner.config
    }

    /// Current snapshot, if any.
    pub fn snapshot(&self) -> Option<Arc<CacheSnapshot>> {
        self.inner.snapshot.read().clone()
    }

    /// Copy of the refresh bookkeeping.
    pub fn refresh_state(&self) -> RefreshState {
        *self.inner.refresh.lock()
    }

    /// Whether no snapshot has been installed yet.
    pub fn is_empty(&self) -> bool {
        self.inner.snapshot.read().is_none()
    }

    /// Whether the current snapshot is older than the TTL at `now`.
    ///
    /// An empty cache is not stale.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        self.snapshot()
            .is_some_and(|snapshot| snapshot.is_stale(now, self.inner.config.ttl()))
    }

    /// Populate from the persistent store.
    ///
    /// Returns whether a snapshot was installed. Load failures are logged and
    /// leave the cache empty.
    #[instrument(skip(self))]
    pub async fn restore(&self) -> bool {
        match self.inner.store.load().await {
            Ok(Some(snapshot)) => {
                info!(records = snapshot.len(), created_at = %snapshot.created_at(), "Restored snapshot");
                self.install(Arc::new(snapshot));
                true
            }
            Ok(None) => false,
            Err(e) => {
                warn!(error = %e, "Could not load persisted snapshot");
                false
            }
        }
    }

    /// Current snapshot, fetching synchronously when the cache is empty.
    ///
    /// With a snapshot present this never waits on the network; if the
    /// snapshot is stale a background refresh may be started as a side effect.
    ///
    /// # Errors
    ///
    /// Only when the cache is empty and the bootstrap fetch cannot resolve
    /// the channel. A page failure still yields the records gathered so far.
    #[instrument(skip(self))]
    pub async fn read(&self) -> HeraldResult<Arc<CacheSnapshot>> {
        let now = self.inner.clock.now();
        if let Some(snapshot) = self.snapshot() {
            let trigger = self.maybe_refresh(now);
            debug!(
                records = snapshot.len(),
                refresh_started = trigger.is_started(),
                "Served cached snapshot"
            );
            return Ok(snapshot);
        }
        self.bootstrap().await
    }

    /// Start a background refresh if the snapshot is stale, none is running,
    /// and the last attempt began at least the minimum interval before `now`.
    ///
    /// The in-progress flag and attempt time are set before the refresh task
    /// is spawned, so a second call made before the task runs sees it.
    #[instrument(skip(self))]
    pub fn maybe_refresh(&self, now: DateTime<Utc>) -> RefreshTrigger {
        let Some(snapshot) = self.snapshot() else {
            return RefreshTrigger::Skipped(SkipReason::Empty);
        };
        if !snapshot.is_stale(now, self.inner.config.ttl()) {
            return RefreshTrigger::Skipped(SkipReason::Fresh);
        }

        {
            let mut state = self.inner.refresh.lock();
            if state.in_progress() {
                return RefreshTrigger::Skipped(SkipReason::InProgress);
            }
            if let Some(retry_in) = state.cooldown_remaining(now, self.inner.config.min_refresh_interval()) {
                debug!(?retry_in, "Refresh attempted too recently");
                return RefreshTrigger::Skipped(SkipReason::TooSoon { retry_in });
            }
            state.begin(now);
        }

        info!(age_secs = snapshot.age(now).num_seconds(), "Starting background refresh");
        let guard = InProgressGuard {
            inner: Arc::clone(&self.inner),
        };
        let manager = self.clone();
        RefreshTrigger::Started(tokio::spawn(async move {
            let _guard = guard;
            manager.run_refresh(now).await;
        }))
    }

    #[instrument(skip(self))]
    async fn run_refresh(&self, started_at: DateTime<Utc>) {
        match self.fetch_snapshot(started_at).await {
            Ok(snapshot) => {
                self.install(Arc::clone(&snapshot));
                self.persist(&snapshot).await;
            }
            Err(e) => {
                error!(error = %e, "Background refresh failed, keeping previous snapshot");
            }
        }
    }

    /// First fetch for an empty cache, shared by concurrent readers.
    async fn bootstrap(&self) -> HeraldResult<Arc<CacheSnapshot>> {
        let _bootstrap = self.inner.bootstrap.lock().await;
        if let Some(snapshot) = self.snapshot() {
            return Ok(snapshot);
        }

        let started_at = self.inner.clock.now();
        self.inner.refresh.lock().record_attempt(started_at);
        info!("Cache empty, fetching synchronously");

        let snapshot = self.fetch_snapshot(started_at).await?;
        self.install(Arc::clone(&snapshot));
        self.persist(&snapshot).await;
        Ok(snapshot)
    }

    async fn fetch_snapshot(&self, started_at: DateTime<Utc>) -> HeraldResult<Arc<CacheSnapshot>> {
        let outcome = self.inner.source.fetch().await?;
        if let Some(failure) = outcome.failure() {
            warn!(
                records = outcome.records().len(),
                pages = outcome.pages_fetched(),
                error = %failure,
                "Fetch ended early, using partial result"
            );
        }
        Ok(Arc::new(CacheSnapshot::new(started_at, outcome.into_records())))
    }

    fn install(&self, snapshot: Arc<CacheSnapshot>) {
        let records = snapshot.len();
        *self.inner.snapshot.write() = Some(snapshot);
        debug!(records, "Installed snapshot");
    }

    async fn persist(&self, snapshot: &CacheSnapshot) {
        if let Err(e) = self.inner.store.save(snapshot).await {
            warn!(error = %e, "Failed to persist snapshot");
        }
    }
}
