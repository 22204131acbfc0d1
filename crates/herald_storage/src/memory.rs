//! In-memory snapshot storage.

use crate::PersistentStore;
use herald_core::CacheSnapshot;
use herald_error::StorageError;
use parking_lot::Mutex;

/// Keeps the snapshot in memory and counts saves.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: Mutex<Option<CacheSnapshot>>,
    saves: Mutex<usize>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that already holds `snapshot`.
    pub fn with_snapshot(snapshot: CacheSnapshot) -> Self {
        Self {
            snapshot: Mutex::new(Some(snapshot)),
            saves: Mutex::new(0),
        }
    }

    /// The currently stored snapshot.
    pub fn stored(&self) -> Option<CacheSnapshot> {
        self.snapshot.lock().clone()
    }

    /// How many times [`PersistentStore::save`] was called.
    pub fn save_count(&self) -> usize {
        *self.saves.lock()
    }
}

#[async_trait::async_trait]
impl PersistentStore for MemoryStore {
    async fn load(&self) -> Result<Option<CacheSnapshot>, StorageError> {
        Ok(self.snapshot.lock().clone())
    }

    async fn save(&self, snapshot: &CacheSnapshot) -> Result<(), StorageError> {
        *self.snapshot.lock() = Some(snapshot.clone());
        *self.saves.lock() += 1;
        Ok(())
    }
}
