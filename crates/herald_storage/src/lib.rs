//! Snapshot persistence for Herald.
//!
//! The cache keeps its last good snapshot on disk so a restart can serve
//! immediately instead of waiting for a full fetch. Backends implement
//! [`PersistentStore`]:
//!
//! - [`JsonFileStore`]: one JSON file, replaced atomically on every save
//! - [`MemoryStore`]: in-process, for tests and ephemeral deployments
//!
//! # Example
//!
//! ```rust
//! use herald_core::CacheSnapshot;
//! use herald_storage::{JsonFileStore, PersistentStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = JsonFileStore::new("/tmp/herald/cache.json");
//! store.save(&CacheSnapshot::new(chrono::Utc::now(), Vec::new())).await?;
//! assert!(store.load().await?.is_some());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use herald_core::CacheSnapshot;
use herald_error::StorageError;

mod file;
mod memory;

pub use file::JsonFileStore;
pub use herald_error::StorageErrorKind;
pub use memory::MemoryStore;

/// Trait for snapshot persistence backends.
#[async_trait::async_trait]
pub trait PersistentStore: Send + Sync {
    /// Load the last saved snapshot.
    ///
    /// Returns `Ok(None)` when nothing has been saved yet.
    async fn load(&self) -> Result<Option<CacheSnapshot>, StorageError>;

    /// Replace the saved snapshot with `snapshot`.
    async fn save(&self, snapshot: &CacheSnapshot) -> Result<(), StorageError>;
}
