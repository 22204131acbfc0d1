//! Single-file JSON snapshot storage.

use crate::PersistentStore;
use herald_core::CacheSnapshot;
use herald_error::{StorageError, StorageErrorKind};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Stores the snapshot as `{"timestamp": <epoch-millis>, "messages": [...]}`.
///
/// Each write goes to its own sibling temp file that is then renamed over the
/// target, so a crash mid-write never leaves a truncated snapshot behind and
/// overlapping saves never share a temp file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store backed by the file at `path`.
    ///
    /// Parent directories are created on first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl PersistentStore for JsonFileStore {
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> Result<Option<CacheSnapshot>, StorageError> {
        let data = match tokio::fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No persisted snapshot");
                return Ok(None);
            }
            Err(e) => {
                return Err(StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    self.path.display(),
                    e
                ))));
            }
        };

        let snapshot: CacheSnapshot = serde_json::from_slice(&data).map_err(|e| {
            StorageError::new(StorageErrorKind::Decode(format!(
                "{}: {}",
                self.path.display(),
                e
            )))
        })?;

        tracing::info!(
            records = snapshot.len(),
            created_at = %snapshot.created_at(),
            "Loaded persisted snapshot"
        );
        Ok(Some(snapshot))
    }

    #[tracing::instrument(skip(self, snapshot), fields(path = %self.path.display(), records = snapshot.len()))]
    async fn save(&self, snapshot: &CacheSnapshot) -> Result<(), StorageError> {
        let data = serde_json::to_vec(snapshot)
            .map_err(|e| StorageError::new(StorageErrorKind::Encode(e.to_string())))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        let size = data.len();
        let target = self.path.clone();
        tokio::task::spawn_blocking(move || replace_atomically(&target, &data))
            .await
            .map_err(|e| StorageError::new(StorageErrorKind::FileWrite(e.to_string())))??;

        tracing::info!(size, "Persisted snapshot");
        Ok(())
    }
}

/// Write `data` to a uniquely named temp file beside `target`, then rename it
/// over `target`. Concurrent saves each get their own temp file.
fn replace_atomically(target: &Path, data: &[u8]) -> Result<(), StorageError> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(|e| {
        StorageError::new(StorageErrorKind::FileWrite(format!(
            "temp file in {}: {}",
            dir.display(),
            e
        )))
    })?;
    temp.write_all(data).map_err(|e| {
        StorageError::new(StorageErrorKind::FileWrite(format!(
            "{}: {}",
            temp.path().display(),
            e
        )))
    })?;

    temp.persist(target).map_err(|e| {
        StorageError::new(StorageErrorKind::FileWrite(format!(
            "rename {} to {}: {}",
            e.file.path().display(),
            target.display(),
            e.error
        )))
    })?;
    Ok(())
}
