//! Snapshot persistence error types.

/// Kinds of persistence errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// Failed to create the cache directory
    #[display("Failed to create storage directory: {}", _0)]
    DirectoryCreation(String),
    /// Failed to write file
    #[display("Failed to write file: {}", _0)]
    FileWrite(String),
    /// Failed to read file
    #[display("Failed to read file: {}", _0)]
    FileRead(String),
    /// Snapshot could not be encoded
    #[display("Failed to encode snapshot: {}", _0)]
    Encode(String),
    /// Persisted file is not a valid snapshot
    #[display("Failed to decode snapshot: {}", _0)]
    Decode(String),
}

/// Storage error with location tracking.
///
/// # Examples
///
/// ```
/// use herald_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::FileRead("/tmp/cache.json".to_string()));
/// assert!(format!("{}", err).contains("read"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The kind of error that occurred
    pub kind: StorageErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StorageError {
    /// Create a new storage error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
