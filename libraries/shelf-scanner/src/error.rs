//! Error types for the scanner

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ScanError`
pub type Result<T> = std::result::Result<T, ScanError>;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Library root not found: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("Library root is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Storage error: {0}")]
    Storage(#[from] shelf_storage::StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scan worker failed: {0}")]
    Worker(String),
}

impl From<ScanError> for shelf_core::ShelfError {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::Io(e) => shelf_core::ShelfError::Io(e),
            e @ (ScanError::RootNotFound(_) | ScanError::NotADirectory(_)) => {
                shelf_core::ShelfError::invalid_input(e.to_string())
            }
            other => shelf_core::ShelfError::storage(other.to_string()),
        }
    }
}
