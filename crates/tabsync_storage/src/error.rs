//! Error types for storage operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The stored snapshot exists but cannot be parsed.
    #[error("local state corrupted at {path}: {message}")]
    Corrupted {
        /// Location of the unreadable state.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// The snapshot could not be serialized.
    #[error("serialization failed: {0}")]
    Serialize(String),
}

impl StorageError {
    /// Returns true if the stored state exists but is unreadable.
    pub fn is_corrupted(&self) -> bool {
        matches!(self, StorageError::Corrupted { .. })
    }
}
