//! Error types for the sync engine.

use std::path::PathBuf;
use tabsync_protocol::ProtocolError;
use tabsync_storage::StorageError;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur during sync operations.
///
/// Remote-facing variants never reach callers of the engine's public
/// operations; they are converted into degraded outcomes at the remote
/// store boundary and reported as warnings.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Network failure or non-success HTTP status.
    #[error("remote unavailable: {message}")]
    RemoteUnavailable {
        /// Error message.
        message: String,
        /// Whether the operation can be retried.
        retryable: bool,
    },

    /// A remote call exceeded the configured timeout.
    #[error("remote operation timed out")]
    Timeout,

    /// The local snapshot exists but cannot be parsed.
    #[error("corrupt local state at {path}: {message}")]
    CorruptLocalState {
        /// Location of the unreadable state.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// The remote snapshot belongs to a different serial.
    #[error("remote data belongs to serial {remote:?}, local serial is {local:?}")]
    ForeignSerialConflict {
        /// Serial of the local snapshot.
        local: String,
        /// Serial reported by the server.
        remote: String,
    },

    /// The server did not accept a pushed snapshot.
    #[error("push of version {version} was not accepted: {reason}")]
    VersionPushRejected {
        /// Version that was pushed.
        version: u64,
        /// Why the push failed.
        reason: String,
    },

    /// Malformed message on the wire.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Local storage failure other than corruption.
    #[error("storage error: {0}")]
    Storage(StorageError),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error outside the snapshot store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StorageError> for SyncError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Corrupted { path, message } => {
                SyncError::CorruptLocalState { path, message }
            }
            other => SyncError::Storage(other),
        }
    }
}

impl SyncError {
    /// Creates a retryable remote error.
    pub fn remote_retryable(message: impl Into<String>) -> Self {
        Self::RemoteUnavailable {
            message: message.into(),
            retryable: true,
        }
    }

    /// Creates a non-retryable remote error.
    pub fn remote_fatal(message: impl Into<String>) -> Self {
        Self::RemoteUnavailable {
            message: message.into(),
            retryable: false,
        }
    }

    /// Returns true if this error can be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::RemoteUnavailable { retryable, .. } => *retryable,
            SyncError::Timeout => true,
            _ => false,
        }
    }

    /// Returns true if the engine recovers from this error by degrading.
    pub fn is_degraded(&self) -> bool {
        matches!(
            self,
            SyncError::RemoteUnavailable { .. }
                | SyncError::Timeout
                | SyncError::CorruptLocalState { .. }
                | SyncError::ForeignSerialConflict { .. }
                | SyncError::VersionPushRejected { .. }
                | SyncError::Protocol(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_errors() {
        assert!(SyncError::remote_retryable("connection refused").is_retryable());
        assert!(!SyncError::remote_fatal("HTTP 404").is_retryable());
        assert!(SyncError::Timeout.is_retryable());
        assert!(!SyncError::Config("bad url".into()).is_retryable());
    }

    #[test]
    fn corruption_maps_from_storage() {
        let err: SyncError = StorageError::Corrupted {
            path: PathBuf::from("tabs_data.json"),
            message: "EOF".into(),
        }
        .into();
        assert!(matches!(err, SyncError::CorruptLocalState { .. }));
        assert!(err.is_degraded());

        let err: SyncError = StorageError::Serialize("boom".into()).into();
        assert!(matches!(err, SyncError::Storage(_)));
        assert!(!err.is_degraded());
    }

    #[test]
    fn error_display() {
        let err = SyncError::ForeignSerialConflict {
            local: "A".into(),
            remote: "B".into(),
        };
        assert!(err.to_string().contains("\"B\""));

        let err = SyncError::VersionPushRejected {
            version: 6,
            reason: "HTTP 500".into(),
        };
        assert_eq!(err.to_string(), "push of version 6 was not accepted: HTTP 500");
    }
}
