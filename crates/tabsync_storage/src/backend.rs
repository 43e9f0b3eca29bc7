//! Local store trait definition.

use crate::error::StorageResult;
use tabsync_protocol::DocumentSnapshot;

/// Durable home of the local snapshot.
///
/// # Invariants
///
/// - `read` returns exactly the snapshot most recently passed to `write`
/// - `read` returns `Ok(None)` only when nothing has ever been written
/// - unreadable state is reported as [`crate::StorageError::Corrupted`]
/// - stores must be `Send + Sync`; the engine serializes access itself
pub trait LocalStore: Send + Sync {
    /// Reads the stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the state exists but cannot be read or parsed.
    fn read(&self) -> StorageResult<Option<DocumentSnapshot>>;

    /// Replaces the stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be serialized or written.
    fn write(&self, snapshot: &DocumentSnapshot) -> StorageResult<()>;

    /// Returns the stored version, or 0 when nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the state exists but cannot be read or parsed.
    fn read_version(&self) -> StorageResult<u64> {
        Ok(self.read()?.map_or(0, |snapshot| snapshot.version))
    }
}

impl<S: LocalStore + ?Sized> LocalStore for std::sync::Arc<S> {
    fn read(&self) -> StorageResult<Option<DocumentSnapshot>> {
        (**self).read()
    }

    fn write(&self, snapshot: &DocumentSnapshot) -> StorageResult<()> {
        (**self).write(snapshot)
    }

    fn read_version(&self) -> StorageResult<u64> {
        (**self).read_version()
    }
}
