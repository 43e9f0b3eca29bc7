//! In-memory local store for testing.

use crate::backend::LocalStore;
use crate::error::{StorageError, StorageResult};
use parking_lot::RwLock;
use std::path::PathBuf;
use tabsync_protocol::DocumentSnapshot;

/// An in-memory local store.
///
/// Data is lost when the store is dropped. A store can be put into a
/// corrupted state to exercise the recovery paths of callers.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    snapshot: RwLock<Option<DocumentSnapshot>>,
    corrupted: RwLock<Option<String>>,
    writes: RwLock<u64>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `snapshot`.
    #[must_use]
    pub fn with_snapshot(snapshot: DocumentSnapshot) -> Self {
        let store = Self::new();
        *store.snapshot.write() = Some(snapshot);
        store
    }

    /// Makes subsequent reads fail as corrupted until the next write.
    pub fn corrupt(&self, message: impl Into<String>) {
        *self.corrupted.write() = Some(message.into());
    }

    /// Returns the stored snapshot without going through the trait.
    pub fn snapshot(&self) -> Option<DocumentSnapshot> {
        self.snapshot.read().clone()
    }

    /// Returns how many writes have been performed.
    pub fn write_count(&self) -> u64 {
        *self.writes.read()
    }
}

impl LocalStore for InMemoryStore {
    fn read(&self) -> StorageResult<Option<DocumentSnapshot>> {
        if let Some(message) = self.corrupted.read().clone() {
            return Err(StorageError::Corrupted {
                path: PathBuf::from(":memory:"),
                message,
            });
        }
        Ok(self.snapshot.read().clone())
    }

    fn write(&self, snapshot: &DocumentSnapshot) -> StorageResult<()> {
        *self.snapshot.write() = Some(snapshot.clone());
        *self.corrupted.write() = None;
        *self.writes.write() += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_lifecycle() {
        let store = InMemoryStore::new();
        assert_eq!(store.read().unwrap(), None);
        assert_eq!(store.write_count(), 0);

        let snapshot = DocumentSnapshot::placeholder("a").with_version(3);
        store.write(&snapshot).unwrap();
        assert_eq!(store.read().unwrap(), Some(snapshot));
        assert_eq!(store.read_version().unwrap(), 3);
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn corruption_until_next_write() {
        let store = InMemoryStore::with_snapshot(DocumentSnapshot::placeholder("a"));
        store.corrupt("bad json");
        assert!(store.read().unwrap_err().is_corrupted());

        store.write(&DocumentSnapshot::placeholder("a")).unwrap();
        assert!(store.read().is_ok());
    }
}
