//! File-based local store.

use crate::backend::LocalStore;
use crate::error::{StorageError, StorageResult};
use parking_lot::Mutex;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tabsync_protocol::{to_pretty_json, DocumentSnapshot};
use tracing::{debug, info};

/// A JSON file holding the local snapshot.
///
/// The file is UTF-8, 4-space indented, with non-ASCII text kept literal.
///
/// # Durability
///
/// `write` never modifies the target in place:
/// 1. Write the new contents to a sibling temporary file
/// 2. Sync the temporary file to disk
/// 3. Rename it over the target
/// 4. Fsync the parent directory (unix)
///
/// A crash at any point leaves either the old or the new snapshot.
///
/// # Example
///
/// ```no_run
/// use tabsync_storage::{FileStore, LocalStore};
/// use std::path::Path;
///
/// let store = FileStore::new(Path::new("tabs_data.json"));
/// let version = store.read_version().unwrap();
/// ```
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Creates a store backed by the file at `path`.
    ///
    /// Nothing is touched on disk until the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the path to the snapshot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if a snapshot file exists.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "tabs_data.json".to_string());
        self.path.with_file_name(format!(".{name}.tmp"))
    }

    fn corrupted(&self, message: impl Into<String>) -> StorageError {
        StorageError::Corrupted {
            path: self.path.clone(),
            message: message.into(),
        }
    }

    #[cfg(unix)]
    fn sync_parent(&self) -> StorageResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            File::open(parent)?.sync_all()?;
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn sync_parent(&self) -> StorageResult<()> {
        // NTFS journals the rename; directories cannot be opened for sync
        Ok(())
    }
}

impl LocalStore for FileStore {
    fn read(&self) -> StorageResult<Option<DocumentSnapshot>> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no local snapshot");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        if data.iter().all(u8::is_ascii_whitespace) {
            return Err(self.corrupted("file is empty"));
        }

        let snapshot: DocumentSnapshot =
            serde_json::from_slice(&data).map_err(|e| self.corrupted(e.to_string()))?;
        Ok(Some(snapshot))
    }

    fn write(&self, snapshot: &DocumentSnapshot) -> StorageResult<()> {
        let data = to_pretty_json(snapshot).map_err(|e| StorageError::Serialize(e.to_string()))?;
        let _guard = self.write_lock.lock();

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let temp_path = self.temp_path();
        let mut file = File::create(&temp_path)?;
        file.write_all(&data)?;
        file.sync_all()?;
        drop(file);

        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }
        self.sync_parent()?;

        info!(
            path = %self.path.display(),
            version = snapshot.version,
            tabs = snapshot.documents.len(),
            "snapshot saved locally"
        );
        Ok(())
    }
}
