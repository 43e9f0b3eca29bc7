//! Test fixtures.
//!
//! Temporary directories for on-disk state and a few canned snapshots.

use std::path::{Path, PathBuf};
use tabsync_protocol::{Document, DocumentSnapshot};
use tabsync_storage::FileStore;
use tempfile::TempDir;

/// A temporary directory holding local snapshot and settings files.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates an empty workspace.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Returns the workspace root.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Returns the path of a file inside the workspace.
    pub fn path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    /// Returns a file store for `name` inside the workspace.
    pub fn store(&self, name: &str) -> FileStore {
        FileStore::new(self.path(name))
    }

    /// Writes raw bytes to `name`, e.g. to plant a corrupt snapshot.
    pub fn write_raw(&self, name: &str, contents: impl AsRef<[u8]>) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, contents).expect("Failed to write fixture file");
        path
    }

    /// Reads `name` as UTF-8.
    pub fn read_to_string(&self, name: &str) -> String {
        std::fs::read_to_string(self.path(name)).expect("Failed to read fixture file")
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Sample documents and snapshots.
pub mod samples {
    use super::*;

    /// `n` short HTML documents titled "tab 0", "tab 1", ...
    pub fn documents(n: usize) -> Vec<Document> {
        (0..n)
            .map(|i| Document::new(format!("tab {i}"), format!("<p>note {i}</p>")))
            .collect()
    }

    /// A two-document snapshot for `serial` at `version`.
    pub fn snapshot(serial: &str, version: u64) -> DocumentSnapshot {
        DocumentSnapshot::new(serial, documents(2), 1, version)
    }

    /// A snapshot with non-ASCII titles, content and serial.
    pub fn korean_snapshot(version: u64) -> DocumentSnapshot {
        DocumentSnapshot::new(
            "사무실",
            vec![
                Document::new("회의록", "<p>안녕하세요</p>"),
                Document::new("할 일", "<ul><li>저장</li></ul>"),
            ],
            0,
            version,
        )
    }

    /// The smallest valid PNG: a 1x1 transparent pixel.
    pub fn tiny_png() -> Vec<u8> {
        vec![
            0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48,
            0x44, 0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00,
            0x00, 0x1f, 0x15, 0xc4, 0x89, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x44, 0x41, 0x54, 0x78,
            0x9c, 0x63, 0x00, 0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0d, 0x0a, 0x2d, 0xb4, 0x00,
            0x00, 0x00, 0x00, 0x49, 0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
        ]
    }
}
