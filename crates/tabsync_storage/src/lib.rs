//! # tabsync Storage
//!
//! Local snapshot store for tabsync.
//!
//! A local store holds exactly one [`DocumentSnapshot`]: the full document
//! set of the configured serial. It distinguishes "nothing stored yet"
//! (first run, `Ok(None)`) from "stored state is unreadable"
//! ([`StorageError::Corrupted`]) so callers can warn on the latter without
//! treating first run as an error.
//!
//! ## Available Stores
//!
//! - [`FileStore`] - Pretty-printed JSON file, replaced atomically on write
//! - [`InMemoryStore`] - For testing and ephemeral use
//!
//! ## Example
//!
//! ```rust
//! use tabsync_storage::{InMemoryStore, LocalStore};
//! use tabsync_protocol::DocumentSnapshot;
//!
//! let store = InMemoryStore::new();
//! assert_eq!(store.read_version().unwrap(), 0);
//!
//! store.write(&DocumentSnapshot::placeholder("desk").with_version(2)).unwrap();
//! assert_eq!(store.read_version().unwrap(), 2);
//! ```
//!
//! [`DocumentSnapshot`]: tabsync_protocol::DocumentSnapshot

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;

pub use backend::LocalStore;
pub use error::{StorageError, StorageResult};
pub use file::FileStore;
pub use memory::InMemoryStore;
