//! # tabsync Engine
//!
//! Synchronization and persistence engine for a tabbed rich-text notepad.
//!
//! This crate provides:
//! - [`SyncEngine`]: startup/refresh reconciliation and the save path
//! - [`RemoteStore`]: the HTTP tab server client, degrading every failure
//!   to "no remote data"
//! - [`HttpClient`] abstraction with a blocking [`ReqwestClient`] and a
//!   [`LoopbackClient`] for in-process servers
//! - [`ConnectivityMonitor`]: periodic reachability probe
//! - [`SyncConfig`] and the user-facing [`Settings`] file
//!
//! ## Architecture
//!
//! Local state is authoritative for availability, the version counter is
//! authoritative for ordering:
//! 1. Load the local snapshot (or an empty zero-version placeholder)
//! 2. Fetch the remote snapshot for the configured serial
//! 3. Let the [`ReconcileStrategy`] pick a side and persist the result
//!
//! Saves always land on disk first; the push to the server is best-effort.
//!
//! ## Key Invariants
//!
//! - Local version grows by exactly one per save
//! - A version is only lowered by adopting a foreign snapshot
//! - Network failures never escape the engine
//! - All entry points are serialized behind one lock
//!
//! [`ReconcileStrategy`]: tabsync_protocol::ReconcileStrategy

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod engine;
mod error;
mod http;
mod monitor;
mod remote;
mod transport;

pub use config::{Settings, SyncConfig, DEFAULT_LOCAL_FILE, DEFAULT_SERIAL, DEFAULT_SERVER_URL};
pub use engine::{SnapshotSource, SyncEngine, SyncOutcome, SyncState, SyncStats};
pub use error::{SyncError, SyncResult};
pub use http::{HttpClient, HttpMethod, HttpResponse, LoopbackClient, LoopbackServer, ReqwestClient};
pub use monitor::{ConnectivityMonitor, Probe};
pub use remote::RemoteStore;
pub use transport::{MockPush, MockTransport, RemoteTransport};
