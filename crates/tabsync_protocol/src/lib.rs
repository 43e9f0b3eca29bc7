//! # tabsync Protocol
//!
//! Snapshot model and wire messages for tabsync.
//!
//! This crate provides:
//! - [`DocumentSnapshot`], the unit of persistence and sync
//! - JSON messages exchanged with the tab server
//!   (`/load_tabs/`, `/save_tabs/`, `/list_serials/`)
//! - [`ReconcileStrategy`] and the default [`LastWriterWins`] policy
//!
//! This is a pure protocol crate with no I/O operations.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod messages;
mod reconcile;
mod snapshot;

pub use error::{ProtocolError, ProtocolResult};
pub use messages::{
    to_pretty_json, ListSerialsResponse, LoadTabsResponse, SaveTabsResponse, WireMessage,
};
pub use reconcile::{ForeignPolicy, LastWriterWins, ReconcileStrategy, Resolution};
pub use snapshot::{Document, DocumentSnapshot, DEFAULT_TITLE};
