//! # tabsync Server
//!
//! Reference implementation of the tab server HTTP surface.
//!
//! This crate provides:
//! - `GET /load_tabs/{serial}`, `POST /save_tabs/`, `GET /list_serials/`
//! - In-memory snapshot storage keyed by serial
//! - Configurable version assignment on save
//!
//! The server is transport-agnostic: [`TabServer::route`] takes a method,
//! a path and a body and returns a status plus a JSON body. Tests wire it
//! to the engine's loopback HTTP client; a real deployment would put any
//! HTTP front end in front of it.
//!
//! ```
//! use tabsync_server::{ServerConfig, TabServer};
//!
//! let server = TabServer::new(ServerConfig::default());
//! let response = server.route("GET", "/list_serials/", &[]);
//! assert_eq!(response.status, 200);
//! assert_eq!(response.body, br#"{"serials":[]}"#);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod config;
mod error;
mod handler;
mod server;

pub use config::{ServerConfig, VersionPolicy};
pub use error::{ServerError, ServerResult};
pub use handler::{Route, ServerResponse};
pub use server::TabServer;
