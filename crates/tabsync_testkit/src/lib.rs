//! # tabsync Testkit
//!
//! Test utilities for tabsync.
//!
//! This crate provides:
//! - Temporary workspaces and sample snapshots
//! - Property-based test generators using proptest
//! - A loopback harness wiring engines to an in-process tab server
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tabsync_testkit::prelude::*;
//!
//! #[test]
//! fn two_devices_share_a_serial() {
//!     let harness = LoopbackHarness::new();
//!     let laptop = harness.engine("laptop.json", "desk");
//!     let desktop = harness.engine("desktop.json", "desk");
//!     // ...
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod integration;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::integration::*;
}

pub use fixtures::*;
pub use generators::*;
pub use integration::*;
