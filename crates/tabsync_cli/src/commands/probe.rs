//! Probe command implementation.

use super::{open_engine, CliResult};
use std::path::Path;
use tabsync_engine::RemoteTransport;

/// Checks connectivity once. Fails when the server is unreachable.
pub fn run(settings_path: &Path) -> CliResult<()> {
    let (settings, engine) = open_engine(settings_path)?;
    if engine.probe() {
        println!("Connected to server {}", settings.server_url);
        return Ok(());
    }

    let reason = engine
        .remote()
        .last_error()
        .unwrap_or_else(|| "no response".to_string());
    Err(format!("Failed to connect to server {}: {reason}", settings.server_url).into())
}
