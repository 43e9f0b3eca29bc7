//! CLI command implementations.

pub mod configure;
pub mod probe;
pub mod save;
pub mod serials;
pub mod show;
pub mod sync;
pub mod watch;

use std::path::Path;
use tabsync_engine::{ReqwestClient, RemoteStore, Settings, SyncEngine, SyncOutcome};
use tabsync_storage::FileStore;

/// Result type shared by all commands.
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Engine over the configured file and HTTP server.
pub type Engine = SyncEngine<FileStore, RemoteStore<ReqwestClient>>;

/// Loads settings and opens an engine for them.
pub fn open_engine(settings_path: &Path) -> CliResult<(Settings, Engine)> {
    let settings = Settings::load(settings_path);
    let engine = SyncEngine::open(settings.to_config())?;
    Ok((settings, engine))
}

/// Prints an outcome and its warnings.
pub fn print_outcome(outcome: &SyncOutcome) {
    println!("{outcome}");
    println!(
        "  serial {:?}, version {}, {} document(s)",
        outcome.snapshot.serial,
        outcome.snapshot.version,
        outcome.snapshot.documents.len()
    );
}
