//! Sync command implementation.

use super::{open_engine, print_outcome, CliResult};
use std::path::Path;

/// Runs startup reconciliation and prints the outcome.
pub fn run(settings_path: &Path) -> CliResult<()> {
    let (_, engine) = open_engine(settings_path)?;
    let outcome = engine.sync_on_startup();
    print_outcome(&outcome);
    Ok(())
}
