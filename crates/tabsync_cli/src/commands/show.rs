//! Show command implementation.

use super::CliResult;
use std::path::Path;
use tabsync_engine::Settings;
use tabsync_protocol::{to_pretty_json, DocumentSnapshot};
use tabsync_storage::{FileStore, LocalStore};

/// Renders a snapshot as a short human-readable listing.
pub fn render_text(snapshot: &DocumentSnapshot) -> String {
    let mut out = format!(
        "serial: {}\nversion: {}\nactive: {}\n",
        snapshot.serial, snapshot.version, snapshot.active_index
    );
    let active = snapshot.active_index_clamped();
    for (i, document) in snapshot.documents.iter().enumerate() {
        let marker = if i == active { '*' } else { ' ' };
        out.push_str(&format!(
            "{marker} [{i}] {} ({} bytes)\n",
            document.title,
            document.content.len()
        ));
    }
    out
}

/// Prints the local snapshot without contacting the server.
pub fn run(settings_path: &Path, format: &str) -> CliResult<()> {
    let settings = Settings::load(settings_path);
    let store = FileStore::new(&settings.local_file);
    let snapshot = store
        .read()?
        .ok_or_else(|| format!("No local snapshot at {}", settings.local_file.display()))?;

    match format {
        "json" => println!("{}", String::from_utf8(to_pretty_json(&snapshot)?)?),
        "text" => print!("{}", render_text(&snapshot)),
        other => return Err(format!("Unknown format: {other}").into()),
    }
    Ok(())
}
