//! Serials command implementation.

use super::{open_engine, CliResult};
use std::path::Path;

/// Merges remote serials with locally remembered ones, keeping first-seen
/// order and dropping duplicates.
pub fn merge(remote: Vec<String>, remembered: &[String]) -> Vec<String> {
    let mut merged = remote;
    for serial in remembered {
        if !merged.contains(serial) {
            merged.push(serial.clone());
        }
    }
    merged
}

/// Lists serials, marking the active one.
pub fn run(settings_path: &Path) -> CliResult<()> {
    let (settings, engine) = open_engine(settings_path)?;
    let remote = engine.list_remote_serials();
    if remote.is_empty() {
        println!("(server unreachable or empty, showing local serials)");
    }

    for serial in merge(remote, &settings.serials) {
        let marker = if serial == settings.serial { '*' } else { ' ' };
        println!("{marker} {serial}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_order_and_dedupes() {
        let merged = merge(
            vec!["b".into(), "a".into()],
            &["a".to_string(), "사무실".to_string()],
        );
        assert_eq!(merged, vec!["b", "a", "사무실"]);
    }
}
