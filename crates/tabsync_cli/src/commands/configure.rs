//! Configure command implementation.

use super::CliResult;
use std::path::{Path, PathBuf};
use tabsync_engine::Settings;

/// Settings to change; `None` leaves a field as is.
#[derive(Debug, Default)]
pub struct Changes {
    /// New serial.
    pub serial: Option<String>,
    /// New local snapshot file.
    pub local_file: Option<PathBuf>,
    /// New server URL.
    pub server_url: Option<String>,
    /// New timeout in seconds.
    pub timeout_secs: Option<u64>,
}

/// Applies `changes` to `settings` and checks the result.
pub fn apply(settings: &mut Settings, changes: Changes) -> CliResult<()> {
    if let Some(serial) = changes.serial {
        if serial.trim().is_empty() {
            return Err("serial must not be empty".into());
        }
        settings.apply_serial(serial);
    }
    if let Some(local_file) = changes.local_file {
        settings.local_file = local_file;
    }
    if let Some(server_url) = changes.server_url {
        settings.server_url = server_url.trim_end_matches('/').to_string();
    }
    if let Some(timeout_secs) = changes.timeout_secs {
        settings.timeout_secs = timeout_secs;
    }
    settings.to_config().validate()?;
    Ok(())
}

/// Updates the settings file and prints the result.
pub fn run(settings_path: &Path, changes: Changes) -> CliResult<()> {
    let mut settings = Settings::load(settings_path);
    apply(&mut settings, changes)?;
    settings.save(settings_path)?;

    println!("Serial: {}", settings.serial);
    println!("Local File: {}", settings.local_file.display());
    println!("Server URL: {}", settings.server_url);
    println!("Timeout: {}s", settings.timeout_secs);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_changes() {
        let mut settings = Settings::default();
        apply(
            &mut settings,
            Changes {
                serial: Some("laptop".into()),
                server_url: Some("http://10.0.0.5:9338/".into()),
                timeout_secs: Some(2),
                ..Changes::default()
            },
        )
        .unwrap();

        assert_eq!(settings.serial, "laptop");
        assert_eq!(settings.serials, vec!["laptop".to_string()]);
        assert_eq!(settings.server_url, "http://10.0.0.5:9338");
        assert_eq!(settings.timeout_secs, 2);
    }

    #[test]
    fn rejects_invalid_values() {
        let mut settings = Settings::default();
        let changes = Changes {
            serial: Some("  ".into()),
            ..Changes::default()
        };
        assert!(apply(&mut settings, changes).is_err());

        let changes = Changes {
            timeout_secs: Some(0),
            ..Changes::default()
        };
        assert!(apply(&mut settings, changes).is_err());
    }

    #[test]
    fn run_writes_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let changes = Changes {
            serial: Some("사무실".into()),
            ..Changes::default()
        };

        run(&path, changes).unwrap();
        assert_eq!(Settings::load(&path).serial, "사무실");
    }
}
