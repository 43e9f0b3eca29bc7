//! Configuration for the sync engine.

use crate::error::{SyncError, SyncResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tabsync_protocol::{to_pretty_json, ForeignPolicy};
use tracing::{debug, warn};

/// Serial used when none has been configured.
pub const DEFAULT_SERIAL: &str = "default_serial";

/// Local snapshot file used when none has been configured.
pub const DEFAULT_LOCAL_FILE: &str = "tabs_data.json";

/// Tab server used when none has been configured.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:9338";

const DEFAULT_TIMEOUT_SECS: u64 = 5;
const DEFAULT_PROBE_INTERVAL_SECS: u64 = 10;

/// Immutable configuration of one engine instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Serial that scopes the remote document set.
    pub serial: String,
    /// Path of the local snapshot file.
    pub local_path: PathBuf,
    /// Base URL of the tab server.
    pub server_url: String,
    /// Upper bound for every remote call.
    pub timeout: Duration,
    /// Interval between connectivity probes.
    pub probe_interval: Duration,
    /// What to do when the server returns another serial's snapshot.
    pub foreign_policy: ForeignPolicy,
}

impl SyncConfig {
    /// Creates a new sync configuration.
    pub fn new(
        serial: impl Into<String>,
        local_path: impl Into<PathBuf>,
        server_url: impl Into<String>,
    ) -> Self {
        Self {
            serial: serial.into(),
            local_path: local_path.into(),
            server_url: server_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            probe_interval: Duration::from_secs(DEFAULT_PROBE_INTERVAL_SECS),
            foreign_policy: ForeignPolicy::default(),
        }
    }

    /// Sets the remote call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the connectivity probe interval.
    pub fn with_probe_interval(mut self, interval: Duration) -> Self {
        self.probe_interval = interval;
        self
    }

    /// Sets the foreign-serial policy.
    pub fn with_foreign_policy(mut self, policy: ForeignPolicy) -> Self {
        self.foreign_policy = policy;
        self
    }

    /// Checks the configuration for values the engine cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Config`] describing the first invalid field.
    pub fn validate(&self) -> SyncResult<()> {
        if !(self.server_url.starts_with("http://") || self.server_url.starts_with("https://")) {
            return Err(SyncError::Config(format!(
                "server url must start with http:// or https://: {:?}",
                self.server_url
            )));
        }
        if self.timeout.is_zero() {
            return Err(SyncError::Config("timeout must be greater than zero".into()));
        }
        if self.probe_interval.is_zero() {
            return Err(SyncError::Config(
                "probe interval must be greater than zero".into(),
            ));
        }
        if self.local_path.as_os_str().is_empty() {
            return Err(SyncError::Config("local file path is empty".into()));
        }
        Ok(())
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SERIAL, DEFAULT_LOCAL_FILE, DEFAULT_SERVER_URL)
    }
}

/// User-editable settings persisted next to the application.
///
/// A missing or unreadable settings file yields the defaults, so a broken
/// file never prevents startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Active serial.
    #[serde(default = "default_serial")]
    pub serial: String,
    /// Local snapshot file.
    #[serde(default = "default_local_file")]
    pub local_file: PathBuf,
    /// Tab server base URL.
    #[serde(default = "default_server_url")]
    pub server_url: String,
    /// Remote call timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Connectivity probe interval in seconds.
    #[serde(default = "default_probe_interval_secs")]
    pub probe_interval_secs: u64,
    /// Serials used on this machine before.
    #[serde(default)]
    pub serials: Vec<String>,
}

fn default_serial() -> String {
    DEFAULT_SERIAL.to_string()
}

fn default_local_file() -> PathBuf {
    PathBuf::from(DEFAULT_LOCAL_FILE)
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_probe_interval_secs() -> u64 {
    DEFAULT_PROBE_INTERVAL_SECS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            serial: default_serial(),
            local_file: default_local_file(),
            server_url: default_server_url(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            probe_interval_secs: DEFAULT_PROBE_INTERVAL_SECS,
            serials: Vec::new(),
        }
    }
}

impl Settings {
    /// Loads settings from `path`, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read(path) {
            Ok(data) => match serde_json::from_slice(&data) {
                Ok(settings) => settings,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "unreadable settings, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                debug!(path = %path.display(), error = %e, "no settings file, using defaults");
                Self::default()
            }
        }
    }

    /// Writes settings to `path` as indented UTF-8 JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> SyncResult<()> {
        let data = to_pretty_json(self)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, data)?;
        Ok(())
    }

    /// Makes `serial` the active serial and remembers it.
    pub fn apply_serial(&mut self, serial: impl Into<String>) {
        let serial = serial.into();
        if !self.serials.contains(&serial) {
            self.serials.push(serial.clone());
        }
        self.serial = serial;
    }

    /// Builds the engine configuration.
    pub fn to_config(&self) -> SyncConfig {
        SyncConfig::new(&self.serial, &self.local_file, &self.server_url)
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_probe_interval(Duration::from_secs(self.probe_interval_secs))
    }
}
