//! Sync engine: reconciliation and the save path.

use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::http::ReqwestClient;
use crate::remote::RemoteStore;
use crate::transport::RemoteTransport;
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::time::Instant;
use tabsync_codec::{inline_buffer, RichTextBuffer};
use tabsync_protocol::{
    Document, DocumentSnapshot, LastWriterWins, ReconcileStrategy, Resolution,
};
use tabsync_storage::{FileStore, LocalStore};
use tracing::{debug, info, warn};

/// The current state of the sync engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// No operation has run yet.
    Idle,
    /// Reading the local snapshot.
    Loading,
    /// Fetching the remote snapshot.
    Fetching,
    /// Pushing a snapshot to the server.
    Pushing,
    /// Last operation completed without warnings.
    Synced,
    /// Last operation completed with warnings (offline, corrupt file, ...).
    Degraded,
}

impl SyncState {
    /// Returns true if an operation is in progress.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            SyncState::Loading | SyncState::Fetching | SyncState::Pushing
        )
    }
}

/// Statistics about sync operations.
#[derive(Debug, Clone, Default)]
pub struct SyncStats {
    /// Startup and refresh reconciliations run.
    pub reconciliations: u64,
    /// Saves that reached local storage.
    pub saves: u64,
    /// Times a newer remote snapshot was adopted.
    pub remote_adoptions: u64,
    /// Pushes the server confirmed.
    pub pushes_confirmed: u64,
    /// Pushes that got no confirmation.
    pub pushes_failed: u64,
    /// Remote snapshots that carried another serial.
    pub foreign_conflicts: u64,
    /// Completion time of the last operation.
    pub last_sync_time: Option<Instant>,
    /// Last warning reported.
    pub last_error: Option<String>,
}

/// Where the snapshot returned by an operation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotSource {
    /// Local snapshot, unchanged.
    Local,
    /// Newer remote snapshot, now persisted locally.
    Remote,
    /// Local snapshot, pushed and stamped with the confirmed version.
    LocalPushed,
    /// Snapshot of another serial, now persisted locally.
    Foreign,
    /// Nothing stored anywhere; empty zero-version set.
    Placeholder,
    /// Local state unreadable and no usable remote; empty set.
    Fallback,
}

/// Result of a reconciliation or save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Snapshot the caller should display, active index clamped.
    pub snapshot: DocumentSnapshot,
    /// Where `snapshot` came from.
    pub source: SnapshotSource,
    /// One-line human readable summary.
    pub status: String,
    /// Conditions the engine recovered from.
    pub warnings: Vec<String>,
}

impl SyncOutcome {
    /// Returns true if the operation had to degrade.
    pub fn is_degraded(&self) -> bool {
        !self.warnings.is_empty()
    }
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.status)?;
        for warning in &self.warnings {
            write!(f, "\n  warning: {warning}")?;
        }
        Ok(())
    }
}

/// Keeps a local snapshot and a remote serial in step.
///
/// Every public operation takes the same internal lock, so a connectivity
/// timer and a user-triggered save never interleave.
pub struct SyncEngine<L: LocalStore, T: RemoteTransport> {
    config: SyncConfig,
    local: L,
    remote: T,
    strategy: Box<dyn ReconcileStrategy>,
    gate: Mutex<()>,
    state: RwLock<SyncState>,
    stats: RwLock<SyncStats>,
}

impl SyncEngine<FileStore, RemoteStore<ReqwestClient>> {
    /// Creates an engine over the configured JSON file and HTTP server.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Config`] if the configuration is invalid.
    pub fn open(config: SyncConfig) -> SyncResult<Self> {
        config.validate()?;
        let local = FileStore::new(&config.local_path);
        let remote = RemoteStore::connect(&config)?;
        info!(
            serial = %config.serial,
            local = %config.local_path.display(),
            server = %remote.base_url(),
            "sync engine opened"
        );
        Ok(Self::new(config, local, remote))
    }
}

impl<L: LocalStore, T: RemoteTransport> SyncEngine<L, T> {
    /// Creates an engine using last-writer-wins reconciliation.
    pub fn new(config: SyncConfig, local: L, remote: T) -> Self {
        let strategy = LastWriterWins::new(config.foreign_policy);
        Self {
            config,
            local,
            remote,
            strategy: Box::new(strategy),
            gate: Mutex::new(()),
            state: RwLock::new(SyncState::Idle),
            stats: RwLock::new(SyncStats::default()),
        }
    }

    /// Replaces the reconciliation strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: impl ReconcileStrategy + 'static) -> Self {
        self.strategy = Box::new(strategy);
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Returns the local store.
    pub fn local(&self) -> &L {
        &self.local
    }

    /// Returns the remote transport.
    pub fn remote(&self) -> &T {
        &self.remote
    }

    /// Gets the current state.
    pub fn state(&self) -> SyncState {
        *self.state.read()
    }

    /// Gets the current stats.
    pub fn stats(&self) -> SyncStats {
        self.stats.read().clone()
    }

    /// Reconciles local and remote state when the application starts.
    pub fn sync_on_startup(&self) -> SyncOutcome {
        self.reconcile("startup")
    }

    /// Reconciles again, e.g. on a timer tick or user request.
    pub fn refresh(&self) -> SyncOutcome {
        self.reconcile("refresh")
    }

    /// Saves a new document set.
    ///
    /// The snapshot is written locally with the next version before any
    /// network call. A failed push is reported as a warning and never
    /// undoes the local write.
    ///
    /// # Errors
    ///
    /// Returns an error only if the local write fails.
    pub fn save(&self, documents: Vec<Document>, active_index: i64) -> SyncResult<SyncOutcome> {
        let _gate = self.gate.lock();
        self.set_state(SyncState::Loading);
        let mut warnings = Vec::new();

        let base = match self.local.read_version() {
            Ok(version) => version,
            Err(e) => {
                let e = SyncError::from(e);
                warn!(error = %e, "local version unreadable, saving as version 1");
                warnings.push(e.to_string());
                0
            }
        };

        let mut snapshot = DocumentSnapshot::new(
            self.config.serial.as_str(),
            documents,
            active_index,
            base.saturating_add(1),
        );
        if let Err(e) = self.local.write(&snapshot) {
            self.set_state(SyncState::Degraded);
            self.stats.write().last_error = Some(e.to_string());
            return Err(e.into());
        }
        self.stats.write().saves += 1;
        debug!(version = snapshot.version, tabs = snapshot.documents.len(), "saved locally");

        let source = if self.push_and_stamp(&mut snapshot, &mut warnings) {
            SnapshotSource::LocalPushed
        } else {
            SnapshotSource::Local
        };
        Ok(self.finish("save", snapshot, source, warnings))
    }

    /// Saves rich-text buffers, inlining their in-memory images first.
    ///
    /// # Errors
    ///
    /// Returns an error only if the local write fails.
    pub fn save_buffers<B: RichTextBuffer>(
        &self,
        buffers: &[(String, B)],
        active_index: i64,
    ) -> SyncResult<SyncOutcome> {
        let documents = buffers
            .iter()
            .map(|(title, buffer)| Document::new(title.as_str(), inline_buffer(buffer)))
            .collect();
        self.save(documents, active_index)
    }

    /// Lists the serials known to the server; empty when offline.
    pub fn list_remote_serials(&self) -> Vec<String> {
        let _gate = self.gate.lock();
        self.remote.list_known_serials()
    }

    /// Checks whether the server is reachable.
    pub fn probe(&self) -> bool {
        let _gate = self.gate.lock();
        let reachable = self.remote.probe();
        debug!(reachable, "connectivity probe");
        reachable
    }

    /// Reads the local snapshot without contacting the server.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::CorruptLocalState`] if the stored state is
    /// unreadable.
    pub fn local_snapshot(&self) -> SyncResult<Option<DocumentSnapshot>> {
        let _gate = self.gate.lock();
        Ok(self.local.read()?)
    }

    fn set_state(&self, state: SyncState) {
        *self.state.write() = state;
    }

    fn reconcile(&self, trigger: &'static str) -> SyncOutcome {
        let _gate = self.gate.lock();
        self.set_state(SyncState::Loading);
        self.stats.write().reconciliations += 1;
        let mut warnings = Vec::new();

        let (mut local, local_source) = match self.local.read() {
            Ok(Some(snapshot)) => (snapshot, SnapshotSource::Local),
            Ok(None) => (
                DocumentSnapshot::placeholder(self.config.serial.as_str()),
                SnapshotSource::Placeholder,
            ),
            Err(e) => {
                let e = SyncError::from(e);
                warn!(error = %e, "local state unreadable, starting from an empty set");
                warnings.push(e.to_string());
                (
                    DocumentSnapshot::placeholder(self.config.serial.as_str()),
                    SnapshotSource::Fallback,
                )
            }
        };

        self.set_state(SyncState::Fetching);
        let Some(remote) = self.remote.fetch(&self.config.serial) else {
            if let Some(error) = self.remote.last_error() {
                warnings.push(error);
            }
            return self.finish(trigger, local, local_source, warnings);
        };

        let mut resolution = self.strategy.resolve(&local, &remote);
        if resolution == Resolution::InSync
            && local_source == SnapshotSource::Placeholder
            && !remote.is_empty()
        {
            // Nothing stored yet, so any remote content wins at version 0
            resolution = Resolution::AcceptRemote;
        }
        debug!(
            ?resolution,
            local_version = local.version,
            remote_version = remote.version,
            "reconciling"
        );

        if resolution.is_foreign() {
            let conflict = SyncError::ForeignSerialConflict {
                local: local.serial.clone(),
                remote: remote.serial.clone(),
            };
            warn!(error = %conflict, ?resolution, "remote snapshot has another serial");
            warnings.push(conflict.to_string());
            self.stats.write().foreign_conflicts += 1;
        }

        match resolution {
            Resolution::InSync | Resolution::RejectForeign => {
                self.finish(trigger, local, local_source, warnings)
            }
            Resolution::AcceptRemote | Resolution::AdoptForeign => {
                self.persist(&remote, &mut warnings);
                let source = if resolution == Resolution::AcceptRemote {
                    self.stats.write().remote_adoptions += 1;
                    SnapshotSource::Remote
                } else {
                    SnapshotSource::Foreign
                };
                self.finish(trigger, remote, source, warnings)
            }
            Resolution::PushLocal if local_source == SnapshotSource::Fallback => {
                // Never publish the empty stand-in for an unreadable file
                self.finish(trigger, local, local_source, warnings)
            }
            Resolution::PushLocal => {
                let source = if self.push_and_stamp(&mut local, &mut warnings) {
                    SnapshotSource::LocalPushed
                } else {
                    local_source
                };
                self.finish(trigger, local, source, warnings)
            }
        }
    }

    /// Pushes `snapshot` and stamps a higher confirmed version into it and
    /// into local storage. Returns whether the server confirmed.
    ///
    /// A confirmation below the pushed version is treated as a rejection and
    /// the local version is kept.
    fn push_and_stamp(&self, snapshot: &mut DocumentSnapshot, warnings: &mut Vec<String>) -> bool {
        self.set_state(SyncState::Pushing);
        let reason = match self.remote.push(snapshot) {
            Some(confirmed) if confirmed >= snapshot.version => {
                self.stats.write().pushes_confirmed += 1;
                if confirmed > snapshot.version {
                    debug!(
                        pushed = snapshot.version,
                        confirmed, "stamping server-confirmed version"
                    );
                    snapshot.version = confirmed;
                    self.persist(snapshot, warnings);
                }
                return true;
            }
            Some(confirmed) => format!("server confirmed lower version {confirmed}"),
            None => self
                .remote
                .last_error()
                .unwrap_or_else(|| "no confirmation from server".to_string()),
        };

        self.stats.write().pushes_failed += 1;
        let rejected = SyncError::VersionPushRejected {
            version: snapshot.version,
            reason,
        };
        warn!(error = %rejected, "push failed, local copy kept");
        warnings.push(rejected.to_string());
        false
    }

    fn persist(&self, snapshot: &DocumentSnapshot, warnings: &mut Vec<String>) {
        if let Err(e) = self.local.write(snapshot) {
            warn!(error = %e, version = snapshot.version, "failed to persist snapshot locally");
            warnings.push(e.to_string());
        }
    }

    fn finish(
        &self,
        trigger: &str,
        mut snapshot: DocumentSnapshot,
        source: SnapshotSource,
        warnings: Vec<String>,
    ) -> SyncOutcome {
        snapshot.clamp_active_index();
        let status = format!("{trigger}: {}", describe(source, &snapshot));

        {
            let mut stats = self.stats.write();
            stats.last_sync_time = Some(Instant::now());
            if let Some(last) = warnings.last() {
                stats.last_error = Some(last.clone());
            }
        }
        self.set_state(if warnings.is_empty() {
            SyncState::Synced
        } else {
            SyncState::Degraded
        });

        info!(
            %status,
            tabs = snapshot.documents.len(),
            warnings = warnings.len(),
            "sync finished"
        );
        SyncOutcome {
            snapshot,
            source,
            status,
            warnings,
        }
    }
}

fn describe(source: SnapshotSource, snapshot: &DocumentSnapshot) -> String {
    let version = snapshot.version;
    match source {
        SnapshotSource::Local => format!("kept local version {version}"),
        SnapshotSource::Remote => format!("adopted server version {version}"),
        SnapshotSource::LocalPushed => format!("server confirmed version {version}"),
        SnapshotSource::Foreign => format!(
            "adopted version {version} of serial {:?}",
            snapshot.serial
        ),
        SnapshotSource::Placeholder => "nothing stored yet, starting empty".to_string(),
        SnapshotSource::Fallback => "local state unreadable, starting empty".to_string(),
    }
}
