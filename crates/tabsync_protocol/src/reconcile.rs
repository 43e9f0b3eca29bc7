//! Choosing the authoritative snapshot between local and remote copies.
//!
//! The engine asks a [`ReconcileStrategy`] what to do and carries out the
//! answer against its stores; the strategy itself performs no I/O. The
//! default [`LastWriterWins`] compares the single version counter.

use crate::snapshot::DocumentSnapshot;
use std::cmp::Ordering;

/// What the engine should do with a pair of snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Both sides agree; keep local as is.
    InSync,
    /// Remote is newer; persist it locally and adopt it.
    AcceptRemote,
    /// Local is newer; push it and stamp the confirmed version.
    PushLocal,
    /// Remote belongs to another serial; overwrite local with it.
    AdoptForeign,
    /// Remote belongs to another serial; keep local untouched.
    RejectForeign,
}

impl Resolution {
    /// Returns true if the remote snapshot becomes the adopted one.
    pub fn adopts_remote(&self) -> bool {
        matches!(self, Resolution::AcceptRemote | Resolution::AdoptForeign)
    }

    /// Returns true if the serials did not match.
    pub fn is_foreign(&self) -> bool {
        matches!(self, Resolution::AdoptForeign | Resolution::RejectForeign)
    }
}

/// How to treat a remote snapshot that carries a different serial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForeignPolicy {
    /// Overwrite local state with the remote snapshot.
    #[default]
    Adopt,
    /// Leave local state untouched.
    KeepLocal,
}

/// Decides which side of a sync is authoritative.
pub trait ReconcileStrategy: Send + Sync {
    /// Resolves `local` against `remote`.
    ///
    /// The remote serial is expected in decoded (display) form.
    fn resolve(&self, local: &DocumentSnapshot, remote: &DocumentSnapshot) -> Resolution;
}

/// Last-writer-wins on the snapshot version.
#[derive(Debug, Clone, Copy, Default)]
pub struct LastWriterWins {
    foreign: ForeignPolicy,
}

impl LastWriterWins {
    /// Creates the strategy with the given foreign-serial policy.
    pub fn new(foreign: ForeignPolicy) -> Self {
        Self { foreign }
    }

    /// Returns the foreign-serial policy.
    pub fn foreign_policy(&self) -> ForeignPolicy {
        self.foreign
    }
}

impl ReconcileStrategy for LastWriterWins {
    fn resolve(&self, local: &DocumentSnapshot, remote: &DocumentSnapshot) -> Resolution {
        if local.serial != remote.serial {
            return match self.foreign {
                ForeignPolicy::Adopt => Resolution::AdoptForeign,
                ForeignPolicy::KeepLocal => Resolution::RejectForeign,
            };
        }

        match remote.version.cmp(&local.version) {
            Ordering::Greater => Resolution::AcceptRemote,
            Ordering::Less => Resolution::PushLocal,
            Ordering::Equal => Resolution::InSync,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(serial: &str, version: u64) -> DocumentSnapshot {
        DocumentSnapshot::placeholder(serial).with_version(version)
    }

    #[test]
    fn version_ordering() {
        let lww = LastWriterWins::default();
        assert_eq!(lww.resolve(&snap("a", 3), &snap("a", 5)), Resolution::AcceptRemote);
        assert_eq!(lww.resolve(&snap("a", 5), &snap("a", 3)), Resolution::PushLocal);
        assert_eq!(lww.resolve(&snap("a", 4), &snap("a", 4)), Resolution::InSync);
    }

    #[test]
    fn foreign_serial_ignores_versions() {
        let lww = LastWriterWins::default();
        let resolution = lww.resolve(&snap("A", 10), &snap("B", 1));
        assert_eq!(resolution, Resolution::AdoptForeign);
        assert!(resolution.adopts_remote());
        assert!(resolution.is_foreign());

        let keep = LastWriterWins::new(ForeignPolicy::KeepLocal);
        let resolution = keep.resolve(&snap("A", 10), &snap("B", 1));
        assert_eq!(resolution, Resolution::RejectForeign);
        assert!(!resolution.adopts_remote());
    }
}
