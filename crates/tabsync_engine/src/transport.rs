//! Remote transport abstraction.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tabsync_protocol::DocumentSnapshot;

/// The remote side of a sync.
///
/// Every operation already degrades: failures come back as `None`, an
/// empty list or `false`, and the reason is kept in
/// [`RemoteTransport::last_error`]. This lets the engine treat "server
/// unreachable" and "server has nothing" the same way.
pub trait RemoteTransport: Send + Sync {
    /// Fetches the snapshot stored for `serial`, with its serial decoded.
    fn fetch(&self, serial: &str) -> Option<DocumentSnapshot>;

    /// Pushes a snapshot and returns the version the server confirmed.
    fn push(&self, snapshot: &DocumentSnapshot) -> Option<u64>;

    /// Lists the serials the server holds, in display form.
    fn list_known_serials(&self) -> Vec<String>;

    /// Checks whether the server answers at all.
    fn probe(&self) -> bool;

    /// Returns the message of the most recent failure, cleared on success.
    fn last_error(&self) -> Option<String>;
}

/// How a [`MockTransport`] answers pushes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MockPush {
    /// Confirm the pushed version unchanged.
    #[default]
    Echo,
    /// Confirm a fixed version.
    Confirm(u64),
    /// Fail the push.
    Reject,
}

/// A mock transport for testing.
#[derive(Debug)]
pub struct MockTransport {
    connected: AtomicBool,
    remote: Mutex<Option<DocumentSnapshot>>,
    push_mode: Mutex<MockPush>,
    serials: Mutex<Vec<String>>,
    pushed: Mutex<Vec<DocumentSnapshot>>,
    last_error: Mutex<Option<String>>,
}

impl MockTransport {
    /// Creates a connected mock with no remote data.
    pub fn new() -> Self {
        Self {
            connected: AtomicBool::new(true),
            remote: Mutex::new(None),
            push_mode: Mutex::new(MockPush::Echo),
            serials: Mutex::new(Vec::new()),
            pushed: Mutex::new(Vec::new()),
            last_error: Mutex::new(None),
        }
    }

    /// Sets the snapshot returned by `fetch`.
    pub fn set_remote(&self, snapshot: Option<DocumentSnapshot>) {
        *self.remote.lock() = snapshot;
    }

    /// Returns the snapshot the mock currently holds.
    pub fn remote(&self) -> Option<DocumentSnapshot> {
        self.remote.lock().clone()
    }

    /// Sets how pushes are answered.
    pub fn set_push_mode(&self, mode: MockPush) {
        *self.push_mode.lock() = mode;
    }

    /// Sets the serials returned by `list_known_serials`.
    pub fn set_serials(&self, serials: Vec<String>) {
        *self.serials.lock() = serials;
    }

    /// Sets the connected state.
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    /// Returns every snapshot pushed so far.
    pub fn pushed(&self) -> Vec<DocumentSnapshot> {
        self.pushed.lock().clone()
    }

    fn is_connected(&self) -> bool {
        let connected = self.connected.load(Ordering::SeqCst);
        *self.last_error.lock() = (!connected).then(|| "not connected".to_string());
        connected
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteTransport for MockTransport {
    fn fetch(&self, _serial: &str) -> Option<DocumentSnapshot> {
        if !self.is_connected() {
            return None;
        }
        self.remote.lock().clone()
    }

    fn push(&self, snapshot: &DocumentSnapshot) -> Option<u64> {
        if !self.is_connected() {
            return None;
        }
        self.pushed.lock().push(snapshot.clone());

        let version = match *self.push_mode.lock() {
            MockPush::Echo => snapshot.version,
            MockPush::Confirm(version) => version,
            MockPush::Reject => {
                *self.last_error.lock() = Some("push rejected".into());
                return None;
            }
        };
        *self.remote.lock() = Some(snapshot.clone().with_version(version));
        Some(version)
    }

    fn list_known_serials(&self) -> Vec<String> {
        if !self.is_connected() {
            return Vec::new();
        }
        self.serials.lock().clone()
    }

    fn probe(&self) -> bool {
        self.is_connected()
    }

    fn last_error(&self) -> Option<String> {
        self.last_error.lock().clone()
    }
}

impl<T: RemoteTransport + ?Sized> RemoteTransport for std::sync::Arc<T> {
    fn fetch(&self, serial: &str) -> Option<DocumentSnapshot> {
        (**self).fetch(serial)
    }

    fn push(&self, snapshot: &DocumentSnapshot) -> Option<u64> {
        (**self).push(snapshot)
    }

    fn list_known_serials(&self) -> Vec<String> {
        (**self).list_known_serials()
    }

    fn probe(&self) -> bool {
        (**self).probe()
    }

    fn last_error(&self) -> Option<String> {
        (**self).last_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_transport_connection() {
        let transport = MockTransport::new();
        assert!(transport.probe());
        assert_eq!(transport.last_error(), None);

        transport.set_connected(false);
        assert!(!transport.probe());
        assert_eq!(transport.last_error().as_deref(), Some("not connected"));
    }

    #[test]
    fn mock_transport_disconnected_degrades() {
        let transport = MockTransport::new();
        transport.set_remote(Some(DocumentSnapshot::placeholder("a")));
        transport.set_serials(vec!["a".into()]);
        transport.set_connected(false);

        assert_eq!(transport.fetch("a"), None);
        assert_eq!(transport.push(&DocumentSnapshot::placeholder("a")), None);
        assert!(transport.list_known_serials().is_empty());
        assert!(transport.pushed().is_empty());
    }

    #[test]
    fn mock_transport_push_modes() {
        let transport = MockTransport::new();
        let snapshot = DocumentSnapshot::placeholder("a").with_version(5);

        assert_eq!(transport.push(&snapshot), Some(5));
        transport.set_push_mode(MockPush::Confirm(6));
        assert_eq!(transport.push(&snapshot), Some(6));
        assert_eq!(transport.remote().unwrap().version, 6);

        transport.set_push_mode(MockPush::Reject);
        assert_eq!(transport.push(&snapshot), None);
        assert_eq!(transport.pushed().len(), 3);
    }
}
