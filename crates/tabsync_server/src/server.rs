//! The tab server.

use crate::config::{ServerConfig, VersionPolicy};
use crate::error::{ServerError, ServerResult};
use crate::handler::{Route, ServerResponse};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tabsync_codec::{decode_serial, encode_serial};
use tabsync_protocol::{
    DocumentSnapshot, ListSerialsResponse, LoadTabsResponse, SaveTabsResponse, WireMessage,
};
use tracing::{debug, info, warn};

/// The tab server.
///
/// Holds the latest snapshot per serial. Serials are stored in display
/// form and leave the server percent-encoded, both in the serial list and
/// in the `serial` field of loaded snapshots.
///
/// # Example
///
/// ```
/// use tabsync_server::{ServerConfig, TabServer};
/// use tabsync_protocol::{DocumentSnapshot, WireMessage};
///
/// let server = TabServer::new(ServerConfig::default());
/// let body = DocumentSnapshot::placeholder("desk/01").with_version(3).encode().unwrap();
/// assert_eq!(server.route("POST", "/save_tabs/", &body).status, 200);
///
/// let response = server.route("GET", "/load_tabs/desk%2F01", &[]);
/// assert_eq!(response.status, 200);
/// ```
pub struct TabServer {
    config: ServerConfig,
    snapshots: RwLock<BTreeMap<String, DocumentSnapshot>>,
}

impl TabServer {
    /// Creates an empty server.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            snapshots: RwLock::new(BTreeMap::new()),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Stores a snapshot directly, bypassing version assignment.
    pub fn insert(&self, snapshot: DocumentSnapshot) {
        self.snapshots
            .write()
            .insert(snapshot.serial.clone(), snapshot);
    }

    /// Returns the stored snapshot for a display-form serial.
    pub fn snapshot(&self, serial: &str) -> Option<DocumentSnapshot> {
        self.snapshots.read().get(serial).cloned()
    }

    /// Returns the number of stored serials.
    pub fn serial_count(&self) -> usize {
        self.snapshots.read().len()
    }

    /// Dispatches a request and turns errors into JSON error responses.
    pub fn route(&self, method: &str, path: &str, body: &[u8]) -> ServerResponse {
        let result = Route::parse(method, path).and_then(|route| self.dispatch(route, body));
        match result {
            Ok(body) => ServerResponse::ok(body),
            Err(e) => {
                if e.is_client_error() {
                    debug!(method, path, error = %e, "request rejected");
                } else {
                    warn!(method, path, error = %e, "request failed");
                }
                ServerResponse::error(&e)
            }
        }
    }

    fn dispatch(&self, route: Route, body: &[u8]) -> ServerResult<Vec<u8>> {
        let response = match route {
            Route::LoadTabs(token) => self.handle_load(&token)?.encode(),
            Route::SaveTabs => self.handle_save(body)?.encode(),
            Route::ListSerials => self.handle_list().encode(),
        };
        response.map_err(|e| ServerError::Internal(e.to_string()))
    }

    /// Handles `GET /load_tabs/{token}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is malformed or the serial is unknown.
    pub fn handle_load(&self, token: &str) -> ServerResult<LoadTabsResponse> {
        let serial =
            decode_serial(token).map_err(|e| ServerError::InvalidRequest(e.to_string()))?;
        let mut snapshot = self
            .snapshot(&serial)
            .ok_or(ServerError::UnknownSerial(serial))?;
        snapshot.serial = encode_serial(&snapshot.serial);
        Ok(LoadTabsResponse {
            tabs_data: snapshot,
        })
    }

    /// Handles `POST /save_tabs/`.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is too large or not a snapshot.
    pub fn handle_save(&self, body: &[u8]) -> ServerResult<SaveTabsResponse> {
        if body.len() > self.config.max_body_bytes {
            return Err(ServerError::PayloadTooLarge {
                size: body.len(),
                limit: self.config.max_body_bytes,
            });
        }
        let mut snapshot = DocumentSnapshot::decode(body)
            .map_err(|e| ServerError::InvalidRequest(e.to_string()))?;

        let mut snapshots = self.snapshots.write();
        let stored = snapshots.get(&snapshot.serial).map(|s| s.version);
        let version = match (self.config.version_policy, stored) {
            (VersionPolicy::Advance, Some(stored)) => {
                snapshot.version.max(stored.saturating_add(1))
            }
            _ => snapshot.version,
        };
        snapshot.version = version;

        info!(
            serial = %snapshot.serial,
            version,
            tabs = snapshot.documents.len(),
            "snapshot stored"
        );
        snapshots.insert(snapshot.serial.clone(), snapshot);
        Ok(SaveTabsResponse { version })
    }

    /// Handles `GET /list_serials/`.
    pub fn handle_list(&self) -> ListSerialsResponse {
        ListSerialsResponse {
            serials: self
                .snapshots
                .read()
                .keys()
                .map(|serial| encode_serial(serial))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabsync_protocol::Document;

    fn snap(serial: &str, version: u64) -> DocumentSnapshot {
        DocumentSnapshot::new(serial, vec![Document::new("t", "<p>c</p>")], 0, version)
    }

    #[test]
    fn save_then_load() {
        let server = TabServer::new(ServerConfig::default());
        let body = snap("사무실", 4).encode().unwrap();

        let response = server.route("POST", "/save_tabs/", &body);
        assert_eq!(response.status, 200);
        assert_eq!(SaveTabsResponse::decode(&response.body).unwrap().version, 4);

        let token = encode_serial("사무실");
        let response = server.route("GET", &format!("/load_tabs/{token}"), &[]);
        let loaded = LoadTabsResponse::decode(&response.body).unwrap().tabs_data;
        assert_eq!(loaded.serial, token);
        assert_eq!(loaded.version, 4);
        assert_eq!(server.snapshot("사무실").unwrap().serial, "사무실");
    }

    #[test]
    fn unknown_serial_is_not_found() {
        let server = TabServer::new(ServerConfig::default());
        assert_eq!(server.route("GET", "/load_tabs/nobody", &[]).status, 404);
    }

    #[test]
    fn malformed_save_is_bad_request() {
        let server = TabServer::new(ServerConfig::default());
        assert_eq!(server.route("POST", "/save_tabs/", b"[1, 2").status, 400);
        assert_eq!(server.serial_count(), 0);
    }

    #[test]
    fn oversized_body_is_rejected() {
        let server = TabServer::new(ServerConfig::new().with_max_body_bytes(8));
        let body = snap("a", 1).encode().unwrap();
        assert_eq!(server.route("POST", "/save_tabs/", &body).status, 413);
    }

    #[test]
    fn accept_policy_echoes_submitted_version() {
        let server = TabServer::new(ServerConfig::default());
        server.insert(snap("a", 9));
        assert_eq!(server.handle_save(&snap("a", 2).encode().unwrap()).unwrap().version, 2);
    }

    #[test]
    fn advance_policy_never_repeats_versions() {
        let config = ServerConfig::new().with_version_policy(VersionPolicy::Advance);
        let server = TabServer::new(config);

        let save = |v| server.handle_save(&snap("a", v).encode().unwrap()).unwrap().version;
        assert_eq!(save(5), 5);
        assert_eq!(save(5), 6);
        assert_eq!(save(2), 7);
        assert_eq!(save(20), 20);
        assert_eq!(server.snapshot("a").unwrap().version, 20);
    }

    #[test]
    fn list_serials_are_encoded() {
        let server = TabServer::new(ServerConfig::default());
        server.insert(snap("b/2", 1));
        server.insert(snap("a", 1));

        let response = server.route("GET", "/list_serials/", &[]);
        let list = ListSerialsResponse::decode(&response.body).unwrap();
        assert_eq!(list.serials, vec!["a", "b%2F2"]);
    }
}
