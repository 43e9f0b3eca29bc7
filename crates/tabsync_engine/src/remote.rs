//! HTTP-backed remote store.

use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::http::{HttpClient, HttpResponse, ReqwestClient};
use crate::transport::RemoteTransport;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use tabsync_codec::{decode_serial_lossy, encode_serial};
use tabsync_protocol::{
    DocumentSnapshot, ListSerialsResponse, LoadTabsResponse, SaveTabsResponse, WireMessage,
};
use tracing::{debug, info, warn};

/// Client for the tab server's HTTP surface.
///
/// The `try_*` methods report precise errors. The [`RemoteTransport`]
/// implementation wraps them, logs failures and degrades them.
pub struct RemoteStore<C: HttpClient> {
    /// Base URL without trailing slash (e.g. "http://10.0.0.5:9338").
    base_url: String,
    /// HTTP client implementation.
    client: C,
    /// Whether the most recent call got any HTTP response.
    reachable: AtomicBool,
    /// Last error message.
    last_error: RwLock<Option<String>>,
}

impl RemoteStore<ReqwestClient> {
    /// Creates a store for the configured server using a blocking reqwest
    /// client bounded by the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn connect(config: &SyncConfig) -> SyncResult<Self> {
        Ok(Self::new(&config.server_url, ReqwestClient::new(config.timeout)?))
    }
}

impl<C: HttpClient> RemoteStore<C> {
    /// Creates a new remote store.
    pub fn new(base_url: impl Into<String>, client: C) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            reachable: AtomicBool::new(false),
            last_error: RwLock::new(None),
        }
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the underlying HTTP client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Returns whether the most recent call got an HTTP response.
    pub fn was_reachable(&self) -> bool {
        self.reachable.load(Ordering::SeqCst)
    }

    /// Fetches the snapshot stored for `serial`.
    ///
    /// The returned snapshot's serial is decoded to display form.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status or a malformed body.
    pub fn try_fetch(&self, serial: &str) -> SyncResult<DocumentSnapshot> {
        let url = format!("{}/load_tabs/{}", self.base_url, encode_serial(serial));
        debug!(url = %url, "fetching remote snapshot");

        let body = self.get(&url)?;
        let mut snapshot = LoadTabsResponse::decode(&body)?.tabs_data;
        snapshot.serial = decode_serial_lossy(&snapshot.serial);
        Ok(snapshot)
    }

    /// Pushes a snapshot and returns the version confirmed by the server.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status or a malformed body.
    pub fn try_push(&self, snapshot: &DocumentSnapshot) -> SyncResult<u64> {
        let url = format!("{}/save_tabs/", self.base_url);
        let response = self
            .client
            .post_json(&url, snapshot.encode()?)
            .inspect_err(|_| self.reachable.store(false, Ordering::SeqCst))?;
        let body = self.check(&url, response)?;
        Ok(SaveTabsResponse::decode(&body)?.version)
    }

    /// Lists the serials held by the server, decoded to display form.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status or a malformed body.
    pub fn try_list_serials(&self) -> SyncResult<Vec<String>> {
        let body = self.get(&format!("{}/list_serials/", self.base_url))?;
        Ok(ListSerialsResponse::decode(&body)?
            .serials
            .iter()
            .map(|token| decode_serial_lossy(token))
            .collect())
    }

    fn get(&self, url: &str) -> SyncResult<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .inspect_err(|_| self.reachable.store(false, Ordering::SeqCst))?;
        self.check(url, response)
    }

    fn check(&self, url: &str, response: HttpResponse) -> SyncResult<Vec<u8>> {
        self.reachable.store(true, Ordering::SeqCst);
        if response.is_success() {
            return Ok(response.body);
        }
        let message = format!("HTTP {} from {}", response.status, url);
        if response.status >= 500 {
            Err(SyncError::remote_retryable(message))
        } else {
            Err(SyncError::remote_fatal(message))
        }
    }

    fn settle<T>(&self, operation: &str, result: SyncResult<T>) -> Option<T> {
        match result {
            Ok(value) => {
                *self.last_error.write() = None;
                Some(value)
            }
            Err(e) => {
                warn!(operation, error = %e, "remote operation failed");
                *self.last_error.write() = Some(e.to_string());
                None
            }
        }
    }
}

impl<C: HttpClient> RemoteTransport for RemoteStore<C> {
    fn fetch(&self, serial: &str) -> Option<DocumentSnapshot> {
        self.settle("fetch", self.try_fetch(serial))
    }

    fn push(&self, snapshot: &DocumentSnapshot) -> Option<u64> {
        let version = self.settle("push", self.try_push(snapshot))?;
        info!(version, "snapshot saved on server");
        Some(version)
    }

    fn list_known_serials(&self) -> Vec<String> {
        self.settle("list_serials", self.try_list_serials())
            .unwrap_or_default()
    }

    fn probe(&self) -> bool {
        let url = format!("{}/list_serials/", self.base_url);
        self.settle("probe", self.get(&url)).is_some()
    }

    fn last_error(&self) -> Option<String> {
        self.last_error.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use parking_lot::Mutex;
    use tabsync_protocol::Document;

    /// Answers every request with a canned response and records the URLs.
    struct CannedClient {
        response: Option<HttpResponse>,
        urls: Mutex<Vec<(HttpMethod, String)>>,
    }

    impl CannedClient {
        fn new(status: u16, body: &str) -> Self {
            Self {
                response: Some(HttpResponse::new(status, body.as_bytes().to_vec())),
                urls: Mutex::new(Vec::new()),
            }
        }

        fn unreachable() -> Self {
            Self {
                response: None,
                urls: Mutex::new(Vec::new()),
            }
        }

        fn answer(&self) -> SyncResult<HttpResponse> {
            self.response
                .clone()
                .ok_or_else(|| SyncError::remote_retryable("connection refused"))
        }
    }

    impl HttpClient for CannedClient {
        fn get(&self, url: &str) -> SyncResult<HttpResponse> {
            self.urls.lock().push((HttpMethod::Get, url.to_string()));
            self.answer()
        }

        fn post_json(&self, url: &str, _body: Vec<u8>) -> SyncResult<HttpResponse> {
            self.urls.lock().push((HttpMethod::Post, url.to_string()));
            self.answer()
        }
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let store = RemoteStore::new("http://tabs.local:9338/", CannedClient::new(200, "{}"));
        assert_eq!(store.base_url(), "http://tabs.local:9338");
    }

    #[test]
    fn fetch_encodes_serial_once_and_decodes_reply() {
        let body = r#"{"tabs_data": {"serial": "desk%2F01", "active_tab_index": 0,
            "tabs": [{"title": "a", "content": "b"}], "version": 3}}"#;
        let store = RemoteStore::new("http://h", CannedClient::new(200, body));

        let snapshot = store.fetch("desk/01").unwrap();
        assert_eq!(snapshot.serial, "desk/01");
        assert_eq!(snapshot.version, 3);
        assert_eq!(snapshot.documents, vec![Document::new("a", "b")]);

        let urls = store.client().urls.lock();
        assert_eq!(
            urls[0],
            (HttpMethod::Get, "http://h/load_tabs/desk%2F01".to_string())
        );
    }

    #[test]
    fn non_success_status_degrades() {
        let store = RemoteStore::new("http://h", CannedClient::new(404, "not found"));
        assert_eq!(store.fetch("a"), None);
        assert!(store.last_error().unwrap().contains("HTTP 404"));
        assert!(store.was_reachable());
        assert!(matches!(
            store.try_fetch("a"),
            Err(SyncError::RemoteUnavailable {
                retryable: false,
                ..
            })
        ));
    }

    #[test]
    fn server_error_is_retryable() {
        let store = RemoteStore::new("http://h", CannedClient::new(503, ""));
        assert!(store.try_list_serials().unwrap_err().is_retryable());
    }

    #[test]
    fn malformed_body_degrades() {
        let store = RemoteStore::new("http://h", CannedClient::new(200, "<html>"));
        assert_eq!(store.fetch("a"), None);
        assert!(matches!(store.try_fetch("a"), Err(SyncError::Protocol(_))));
    }

    #[test]
    fn connection_failure_degrades() {
        let store = RemoteStore::new("http://h", CannedClient::unreachable());
        assert_eq!(store.fetch("a"), None);
        assert_eq!(store.push(&DocumentSnapshot::placeholder("a")), None);
        assert!(store.list_known_serials().is_empty());
        assert!(!store.probe());
        assert!(!store.was_reachable());
        assert!(store.last_error().unwrap().contains("connection refused"));
    }

    #[test]
    fn push_returns_confirmed_version() {
        let store = RemoteStore::new("http://h", CannedClient::new(200, r#"{"version": 6}"#));
        let snapshot = DocumentSnapshot::placeholder("a").with_version(5);

        assert_eq!(store.push(&snapshot), Some(6));
        assert_eq!(store.last_error(), None);
        let urls = store.client().urls.lock();
        assert_eq!(urls[0], (HttpMethod::Post, "http://h/save_tabs/".to_string()));
    }

    #[test]
    fn list_serials_decodes_tokens() {
        let body = r#"{"serials": ["desk%2F01", "%EC%82%AC%EB%AC%B4%EC%8B%A4", "plain"]}"#;
        let store = RemoteStore::new("http://h", CannedClient::new(200, body));

        assert_eq!(store.list_known_serials(), vec!["desk/01", "사무실", "plain"]);
        assert!(store.probe());
    }
}
