//! Loopback harness connecting engines to an in-process tab server.

use crate::fixtures::TestWorkspace;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tabsync_engine::{
    HttpMethod, HttpResponse, LoopbackClient, LoopbackServer, RemoteStore, SyncConfig, SyncEngine,
};
use tabsync_server::{ServerConfig, TabServer};
use tabsync_storage::FileStore;

/// Exposes a [`TabServer`] to the engine's loopback HTTP client.
#[derive(Clone)]
pub struct ServerBridge {
    server: Arc<TabServer>,
    online: Arc<AtomicBool>,
}

impl ServerBridge {
    /// Wraps a server.
    pub fn new(server: Arc<TabServer>) -> Self {
        Self {
            server,
            online: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Simulates the server going down (`503`) or coming back.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }
}

impl LoopbackServer for ServerBridge {
    fn handle(&self, method: HttpMethod, path: &str, body: &[u8]) -> HttpResponse {
        if !self.online.load(Ordering::SeqCst) {
            return HttpResponse::new(503, b"service unavailable".to_vec());
        }
        let method = match method {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        };
        let response = self.server.route(method, path, body);
        HttpResponse::new(response.status, response.body)
    }
}

/// Engine type produced by [`LoopbackHarness`].
pub type LoopbackEngine = SyncEngine<FileStore, RemoteStore<LoopbackClient<ServerBridge>>>;

/// One tab server plus a workspace for any number of client engines.
pub struct LoopbackHarness {
    /// The shared server.
    pub server: Arc<TabServer>,
    /// Bridge used by every engine built by this harness.
    pub bridge: ServerBridge,
    /// Directory for the engines' local files.
    pub workspace: TestWorkspace,
}

impl LoopbackHarness {
    /// Creates a harness with a default server.
    pub fn new() -> Self {
        Self::with_server_config(ServerConfig::default())
    }

    /// Creates a harness with a custom server configuration.
    pub fn with_server_config(config: ServerConfig) -> Self {
        let server = Arc::new(TabServer::new(config));
        Self {
            bridge: ServerBridge::new(Arc::clone(&server)),
            server,
            workspace: TestWorkspace::new(),
        }
    }

    /// Returns the configuration an engine for `local_file` and `serial` uses.
    pub fn config(&self, local_file: &str, serial: &str) -> SyncConfig {
        SyncConfig::new(serial, self.workspace.path(local_file), "http://loopback")
    }

    /// Builds an engine whose local file lives in the workspace.
    pub fn engine(&self, local_file: &str, serial: &str) -> LoopbackEngine {
        self.engine_with(self.config(local_file, serial))
    }

    /// Builds an engine from an explicit configuration.
    pub fn engine_with(&self, config: SyncConfig) -> LoopbackEngine {
        let local = FileStore::new(&config.local_path);
        let remote = RemoteStore::new(
            config.server_url.as_str(),
            LoopbackClient::new(self.bridge.clone()),
        );
        SyncEngine::new(config, local, remote)
    }
}

impl Default for LoopbackHarness {
    fn default() -> Self {
        Self::new()
    }
}
