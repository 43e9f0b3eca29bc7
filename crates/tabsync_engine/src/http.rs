//! HTTP client abstraction.
//!
//! The remote store talks to the tab server through [`HttpClient`] so the
//! actual HTTP stack can be swapped: [`ReqwestClient`] for real servers,
//! [`LoopbackClient`] to route requests straight into an in-process server.

use crate::error::{SyncError, SyncResult};
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
}

/// A received HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a response.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true for a 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Blocking HTTP client.
///
/// Implementations return `Err` only when no response was received
/// (connection failure, timeout). Non-2xx statuses are returned as
/// responses and interpreted by the caller.
pub trait HttpClient: Send + Sync {
    /// Sends a `GET` request.
    fn get(&self, url: &str) -> SyncResult<HttpResponse>;

    /// Sends a `POST` request with a JSON body.
    fn post_json(&self, url: &str, body: Vec<u8>) -> SyncResult<HttpResponse>;
}

/// [`HttpClient`] backed by `reqwest`'s blocking client.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Creates a client whose connect and total request time are bounded by
    /// `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Config`] if the TLS backend cannot be set up.
    pub fn new(timeout: Duration) -> SyncResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| SyncError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    fn finish(result: reqwest::Result<reqwest::blocking::Response>) -> SyncResult<HttpResponse> {
        let response = result.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().map_err(map_reqwest_error)?;
        Ok(HttpResponse::new(status, body.to_vec()))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> SyncError {
    if err.is_timeout() {
        SyncError::Timeout
    } else if err.is_connect() || err.is_request() {
        SyncError::remote_retryable(err.to_string())
    } else {
        SyncError::remote_fatal(err.to_string())
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> SyncResult<HttpResponse> {
        Self::finish(self.client.get(url).send())
    }

    fn post_json(&self, url: &str, body: Vec<u8>) -> SyncResult<HttpResponse> {
        Self::finish(
            self.client
                .post(url)
                .header(CONTENT_TYPE, "application/json")
                .body(body)
                .send(),
        )
    }
}

/// Trait for servers that can handle loopback requests.
pub trait LoopbackServer {
    /// Handles a request for `path` and returns the response.
    fn handle(&self, method: HttpMethod, path: &str, body: &[u8]) -> HttpResponse;
}

/// A loopback HTTP client that routes requests directly to a server.
///
/// Useful for testing without actual network overhead.
pub struct LoopbackClient<S: LoopbackServer> {
    server: S,
}

impl<S: LoopbackServer + Send + Sync> LoopbackClient<S> {
    /// Creates a new loopback client connected to the given server.
    pub fn new(server: S) -> Self {
        Self { server }
    }

    /// Returns the wrapped server.
    pub fn server(&self) -> &S {
        &self.server
    }
}

/// Strips scheme and authority, keeping the path.
fn path_of(url: &str) -> &str {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    rest.find('/').map_or("/", |i| &rest[i..])
}

impl<S: LoopbackServer + Send + Sync> HttpClient for LoopbackClient<S> {
    fn get(&self, url: &str) -> SyncResult<HttpResponse> {
        Ok(self.server.handle(HttpMethod::Get, path_of(url), &[]))
    }

    fn post_json(&self, url: &str, body: Vec<u8>) -> SyncResult<HttpResponse> {
        Ok(self.server.handle(HttpMethod::Post, path_of(url), &body))
    }
}

impl<S: LoopbackServer + ?Sized> LoopbackServer for std::sync::Arc<S> {
    fn handle(&self, method: HttpMethod, path: &str, body: &[u8]) -> HttpResponse {
        (**self).handle(method, path, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    struct Recorder {
        seen: Mutex<Vec<(HttpMethod, String, Vec<u8>)>>,
    }

    impl LoopbackServer for Recorder {
        fn handle(&self, method: HttpMethod, path: &str, body: &[u8]) -> HttpResponse {
            self.seen.lock().push((method, path.to_string(), body.to_vec()));
            HttpResponse::new(200, b"{}".to_vec())
        }
    }

    #[test]
    fn response_status_classes() {
        assert!(HttpResponse::new(200, Vec::new()).is_success());
        assert!(HttpResponse::new(204, Vec::new()).is_success());
        assert!(!HttpResponse::new(404, Vec::new()).is_success());
        assert!(!HttpResponse::new(500, Vec::new()).is_success());
    }

    #[test]
    fn url_path_extraction() {
        assert_eq!(path_of("http://10.0.0.5:9338/load_tabs/a%2Fb"), "/load_tabs/a%2Fb");
        assert_eq!(path_of("https://host"), "/");
        assert_eq!(path_of("/list_serials/"), "/list_serials/");
    }

    #[test]
    fn loopback_routes_to_server() {
        let client = LoopbackClient::new(Recorder {
            seen: Mutex::new(Vec::new()),
        });

        client.get("http://host:1/list_serials/").unwrap();
        client
            .post_json("http://host:1/save_tabs/", b"{\"version\":1}".to_vec())
            .unwrap();

        let seen = client.server().seen.lock();
        assert_eq!(seen[0].0, HttpMethod::Get);
        assert_eq!(seen[0].1, "/list_serials/");
        assert_eq!(seen[1].0, HttpMethod::Post);
        assert_eq!(seen[1].2, b"{\"version\":1}");
    }

    #[test]
    fn reqwest_client_builds() {
        assert!(ReqwestClient::new(Duration::from_secs(1)).is_ok());
    }
}
