//! Request routing.

use crate::error::{ServerError, ServerResult};

/// A recognized endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `GET /load_tabs/{token}`, carrying the still-encoded token.
    LoadTabs(String),
    /// `POST /save_tabs/`
    SaveTabs,
    /// `GET /list_serials/`
    ListSerials,
}

impl Route {
    /// Matches a method and path against the server's endpoints.
    ///
    /// A trailing slash is optional and any query string is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::NoRoute`] for unknown paths and
    /// [`ServerError::MethodNotAllowed`] for a known path with the wrong method.
    pub fn parse(method: &str, path: &str) -> ServerResult<Self> {
        let path_only = path.split_once('?').map_or(path, |(p, _)| p);
        let segments: Vec<&str> = path_only
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        let (route, expected) = match segments.as_slice() {
            ["load_tabs", token] => (Route::LoadTabs((*token).to_string()), "GET"),
            ["save_tabs"] => (Route::SaveTabs, "POST"),
            ["list_serials"] => (Route::ListSerials, "GET"),
            _ => return Err(ServerError::NoRoute(path.to_string())),
        };

        if !method.eq_ignore_ascii_case(expected) {
            return Err(ServerError::MethodNotAllowed {
                method: method.to_string(),
                path: path.to_string(),
            });
        }
        Ok(route)
    }
}

/// A status code plus JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerResponse {
    /// HTTP status code.
    pub status: u16,
    /// JSON body.
    pub body: Vec<u8>,
}

impl ServerResponse {
    /// Creates a `200 OK` response.
    pub fn ok(body: Vec<u8>) -> Self {
        Self { status: 200, body }
    }

    /// Creates an error response with a `{"detail": ...}` body.
    pub fn error(err: &ServerError) -> Self {
        let body = serde_json::json!({ "detail": err.to_string() });
        Self {
            status: err.status_code(),
            body: body.to_string().into_bytes(),
        }
    }
}
