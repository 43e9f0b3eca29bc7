//! JSON messages exchanged with the tab server.
//!
//! | Endpoint                     | Request body       | Response body         |
//! |------------------------------|--------------------|-----------------------|
//! | `GET /load_tabs/{serial}`    | -                  | [`LoadTabsResponse`]  |
//! | `POST /save_tabs/`           | [`DocumentSnapshot`] | [`SaveTabsResponse`] |
//! | `GET /list_serials/`         | -                  | [`ListSerialsResponse`] |

use crate::error::{ProtocolError, ProtocolResult};
use crate::snapshot::DocumentSnapshot;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A message that travels as a JSON body.
pub trait WireMessage: Serialize + DeserializeOwned {
    /// Encodes to compact JSON bytes.
    fn encode(&self) -> ProtocolResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(ProtocolError::Encode)
    }

    /// Decodes from JSON bytes.
    fn decode(bytes: &[u8]) -> ProtocolResult<Self> {
        serde_json::from_slice(bytes).map_err(ProtocolError::Decode)
    }
}

/// Response of `GET /load_tabs/{serial}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadTabsResponse {
    /// The stored snapshot.
    pub tabs_data: DocumentSnapshot,
}

/// Response of `POST /save_tabs/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveTabsResponse {
    /// Version assigned or confirmed by the server.
    pub version: u64,
}

/// Response of `GET /list_serials/`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ListSerialsResponse {
    /// Encoded serials held by the server.
    #[serde(default)]
    pub serials: Vec<String>,
}

impl WireMessage for DocumentSnapshot {}
impl WireMessage for LoadTabsResponse {}
impl WireMessage for SaveTabsResponse {}
impl WireMessage for ListSerialsResponse {}

/// Serializes a value as 4-space indented JSON with non-ASCII kept literal.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> ProtocolResult<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser).map_err(ProtocolError::Encode)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Document;

    #[test]
    fn load_response_decoding() {
        let body = br#"{"tabs_data": {"serial": "a", "active_tab_index": 0,
            "tabs": [{"title": "t", "content": "c"}], "version": 4}}"#;
        let response = LoadTabsResponse::decode(body).unwrap();
        assert_eq!(response.tabs_data.version, 4);
        assert_eq!(response.tabs_data.documents[0], Document::new("t", "c"));
    }

    #[test]
    fn save_response_decoding() {
        let response = SaveTabsResponse::decode(br#"{"version": 6}"#).unwrap();
        assert_eq!(response.version, 6);

        let err = SaveTabsResponse::decode(br#"{"status": "ok"}"#).unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn list_serials_missing_key_is_empty() {
        let response = ListSerialsResponse::decode(b"{}").unwrap();
        assert!(response.serials.is_empty());
    }

    #[test]
    fn pretty_json_keeps_non_ascii() {
        let snapshot = DocumentSnapshot::new(
            "사무실",
            vec![Document::new("메모", "<p>안녕</p>")],
            0,
            1,
        );
        let text = String::from_utf8(to_pretty_json(&snapshot).unwrap()).unwrap();

        assert!(text.contains("\"serial\": \"사무실\""));
        assert!(text.contains("\n    \"active_tab_index\": 0"));
        assert!(!text.contains("\\u"));
    }
}
