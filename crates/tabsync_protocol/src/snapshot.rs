//! The document snapshot: the unit of persistence and sync.

use serde::{Deserialize, Serialize};

/// Title given to a document whose stored title is missing.
pub const DEFAULT_TITLE: &str = "New Tab";

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

/// A single document (editor tab) inside a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Tab title.
    #[serde(default = "default_title")]
    pub title: String,
    /// Markup content with images inlined as data URIs.
    #[serde(default)]
    pub content: String,
}

impl Document {
    /// Creates a new document.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// The complete document set of one serial, plus its sync metadata.
///
/// Serialized field names follow the on-disk and on-wire format:
/// `serial`, `active_tab_index`, `tabs`, `version`. Missing fields decode
/// to their defaults so that older or partial files still load.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    /// Identity of the owning workstation/profile.
    #[serde(default)]
    pub serial: String,
    /// Index of the focused document when the snapshot was taken.
    ///
    /// Stored as a signed value because editors report `-1` for "no tab";
    /// use [`DocumentSnapshot::active_index_clamped`] to index `documents`.
    #[serde(rename = "active_tab_index", default)]
    pub active_index: i64,
    /// Ordered documents.
    #[serde(rename = "tabs", default)]
    pub documents: Vec<Document>,
    /// Logical version, the only ordering signal used by reconciliation.
    #[serde(default)]
    pub version: u64,
}

impl DocumentSnapshot {
    /// Creates a snapshot.
    pub fn new(
        serial: impl Into<String>,
        documents: Vec<Document>,
        active_index: i64,
        version: u64,
    ) -> Self {
        Self {
            serial: serial.into(),
            active_index,
            documents,
            version,
        }
    }

    /// Creates the zero-version empty placeholder used when nothing is stored.
    pub fn placeholder(serial: impl Into<String>) -> Self {
        Self::new(serial, Vec::new(), 0, 0)
    }

    /// Returns a copy with a different version.
    #[must_use]
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    /// Returns true if the snapshot holds no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Returns the active index clamped to `[0, len)`, or 0 for an empty set.
    pub fn active_index_clamped(&self) -> usize {
        let len = self.documents.len();
        if len == 0 || self.active_index < 0 {
            return 0;
        }
        usize::try_from(self.active_index)
            .map(|idx| idx.min(len - 1))
            .unwrap_or(len - 1)
    }

    /// Clamps the stored active index in place.
    pub fn clamp_active_index(&mut self) {
        self.active_index = i64::try_from(self.active_index_clamped()).unwrap_or(0);
    }

    /// Returns the focused document, if any.
    pub fn active_document(&self) -> Option<&Document> {
        self.documents.get(self.active_index_clamped())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(n: usize) -> Vec<Document> {
        (0..n)
            .map(|i| Document::new(format!("tab {i}"), format!("<p>{i}</p>")))
            .collect()
    }

    #[test]
    fn json_field_names() {
        let snapshot = DocumentSnapshot::new("desk", docs(1), 0, 3);
        let json = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(json["serial"], "desk");
        assert_eq!(json["active_tab_index"], 0);
        assert_eq!(json["tabs"][0]["title"], "tab 0");
        assert_eq!(json["tabs"][0]["content"], "<p>0</p>");
        assert_eq!(json["version"], 3);
    }

    #[test]
    fn missing_fields_default() {
        let snapshot: DocumentSnapshot = serde_json::from_str(r#"{"tabs": [{}]}"#).unwrap();
        assert_eq!(snapshot.serial, "");
        assert_eq!(snapshot.version, 0);
        assert_eq!(snapshot.active_index, 0);
        assert_eq!(snapshot.documents, vec![Document::new(DEFAULT_TITLE, "")]);

        let snapshot: DocumentSnapshot = serde_json::from_str("{}").unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn active_index_clamping() {
        let mut snapshot = DocumentSnapshot::new("s", docs(3), 7, 1);
        assert_eq!(snapshot.active_index_clamped(), 2);
        snapshot.clamp_active_index();
        assert_eq!(snapshot.active_index, 2);

        snapshot.active_index = -1;
        assert_eq!(snapshot.active_index_clamped(), 0);

        snapshot.active_index = 1;
        assert_eq!(snapshot.active_document().unwrap().title, "tab 1");

        let empty = DocumentSnapshot::new("s", Vec::new(), 4, 1);
        assert_eq!(empty.active_index_clamped(), 0);
        assert!(empty.active_document().is_none());
    }

    #[test]
    fn placeholder_is_zero_version() {
        let placeholder = DocumentSnapshot::placeholder("desk");
        assert_eq!(placeholder.serial, "desk");
        assert_eq!(placeholder.version, 0);
        assert!(placeholder.is_empty());
        assert_eq!(placeholder.clone().with_version(9).version, 9);
    }
}
