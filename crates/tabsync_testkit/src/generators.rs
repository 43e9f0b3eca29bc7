//! Property-based test generators using proptest.

use proptest::prelude::*;
use tabsync_protocol::{Document, DocumentSnapshot};

/// Strategy for serials, including reserved URL characters and non-ASCII.
pub fn serial_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9_-]{1,16}",
        "[a-z /?#&%+=]{1,16}",
        "\\PC{1,12}",
    ]
}

/// Strategy for a single document.
pub fn document_strategy() -> impl Strategy<Value = Document> {
    ("\\PC{0,24}", "\\PC{0,200}").prop_map(|(title, content)| Document::new(title, content))
}

/// Strategy for complete snapshots.
///
/// The active index may point past the end or be negative, as editors
/// sometimes report.
pub fn snapshot_strategy() -> impl Strategy<Value = DocumentSnapshot> {
    (
        serial_strategy(),
        prop::collection::vec(document_strategy(), 0..6),
        -1i64..8,
        any::<u64>(),
    )
        .prop_map(|(serial, documents, active_index, version)| {
            DocumentSnapshot::new(serial, documents, active_index, version)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::TestWorkspace;
    use tabsync_storage::LocalStore;

    proptest! {
        #[test]
        fn file_store_roundtrips_any_snapshot(snapshot in snapshot_strategy()) {
            let workspace = TestWorkspace::new();
            let store = workspace.store("tabs_data.json");
            store.write(&snapshot).unwrap();
            prop_assert_eq!(store.read().unwrap(), Some(snapshot));
        }

        #[test]
        fn clamped_index_is_in_range(snapshot in snapshot_strategy()) {
            let idx = snapshot.active_index_clamped();
            if snapshot.documents.is_empty() {
                prop_assert_eq!(idx, 0);
            } else {
                prop_assert!(idx < snapshot.documents.len());
            }
        }
    }
}
