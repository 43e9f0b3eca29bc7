//! Save command implementation.

use super::{open_engine, print_outcome, CliResult};
use std::path::{Component, Path, PathBuf};
use tabsync_codec::{inline_images, ImageResolver};
use tabsync_protocol::{Document, DEFAULT_TITLE};
use tracing::debug;

/// Resolves image references to PNG files next to the document.
pub struct DirectoryResolver {
    dir: PathBuf,
}

impl DirectoryResolver {
    /// Creates a resolver for files in `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ImageResolver for DirectoryResolver {
    fn resolve(&self, name: &str) -> Option<Vec<u8>> {
        if name.contains("://") {
            return None;
        }
        let relative = Path::new(name);
        // Only plain names below the document's directory
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return None;
        }
        let bytes = std::fs::read(self.dir.join(relative)).ok()?;
        debug!(name, size = bytes.len(), "resolved image");
        Some(bytes)
    }
}

/// Builds a document from an HTML file, inlining images found beside it.
pub fn load_document(path: &Path) -> CliResult<Document> {
    let markup = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let content = inline_images(&markup, &DirectoryResolver::new(dir));

    let title = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());
    Ok(Document::new(title, content))
}

/// Saves `files` as the new document set.
pub fn run(settings_path: &Path, files: &[PathBuf], active: i64) -> CliResult<()> {
    let documents = files
        .iter()
        .map(|path| load_document(path))
        .collect::<CliResult<Vec<_>>>()?;

    let (_, engine) = open_engine(settings_path)?;
    let outcome = engine.save(documents, active)?;
    print_outcome(&outcome);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolver_reads_only_plain_names() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("image_1.png"), [1u8, 2, 3]).unwrap();
        let resolver = DirectoryResolver::new(dir.path());

        assert_eq!(resolver.resolve("image_1.png"), Some(vec![1, 2, 3]));
        assert_eq!(resolver.resolve("missing.png"), None);
        assert_eq!(resolver.resolve("../image_1.png"), None);
        assert_eq!(resolver.resolve("/etc/passwd"), None);
        assert_eq!(resolver.resolve("http://host/image_1.png"), None);
    }

    #[test]
    fn document_from_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("logo.png"), [1u8, 2, 3]).unwrap();
        let path = dir.path().join("meeting notes.html");
        std::fs::write(&path, r#"<p>hi</p><img src="logo.png"><img src="gone.png">"#).unwrap();

        let document = load_document(&path).unwrap();
        assert_eq!(document.title, "meeting notes");
        assert_eq!(
            document.content,
            r#"<p>hi</p><img src="data:image/png;base64,AQID"><img src="gone.png">"#
        );
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_document(&dir.path().join("nope.html")).unwrap_err();
        assert!(err.to_string().contains("nope.html"));
    }
}
