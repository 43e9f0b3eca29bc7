//! Inline image codec.
//!
//! The editing surface keeps pasted images as in-memory resources referenced
//! from the markup by an opaque name (`<img src="image_20240101120000123456.png">`).
//! Before a snapshot leaves the process, every such reference is rewritten
//! into a `data:image/png;base64,...` URI so the document is self-contained.
//!
//! Matching is a text pass over `<img ... src=...>` occurrences. Only the
//! `src` value is replaced; the rest of the tag and the surrounding markup
//! are copied through byte for byte.

use crate::error::{CodecError, CodecResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;
use tracing::debug;

/// Media type used for every inlined image.
pub const PNG_MEDIA_TYPE: &str = "image/png";

// `src` must start a whitespace-separated attribute; quoted values of other
// attributes are skipped whole so `data-src=` or `alt="src=..."` never match.
static IMG_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)<img\b(?:[^>"']|"[^"]*"|'[^']*')*?\ssrc\s*=\s*(?:"([^"]*)"|'([^']*)')"#,
    )
    .unwrap_or_else(|e| unreachable!("static image pattern is valid: {e}"))
});

/// Looks up the raw PNG bytes of an in-memory image resource by name.
pub trait ImageResolver {
    /// Returns the PNG bytes for `name`, or `None` if no such resource exists.
    fn resolve(&self, name: &str) -> Option<Vec<u8>>;
}

impl ImageResolver for HashMap<String, Vec<u8>> {
    fn resolve(&self, name: &str) -> Option<Vec<u8>> {
        self.get(name).cloned()
    }
}

impl ImageResolver for BTreeMap<String, Vec<u8>> {
    fn resolve(&self, name: &str) -> Option<Vec<u8>> {
        self.get(name).cloned()
    }
}

impl<R: ImageResolver + ?Sized> ImageResolver for &R {
    fn resolve(&self, name: &str) -> Option<Vec<u8>> {
        (**self).resolve(name)
    }
}

/// A rich-text buffer that can export markup and enumerate its images.
///
/// This is the structured view of the editing surface: instead of guessing
/// image references from the markup, the buffer reports which resource
/// names it actually holds.
pub trait RichTextBuffer {
    /// Exports the buffer as a markup string.
    fn to_markup(&self) -> String;

    /// Names of the image resources embedded in the buffer, in document order.
    fn image_names(&self) -> Vec<String>;

    /// Returns the PNG bytes of an embedded image.
    fn image(&self, name: &str) -> Option<Vec<u8>>;
}

/// Builds a `data:image/png;base64,...` URI from raw PNG bytes.
#[must_use]
pub fn png_data_uri(bytes: &[u8]) -> String {
    format!("data:{PNG_MEDIA_TYPE};base64,{}", STANDARD.encode(bytes))
}

/// Rewrites every resolvable in-memory image reference in `markup` into an
/// inline data URI.
///
/// References the resolver does not know are left untouched, as are sources
/// that are already `data:` URIs. Each distinct name is resolved once.
#[must_use]
pub fn inline_images<R: ImageResolver + ?Sized>(markup: &str, resolver: &R) -> String {
    rewrite_sources(markup, |name| resolver.resolve(name))
}

/// Inlines the images of a structured buffer.
///
/// Only the names the buffer enumerates are rewritten. A buffer that
/// enumerates nothing falls back to discovering references from the markup.
#[must_use]
pub fn inline_buffer<B: RichTextBuffer + ?Sized>(buffer: &B) -> String {
    let markup = buffer.to_markup();
    let names = buffer.image_names();

    if names.is_empty() {
        return rewrite_sources(&markup, |name| buffer.image(name));
    }

    rewrite_sources(&markup, |name| {
        if names.iter().any(|n| n == name) {
            buffer.image(name)
        } else {
            None
        }
    })
}

/// Splits a base64 data URI into its media type and decoded bytes.
///
/// # Errors
///
/// Returns an error if `uri` is not a base64 `data:` URI or the payload is
/// not valid base64.
pub fn decode_data_uri(uri: &str) -> CodecResult<(String, Vec<u8>)> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| CodecError::invalid_data_uri("missing data: scheme"))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| CodecError::invalid_data_uri("missing ',' separator"))?;
    let media_type = header
        .strip_suffix(";base64")
        .ok_or_else(|| CodecError::invalid_data_uri("payload is not base64"))?;

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| CodecError::Base64(e.to_string()))?;

    Ok((media_type.to_string(), bytes))
}

fn rewrite_sources<F>(markup: &str, mut resolve: F) -> String
where
    F: FnMut(&str) -> Option<Vec<u8>>,
{
    let mut out = String::with_capacity(markup.len());
    let mut cache: HashMap<&str, Option<String>> = HashMap::new();
    let mut last = 0;
    let mut inlined = 0usize;
    let mut unresolved = 0usize;

    for caps in IMG_SRC.captures_iter(markup) {
        let Some(src) = caps.get(1).or_else(|| caps.get(2)) else {
            continue;
        };
        let name = src.as_str();
        if name.is_empty() || name.starts_with("data:") {
            continue;
        }

        let uri = cache
            .entry(name)
            .or_insert_with(|| resolve(name).map(|bytes| png_data_uri(&bytes)));

        match uri {
            Some(uri) => {
                out.push_str(&markup[last..src.start()]);
                out.push_str(uri);
                last = src.end();
                inlined += 1;
            }
            None => unresolved += 1,
        }
    }

    if inlined == 0 {
        if unresolved > 0 {
            debug!(unresolved, "no image references could be resolved");
        }
        return markup.to_string();
    }

    out.push_str(&markup[last..]);
    debug!(inlined, unresolved, "inlined image references");
    out
}
