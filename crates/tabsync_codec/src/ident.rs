//! Serial escaping for URL path segments.
//!
//! Every byte outside the RFC 3986 unreserved set (`A-Z a-z 0-9 - . _ ~`) is
//! percent-encoded, including `/`, so the token always occupies exactly one
//! path segment. Callers encode once per serialization boundary; the codec
//! does not try to detect input that is already encoded.

use crate::error::{CodecError, CodecResult};

/// Encodes a serial into a path-safe token.
#[must_use]
pub fn encode_serial(serial: &str) -> String {
    urlencoding::encode(serial).into_owned()
}

/// Decodes a token produced by [`encode_serial`].
///
/// Malformed `%` sequences are kept literally. Escapes that decode to
/// invalid UTF-8 are rejected.
///
/// # Errors
///
/// Returns [`CodecError::InvalidEscape`] if the decoded bytes are not UTF-8.
pub fn decode_serial(token: &str) -> CodecResult<String> {
    urlencoding::decode(token)
        .map(|s| s.into_owned())
        .map_err(|e| CodecError::InvalidEscape {
            token: token.to_string(),
            message: e.to_string(),
        })
}

/// Decodes a token for display, replacing invalid UTF-8 with U+FFFD.
#[must_use]
pub fn decode_serial_lossy(token: &str) -> String {
    let bytes = urlencoding::decode_binary(token.as_bytes());
    String::from_utf8_lossy(&bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn encodes_reserved_characters() {
        assert_eq!(encode_serial("a/b"), "a%2Fb");
        assert_eq!(encode_serial("a b?c#d"), "a%20b%3Fc%23d");
        assert_eq!(encode_serial("x+y&z=1"), "x%2By%26z%3D1");
        assert_eq!(encode_serial("100%"), "100%25");
    }

    #[test]
    fn keeps_unreserved_characters() {
        assert_eq!(encode_serial("AZaz09-._~"), "AZaz09-._~");
    }

    #[test]
    fn empty_serial() {
        assert_eq!(encode_serial(""), "");
        assert_eq!(decode_serial("").unwrap(), "");
    }

    #[test]
    fn non_ascii_serial() {
        let token = encode_serial("사무실-PC");
        assert!(token.is_ascii());
        assert_eq!(decode_serial(&token).unwrap(), "사무실-PC");
    }

    #[test]
    fn double_encoding_is_not_detected() {
        let once = encode_serial("a/b");
        let twice = encode_serial(&once);
        assert_eq!(twice, "a%252Fb");
        assert_eq!(decode_serial(&twice).unwrap(), once);
    }

    #[test]
    fn invalid_utf8_escape() {
        let result = decode_serial("%FF%FE");
        assert!(matches!(result, Err(CodecError::InvalidEscape { .. })));
        assert_eq!(decode_serial_lossy("%FF"), "\u{FFFD}");
    }

    #[test]
    fn malformed_escape_is_literal() {
        assert_eq!(decode_serial("50%").unwrap(), "50%");
        assert_eq!(decode_serial("%zz").unwrap(), "%zz");
    }

    proptest! {
        #[test]
        fn roundtrip_any_string(s in any::<String>()) {
            let token = encode_serial(&s);
            prop_assert!(!token.contains('/'));
            prop_assert_eq!(decode_serial(&token).unwrap(), s);
        }
    }
}
