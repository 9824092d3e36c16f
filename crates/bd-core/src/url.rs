//! URL decoding and canonical product URLs
//!
//! Decoding follows the browser's `decodeURIComponent`: every escape is
//! decoded and a malformed one is an error rather than being passed through.

use std::borrow::Cow;

/// Host used for canonical product links.
pub const PRODUCT_HOST: &str = "aliexpress.com";

/// Error type for percent-decoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("Malformed escape sequence at byte {offset}")]
    MalformedEscape { offset: usize },
    #[error("Decoded bytes are not valid UTF-8")]
    InvalidUtf8,
}

// =============================================================================
// Percent Decoding
// =============================================================================

#[inline]
fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Percent-decode a URL component.
///
/// Input without any `%` is returned borrowed. A `%` that is not followed by
/// two hex digits fails with [`DecodeError::MalformedEscape`], and a decoded
/// byte sequence that is not UTF-8 fails with [`DecodeError::InvalidUtf8`].
/// `+` is left alone.
pub fn decode_uri_component(input: &str) -> Result<Cow<'_, str>, DecodeError> {
    let bytes = input.as_bytes();
    let first = match bytes.iter().position(|&b| b == b'%') {
        Some(pos) => pos,
        None => return Ok(Cow::Borrowed(input)),
    };

    let mut out = Vec::with_capacity(bytes.len());
    out.extend_from_slice(&bytes[..first]);

    let mut i = first;
    while i < bytes.len() {
        let b = bytes[i];
        if b != b'%' {
            out.push(b);
            i += 1;
            continue;
        }

        let hi = bytes.get(i + 1).copied().and_then(hex_value);
        let lo = bytes.get(i + 2).copied().and_then(hex_value);
        match (hi, lo) {
            (Some(hi), Some(lo)) => {
                out.push((hi << 4) | lo);
                i += 3;
            }
            _ => return Err(DecodeError::MalformedEscape { offset: i }),
        }
    }

    String::from_utf8(out)
        .map(Cow::Owned)
        .map_err(|_| DecodeError::InvalidUtf8)
}

// =============================================================================
// Canonical URLs
// =============================================================================

/// Build the canonical item page URL for a product identifier.
#[inline]
pub fn canonical_product_url(id: &str) -> String {
    format!("https://{}/item/{}.html", PRODUCT_HOST, id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_passthrough_borrows() {
        let decoded = decode_uri_component("https://example.com/a?b=c").unwrap();
        assert!(matches!(decoded, Cow::Borrowed(_)));
        assert_eq!(decoded, "https://example.com/a?b=c");
    }

    #[test]
    fn test_decode_escapes() {
        assert_eq!(
            decode_uri_component("productIds%3D123%3Aabc").unwrap(),
            "productIds=123:abc"
        );
        assert_eq!(decode_uri_component("%253A").unwrap(), "%3A");
        assert_eq!(decode_uri_component("caf%C3%A9").unwrap(), "café");
        assert_eq!(decode_uri_component("a+b").unwrap(), "a+b");
    }

    #[test]
    fn test_decode_malformed() {
        assert_eq!(
            decode_uri_component("abc%zz"),
            Err(DecodeError::MalformedEscape { offset: 3 })
        );
        assert_eq!(
            decode_uri_component("trailing%"),
            Err(DecodeError::MalformedEscape { offset: 8 })
        );
        assert_eq!(
            decode_uri_component("half%4"),
            Err(DecodeError::MalformedEscape { offset: 4 })
        );
    }

    #[test]
    fn test_decode_invalid_utf8() {
        assert_eq!(decode_uri_component("%C3"), Err(DecodeError::InvalidUtf8));
        assert_eq!(decode_uri_component("%FF%FE"), Err(DecodeError::InvalidUtf8));
    }

    #[test]
    fn test_canonical_product_url() {
        assert_eq!(
            canonical_product_url("1005006904562409"),
            "https://aliexpress.com/item/1005006904562409.html"
        );
    }
}
