//! Bundle-deal link classification
//!
//! Runs once per anchor on every scan, so it avoids regex and allocations
//! beyond the decode itself.

use crate::url::decode_uri_component;

/// Path marker used by bundle-deal landing pages.
pub const BUNDLE_DEALS_MARKER: &str = "BundleDeals";

/// Query marker carrying the bundled product list.
pub const PRODUCT_IDS_MARKER: &str = "productIds=";

/// Find `needle` in `haystack`, ignoring ASCII case.
#[inline]
pub(crate) fn find_ascii_ci(haystack: &str, needle: &str) -> Option<usize> {
    let hay = haystack.as_bytes();
    let needle = needle.as_bytes();
    if needle.is_empty() {
        return Some(0);
    }
    if hay.len() < needle.len() {
        return None;
    }
    (0..=hay.len() - needle.len()).find(|&i| hay[i..i + needle.len()].eq_ignore_ascii_case(needle))
}

/// Check whether a link URL points at a bundle deal.
///
/// Empty input and malformed escapes are treated as non-matches.
pub fn is_bundle_deal_url(url: Option<&str>) -> bool {
    let url = match url {
        Some(url) if !url.is_empty() => url,
        _ => return false,
    };

    let decoded = match decode_uri_component(url) {
        Ok(decoded) => decoded,
        Err(_) => return false,
    };

    find_ascii_ci(&decoded, BUNDLE_DEALS_MARKER).is_some()
        || find_ascii_ci(&decoded, PRODUCT_IDS_MARKER).is_some()
}
