//! Product identifier extraction
//!
//! Identifiers show up in several URL shapes. The rules below run in order
//! over the decoded URL and the first hit wins, so the most specific shapes
//! are tried before the bare digit-run fallback.
//!
//! Case-insensitive parts fold ASCII only (`-u`), so look-alikes such as
//! U+017F LATIN SMALL LETTER LONG S never stand in for `s`.

use std::sync::OnceLock;

use regex::Regex;

use crate::url::{canonical_product_url, decode_uri_component};

static RE_PRODUCT_IDS: OnceLock<Regex> = OnceLock::new();
static RE_LEADING_DIGITS: OnceLock<Regex> = OnceLock::new();
static RE_OBJECT_MARKER: OnceLock<Regex> = OnceLock::new();
static RE_ITEM_PATH: OnceLock<Regex> = OnceLock::new();
static RE_PRODUCT_PARAM: OnceLock<Regex> = OnceLock::new();
static RE_LONG_DIGITS: OnceLock<Regex> = OnceLock::new();

fn re_product_ids() -> &'static Regex {
    RE_PRODUCT_IDS.get_or_init(|| Regex::new(r"(?i-u:[?&]productIds=)([^&]+)").expect("compile RE_PRODUCT_IDS"))
}

fn re_leading_digits() -> &'static Regex {
    RE_LEADING_DIGITS.get_or_init(|| Regex::new(r"[0-9]{6,}").expect("compile RE_LEADING_DIGITS"))
}

// The class holds ':' plus the characters of its double-encoded form "%253A".
fn re_object_marker() -> &'static Regex {
    RE_OBJECT_MARKER
        .get_or_init(|| Regex::new(r"(?i-u:x_object_id[:%253A]+)([0-9]{6,})").expect("compile RE_OBJECT_MARKER"))
}

fn re_item_path() -> &'static Regex {
    RE_ITEM_PATH.get_or_init(|| Regex::new(r"(?i-u:/item/([0-9]{6,})\.html)").expect("compile RE_ITEM_PATH"))
}

fn re_product_param() -> &'static Regex {
    RE_PRODUCT_PARAM.get_or_init(|| {
        Regex::new(r"(?i-u:[?&](?:productId|object_id)=?([0-9]{6,}))").expect("compile RE_PRODUCT_PARAM")
    })
}

fn re_long_digits() -> &'static Regex {
    RE_LONG_DIGITS.get_or_init(|| Regex::new(r"[0-9]{10,16}").expect("compile RE_LONG_DIGITS"))
}

/// Which rule produced an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractRule {
    /// `productIds=<id>:...`
    ProductIds,
    /// `x_object_id:<id>` or its double-encoded form
    ObjectMarker,
    /// `/item/<id>.html`
    ItemPath,
    /// `productId=<id>` or `object_id=<id>`
    ProductParam,
    /// First run of 10-16 digits anywhere
    LongDigits,
}

/// An extracted identifier and the rule that found it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub id: String,
    pub rule: ExtractRule,
}

/// Run the rule chain over an already decoded URL.
pub fn extract_from_decoded(decoded: &str) -> Option<Extraction> {
    let hit = |id: &str, rule| Some(Extraction { id: id.to_string(), rule });

    if let Some(caps) = re_product_ids().captures(decoded) {
        let value = &caps[1];
        let head = value.split(':').next().unwrap_or(value);
        if let Some(m) = re_leading_digits().find(head) {
            return hit(m.as_str(), ExtractRule::ProductIds);
        }
    }

    if let Some(caps) = re_object_marker().captures(decoded) {
        return hit(&caps[1], ExtractRule::ObjectMarker);
    }

    if let Some(caps) = re_item_path().captures(decoded) {
        return hit(&caps[1], ExtractRule::ItemPath);
    }

    if let Some(caps) = re_product_param().captures(decoded) {
        return hit(&caps[1], ExtractRule::ProductParam);
    }

    re_long_digits()
        .find(decoded)
        .and_then(|m| hit(m.as_str(), ExtractRule::LongDigits))
}

/// Decode a raw URL and extract its product identifier with the matching rule.
pub fn extract_with_rule(url: Option<&str>) -> Option<Extraction> {
    let url = url.filter(|url| !url.is_empty())?;
    match decode_uri_component(url) {
        Ok(decoded) => extract_from_decoded(&decoded),
        Err(e) => {
            log::warn!("extract_ali_id: cannot decode {:?}: {}", url, e);
            None
        }
    }
}

/// Extract the product identifier from a raw link URL.
pub fn extract_ali_id(url: Option<&str>) -> Option<String> {
    extract_with_rule(url).map(|extraction| extraction.id)
}

/// Canonical item page for a link, if an identifier can be extracted.
pub fn product_url_for(url: Option<&str>) -> Option<String> {
    extract_ali_id(url).map(|id| canonical_product_url(&id))
}
