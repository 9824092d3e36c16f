//! Click redirection decisions

use crate::extract::product_url_for;
use crate::matcher::is_bundle_deal_url;
use crate::settings::Settings;
use crate::types::ClickAction;

/// Decide what to do with a click whose nearest anchor has `href`.
///
/// `href` is `None` when the click did not land inside an anchor. A bundle
/// link without an extractable identifier is still cancelled, so the user
/// never lands on the bundle page while redirection is on.
pub fn decide_click(settings: &Settings, href: Option<&str>) -> ClickAction {
    if !settings.auto_redirect_enabled {
        return ClickAction::PassThrough;
    }
    if !is_bundle_deal_url(href) {
        return ClickAction::PassThrough;
    }
    match product_url_for(href) {
        Some(url) => ClickAction::Open(url),
        None => ClickAction::Cancel,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn redirecting() -> Settings {
        Settings {
            auto_redirect_enabled: true,
            ..Settings::default()
        }
    }

    #[test]
    fn test_disabled_passes_through() {
        let href = Some("https://www.aliexpress.com/p?productIds=1005006904562409:1");
        assert_eq!(decide_click(&Settings::default(), href), ClickAction::PassThrough);
    }

    #[test]
    fn test_bundle_link_opens_canonical_page() {
        let href = Some("https://www.aliexpress.com/p?productIds=1005006904562409:1");
        assert_eq!(
            decide_click(&redirecting(), href),
            ClickAction::Open("https://aliexpress.com/item/1005006904562409.html".to_string())
        );
    }

    #[test]
    fn test_bundle_link_without_id_is_cancelled() {
        let href = Some("https://www.aliexpress.com/gcp/BundleDeals/index.html");
        assert_eq!(decide_click(&redirecting(), href), ClickAction::Cancel);
    }

    #[test]
    fn test_other_links_pass_through() {
        let settings = redirecting();
        assert_eq!(
            decide_click(&settings, Some("https://www.aliexpress.com/item/1005006904562409.html")),
            ClickAction::PassThrough
        );
        assert_eq!(decide_click(&settings, None), ClickAction::PassThrough);
        assert_eq!(decide_click(&settings, Some("/BundleDeals%")), ClickAction::PassThrough);
    }
}
