//! Highlight Engine
//!
//! Marks bundle-deal anchors in a document and styles them according to the
//! current settings. The document is reached through [`LinkDocument`], so the
//! engine runs the same against the browser DOM and against test doubles.
//!
//! Which links are highlighted is never tracked here: the marker attribute
//! on each element is the only record, and [`LinkDocument::marked_links`]
//! queries it directly.

use crate::matcher::is_bundle_deal_url;
use crate::settings::{Settings, SettingsChanges};
use crate::style::{
    declarations, COLOR_PROPERTY, HIGHLIGHT_CLASS, MARKER_ATTRIBUTE, MARKER_VALUE, PAGE_CORNER_RADIUS,
    STYLE_PROPERTIES,
};
use crate::types::ScanReport;

// =============================================================================
// Document Abstraction
// =============================================================================

/// An anchor element the engine can inspect and restyle.
pub trait LinkElement {
    /// Raw `href` attribute, as written in the markup.
    fn href(&self) -> Option<String>;
    fn add_class(&self, class: &str);
    fn remove_class(&self, class: &str);
    fn set_attribute(&self, name: &str, value: &str);
    fn remove_attribute(&self, name: &str);
    fn set_style_property(&self, property: &str, value: &str);
    fn remove_style_property(&self, property: &str);
}

/// A document holding anchor elements.
pub trait LinkDocument {
    type Link: LinkElement;

    /// All anchors carrying an `href` attribute.
    fn links(&self) -> Vec<Self::Link>;

    /// All anchors currently carrying the highlight marker.
    fn marked_links(&self) -> Vec<Self::Link>;
}

// =============================================================================
// Element Operations
// =============================================================================

/// Mark and style one element.
pub fn mark<L: LinkElement>(link: &L, settings: &Settings) {
    link.add_class(HIGHLIGHT_CLASS);
    link.set_attribute(MARKER_ATTRIBUTE, MARKER_VALUE);
    for decl in declarations(settings.highlight_style, &settings.highlight_color, PAGE_CORNER_RADIUS) {
        link.set_style_property(decl.property, &decl.value);
    }
}

/// Remove every trace of [`mark`] from one element.
pub fn unmark<L: LinkElement>(link: &L) {
    link.remove_class(HIGHLIGHT_CLASS);
    link.remove_attribute(MARKER_ATTRIBUTE);
    for property in STYLE_PROPERTIES {
        link.remove_style_property(property);
    }
    link.remove_style_property(COLOR_PROPERTY);
}

// =============================================================================
// Engine
// =============================================================================

/// Highlight state machine driven by document and settings events.
#[derive(Debug, Clone, Default)]
pub struct Highlighter {
    settings: Settings,
}

impl Highlighter {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Style every matching anchor. Re-running on an unchanged document
    /// re-applies the same values.
    pub fn scan<D: LinkDocument>(&self, doc: &D) -> ScanReport {
        let mut report = ScanReport::default();
        for link in doc.links() {
            report.examined += 1;
            let href = link.href();
            if is_bundle_deal_url(href.as_deref()) {
                mark(&link, &self.settings);
                report.highlighted += 1;
            }
        }
        report
    }

    /// Clear every marked anchor. Returns how many were cleared.
    pub fn unscan<D: LinkDocument>(&self, doc: &D) -> usize {
        let marked = doc.marked_links();
        for link in &marked {
            unmark(link);
        }
        marked.len()
    }

    /// Stored settings arrived: adopt them, clear anything marked under the
    /// startup defaults, then scan if enabled.
    pub fn load<D: LinkDocument>(&mut self, settings: Settings, doc: &D) -> Option<ScanReport> {
        self.settings = settings;
        self.replace_settings(doc)
    }

    /// Settings changed: always clear first so no stale style survives, then
    /// rescan if still enabled.
    pub fn apply_changes<D: LinkDocument>(&mut self, changes: &SettingsChanges, doc: &D) -> Option<ScanReport> {
        self.settings.apply(changes);
        self.replace_settings(doc)
    }

    /// The document subtree changed.
    pub fn on_mutation<D: LinkDocument>(&self, doc: &D) -> Option<ScanReport> {
        self.scan_if_enabled(doc)
    }

    fn replace_settings<D: LinkDocument>(&self, doc: &D) -> Option<ScanReport> {
        let cleared = self.unscan(doc);
        log::debug!("cleared {} highlighted links", cleared);
        self.scan_if_enabled(doc)
    }

    fn scan_if_enabled<D: LinkDocument>(&self, doc: &D) -> Option<ScanReport> {
        if self.settings.highlight_enabled {
            Some(self.scan(doc))
        } else {
            None
        }
    }
}

// =============================================================================
// Test Document
// =============================================================================


#[cfg(test)]
mod tests {
    use super::fake::*;
    use super::*;
    use crate::settings::SettingsKeys;
    use crate::types::HighlightStyle;
    use serde_json::json;

    const BUNDLE: &str = "https://www.aliexpress.com/ssr/300000512/BundleDeals2?productIds=1005006904562409:1";
    const BUNDLE_2: &str = "https://www.aliexpress.com/gcp/BUNDLEDEALS/index.html";
    const PLAIN: &str = "https://www.aliexpress.com/item/1005006904562409.html";

    fn doc() -> FakeDocument {
        FakeDocument::with_hrefs(&[Some(BUNDLE), Some(PLAIN), None, Some(BUNDLE_2), Some("%zz")])
    }

    #[test]
    fn test_scan_marks_only_bundle_links() {
        let doc = doc();
        let report = Highlighter::default().scan(&doc);
        assert_eq!(report, ScanReport { examined: 4, highlighted: 2 });

        let link = doc.link(0);
        assert!(link.is_marked());
        assert_eq!(link.classes(), vec![HIGHLIGHT_CLASS.to_string()]);
        assert_eq!(link.style("border"), "2px solid #ff4444");
        assert_eq!(link.style("border-radius"), "4px");
        assert_eq!(link.style(COLOR_PROPERTY), "#ff4444");

        for idx in [1, 2, 4] {
            let untouched = doc.link(idx);
            assert!(!untouched.is_marked());
            assert!(untouched.classes().is_empty());
            assert!(untouched.style_names().is_empty());
        }
    }

    #[test]
    fn test_scan_is_idempotent() {
        let doc = doc();
        let engine = Highlighter::default();
        engine.scan(&doc);
        let once: Vec<_> = (0..5).map(|i| (doc.link(i).classes(), doc.link(i).style_names())).collect();
        engine.scan(&doc);
        let twice: Vec<_> = (0..5).map(|i| (doc.link(i).classes(), doc.link(i).style_names())).collect();
        assert_eq!(once, twice);
        assert_eq!(doc.link(0).classes().len(), 1);
    }

    #[test]
    fn test_unscan_restores_every_property() {
        let doc = doc();
        for style in HighlightStyle::ALL {
            let engine = Highlighter::new(Settings {
                highlight_style: style,
                ..Settings::default()
            });
            engine.scan(&doc);
            assert_eq!(engine.unscan(&doc), 2);

            for idx in 0..5 {
                let link = doc.link(idx);
                assert!(!link.is_marked());
                assert!(link.classes().is_empty());
                for property in STYLE_PROPERTIES {
                    assert_eq!(link.style(property), "");
                }
                assert_eq!(link.style(COLOR_PROPERTY), "");
            }
        }
    }

    #[test]
    fn test_underline_scenario() {
        let doc = doc();
        let engine = Highlighter::new(Settings {
            highlight_style: HighlightStyle::Underline,
            highlight_color: "#00ff00".to_string(),
            ..Settings::default()
        });
        engine.scan(&doc);

        let link = doc.link(0);
        assert_eq!(link.style("border-bottom"), "3px solid #00ff00");
        assert_eq!(link.style("border"), "");
        assert_eq!(link.style("outline"), "");
        assert_eq!(link.style("background-color"), "");
    }

    #[test]
    fn test_load_respects_enabled_flag() {
        let doc = doc();
        let mut engine = Highlighter::default();
        let disabled = Settings {
            highlight_enabled: false,
            ..Settings::default()
        };
        assert_eq!(engine.load(disabled, &doc), None);
        assert_eq!(doc.marked_count(), 0);

        let report = engine.load(Settings::default(), &doc).unwrap();
        assert_eq!(report.highlighted, 2);
    }

    #[test]
    fn test_style_change_leaves_no_stale_properties() {
        let doc = doc();
        let mut engine = Highlighter::default();
        engine.load(Settings::default(), &doc);
        assert_eq!(doc.link(0).style("border"), "2px solid #ff4444");

        let changes = SettingsChanges::from_storage_event(&json!({
            "highlightStyle": { "newValue": "outline" },
        }));
        engine.apply_changes(&changes, &doc);

        let link = doc.link(0);
        assert_eq!(link.style("border"), "");
        assert_eq!(link.style("border-radius"), "");
        assert_eq!(link.style("outline"), "2px solid #ff4444");
        assert_eq!(link.style("outline-offset"), "2px");
    }

    #[test]
    fn test_disable_clears_and_stops_rescans() {
        let doc = doc();
        let mut engine = Highlighter::default();
        engine.load(Settings::default(), &doc);
        assert_eq!(doc.marked_count(), 2);

        let changes = SettingsChanges::from_storage_event(&json!({
            "highlightEnabled": { "oldValue": true, "newValue": false },
        }));
        assert_eq!(changes.keys, SettingsKeys::HIGHLIGHT_ENABLED);
        assert_eq!(engine.apply_changes(&changes, &doc), None);
        assert_eq!(doc.marked_count(), 0);

        doc.push(Some(BUNDLE));
        assert_eq!(engine.on_mutation(&doc), None);
        assert_eq!(doc.marked_count(), 0);
    }

    #[test]
    fn test_mutation_picks_up_injected_links() {
        let doc = doc();
        let mut engine = Highlighter::default();
        engine.load(Settings::default(), &doc);

        let injected = doc.push(Some("/p?productIds=1005001234567890"));
        assert!(!injected.is_marked());
        let report = engine.on_mutation(&doc).unwrap();
        assert_eq!(report.highlighted, 3);
        assert!(injected.is_marked());
    }

    #[test]
    fn test_reload_recolors() {
        let doc = doc();
        let mut engine = Highlighter::default();
        engine.load(Settings::default(), &doc);
        engine.load(
            Settings {
                highlight_style: HighlightStyle::Background,
                highlight_color: "#0f0".to_string(),
                ..Settings::default()
            },
            &doc,
        );
        let link = doc.link(0);
        assert_eq!(link.style("background-color"), "#00ff0033");
        assert_eq!(link.style(COLOR_PROPERTY), "#0f0");
        assert_eq!(link.style("border"), "");
    }

    #[test]
    fn test_load_clears_marks_made_under_defaults() {
        let doc = doc();
        let mut engine = Highlighter::new(Settings::default());
        engine.on_mutation(&doc);
        assert_eq!(doc.marked_count(), 2);

        let disabled = Settings {
            highlight_enabled: false,
            ..Settings::default()
        };
        assert_eq!(engine.load(disabled, &doc), None);
        assert_eq!(doc.marked_count(), 0);
        let link = doc.link(0);
        assert!(link.classes().is_empty());
        assert!(link.style_names().is_empty());
    }

    #[test]
    fn test_load_replaces_default_style() {
        let doc = doc();
        let mut engine = Highlighter::new(Settings::default());
        engine.on_mutation(&doc);
        assert_eq!(doc.link(0).style("border"), "2px solid #ff4444");

        let report = engine
            .load(
                Settings {
                    highlight_style: HighlightStyle::Underline,
                    highlight_color: "#00ff00".to_string(),
                    ..Settings::default()
                },
                &doc,
            )
            .unwrap();
        assert_eq!(report.highlighted, 2);

        let link = doc.link(0);
        assert_eq!(link.style("border"), "");
        assert_eq!(link.style("border-radius"), "");
        assert_eq!(link.style("border-bottom"), "3px solid #00ff00");
        assert_eq!(link.style(COLOR_PROPERTY), "#00ff00");
    }
}
