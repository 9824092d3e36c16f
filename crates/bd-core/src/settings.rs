//! Settings model
//!
//! The persisted record has four keys. Storage may hand back any subset of
//! them, possibly with wrong types, so reads go through [`StoredSettings`]
//! and are turned into a complete [`Settings`] by one of two policies:
//! [`Settings::backfill`] (startup, falsy values replaced) or
//! [`Settings::merged`] (page scripts, stored values win).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ts_rs::TS;

use crate::types::HighlightStyle;

/// Storage key names.
pub mod keys {
    pub const HIGHLIGHT_ENABLED: &str = "highlightEnabled";
    pub const HIGHLIGHT_COLOR: &str = "highlightColor";
    pub const HIGHLIGHT_STYLE: &str = "highlightStyle";
    pub const AUTO_REDIRECT_ENABLED: &str = "autoRedirectEnabled";

    pub const ALL: [&str; 4] = [HIGHLIGHT_ENABLED, HIGHLIGHT_COLOR, HIGHLIGHT_STYLE, AUTO_REDIRECT_ENABLED];
}

/// Default highlight colour.
pub const DEFAULT_HIGHLIGHT_COLOR: &str = "#ff4444";

// =============================================================================
// Settings
// =============================================================================

/// Complete user configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Settings {
    pub highlight_enabled: bool,
    pub highlight_color: String,
    pub highlight_style: HighlightStyle,
    pub auto_redirect_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            highlight_enabled: true,
            highlight_color: DEFAULT_HIGHLIGHT_COLOR.to_string(),
            highlight_style: HighlightStyle::Border,
            auto_redirect_enabled: false,
        }
    }
}

impl Settings {
    /// Complete a stored record, replacing absent or falsy values with defaults.
    ///
    /// `highlightEnabled == false`, an empty colour and an empty or unknown
    /// style all count as falsy. `autoRedirectEnabled` is only filled when
    /// absent, since `false` is a meaningful choice there. The flag reports
    /// whether anything was filled in.
    pub fn backfill(stored: &StoredSettings) -> (Self, bool) {
        let defaults = Self::default();
        let mut filled = false;

        let highlight_enabled = match stored.highlight_enabled {
            Some(true) => true,
            _ => {
                filled = true;
                defaults.highlight_enabled
            }
        };

        let highlight_color = match stored.highlight_color.as_deref() {
            Some(color) if !color.is_empty() => color.to_string(),
            _ => {
                filled = true;
                defaults.highlight_color
            }
        };

        let highlight_style = match stored.style() {
            Some(style) => style,
            None => {
                filled = true;
                defaults.highlight_style
            }
        };

        let auto_redirect_enabled = match stored.auto_redirect_enabled {
            Some(enabled) => enabled,
            None => {
                filled = true;
                defaults.auto_redirect_enabled
            }
        };

        let settings = Self {
            highlight_enabled,
            highlight_color,
            highlight_style,
            auto_redirect_enabled,
        };
        (settings, filled)
    }

    /// Overlay a stored record on the defaults, field by field.
    pub fn merged(stored: &StoredSettings) -> Self {
        let mut settings = Self::default();
        settings.overlay(stored, SettingsKeys::ALL);
        settings
    }

    /// Apply a storage change notification.
    pub fn apply(&mut self, changes: &SettingsChanges) {
        self.overlay(&changes.values, changes.keys);
    }

    fn overlay(&mut self, stored: &StoredSettings, mask: SettingsKeys) {
        let defaults = Self::default();

        if mask.contains(SettingsKeys::HIGHLIGHT_ENABLED) {
            self.highlight_enabled = stored.highlight_enabled.unwrap_or(defaults.highlight_enabled);
        }
        if mask.contains(SettingsKeys::HIGHLIGHT_COLOR) {
            self.highlight_color = stored
                .highlight_color
                .clone()
                .unwrap_or(defaults.highlight_color);
        }
        if mask.contains(SettingsKeys::HIGHLIGHT_STYLE) {
            self.highlight_style = match stored.highlight_style.as_deref() {
                None => defaults.highlight_style,
                Some(raw) => raw.parse().unwrap_or_else(|_| {
                    log::warn!("unknown highlight style {:?}, using {}", raw, defaults.highlight_style);
                    defaults.highlight_style
                }),
            };
        }
        if mask.contains(SettingsKeys::AUTO_REDIRECT_ENABLED) {
            self.auto_redirect_enabled = stored
                .auto_redirect_enabled
                .unwrap_or(defaults.auto_redirect_enabled);
        }
    }

    /// Keys whose values differ between `self` and `other`, with `other`'s values.
    pub fn diff(&self, other: &Settings) -> SettingsChanges {
        let mut keys = SettingsKeys::empty();
        if self.highlight_enabled != other.highlight_enabled {
            keys |= SettingsKeys::HIGHLIGHT_ENABLED;
        }
        if self.highlight_color != other.highlight_color {
            keys |= SettingsKeys::HIGHLIGHT_COLOR;
        }
        if self.highlight_style != other.highlight_style {
            keys |= SettingsKeys::HIGHLIGHT_STYLE;
        }
        if self.auto_redirect_enabled != other.auto_redirect_enabled {
            keys |= SettingsKeys::AUTO_REDIRECT_ENABLED;
        }
        SettingsChanges {
            keys,
            values: StoredSettings::from(other),
        }
    }

    /// Serialize as a storage record.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

// =============================================================================
// Stored Settings
// =============================================================================

/// A settings record as read back from storage.
///
/// Values of the wrong JSON type are dropped, as if absent. The style is kept
/// as a raw string so that unknown names can be told apart from missing ones.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StoredSettings {
    pub highlight_enabled: Option<bool>,
    pub highlight_color: Option<String>,
    pub highlight_style: Option<String>,
    pub auto_redirect_enabled: Option<bool>,
}

impl StoredSettings {
    /// Read a storage record. Non-object input reads as empty.
    pub fn from_json(value: &Value) -> Self {
        match value.as_object() {
            Some(map) => Self::from_map(map),
            None => Self::default(),
        }
    }

    fn from_map(map: &Map<String, Value>) -> Self {
        Self {
            highlight_enabled: map.get(keys::HIGHLIGHT_ENABLED).and_then(Value::as_bool),
            highlight_color: map
                .get(keys::HIGHLIGHT_COLOR)
                .and_then(Value::as_str)
                .map(str::to_string),
            highlight_style: map
                .get(keys::HIGHLIGHT_STYLE)
                .and_then(Value::as_str)
                .map(str::to_string),
            auto_redirect_enabled: map.get(keys::AUTO_REDIRECT_ENABLED).and_then(Value::as_bool),
        }
    }

    /// The stored style, if present and recognised.
    pub fn style(&self) -> Option<HighlightStyle> {
        self.highlight_style.as_deref().and_then(|raw| raw.parse().ok())
    }
}

impl From<&Settings> for StoredSettings {
    fn from(settings: &Settings) -> Self {
        Self {
            highlight_enabled: Some(settings.highlight_enabled),
            highlight_color: Some(settings.highlight_color.clone()),
            highlight_style: Some(settings.highlight_style.as_str().to_string()),
            auto_redirect_enabled: Some(settings.auto_redirect_enabled),
        }
    }
}

// =============================================================================
// Change Notifications
// =============================================================================

bitflags::bitflags! {
    /// Settings keys touched by a change.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SettingsKeys: u8 {
        const HIGHLIGHT_ENABLED = 1 << 0;
        const HIGHLIGHT_COLOR = 1 << 1;
        const HIGHLIGHT_STYLE = 1 << 2;
        const AUTO_REDIRECT_ENABLED = 1 << 3;

        const ALL = Self::HIGHLIGHT_ENABLED.bits()
            | Self::HIGHLIGHT_COLOR.bits()
            | Self::HIGHLIGHT_STYLE.bits()
            | Self::AUTO_REDIRECT_ENABLED.bits();
    }
}

impl SettingsKeys {
    /// Flag for a storage key name.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            keys::HIGHLIGHT_ENABLED => Some(Self::HIGHLIGHT_ENABLED),
            keys::HIGHLIGHT_COLOR => Some(Self::HIGHLIGHT_COLOR),
            keys::HIGHLIGHT_STYLE => Some(Self::HIGHLIGHT_STYLE),
            keys::AUTO_REDIRECT_ENABLED => Some(Self::AUTO_REDIRECT_ENABLED),
            _ => None,
        }
    }
}

/// A batch of changed keys and their new values.
///
/// A key in `keys` with no value in `values` was removed from storage and
/// reverts to its default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsChanges {
    pub keys: SettingsKeys,
    pub values: StoredSettings,
}

impl SettingsChanges {
    /// Parse a `{ key: { oldValue, newValue } }` storage change object.
    /// Keys outside the settings record are ignored.
    pub fn from_storage_event(changes: &Value) -> Self {
        let mut keys = SettingsKeys::empty();
        let mut new_values = Map::new();

        if let Some(map) = changes.as_object() {
            for (key, change) in map {
                let Some(flag) = SettingsKeys::from_key(key) else {
                    continue;
                };
                keys |= flag;
                if let Some(value) = change.get("newValue") {
                    new_values.insert(key.clone(), value.clone());
                }
            }
        }

        Self {
            keys,
            values: StoredSettings::from_map(&new_values),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(settings.highlight_enabled);
        assert_eq!(settings.highlight_color, "#ff4444");
        assert_eq!(settings.highlight_style, HighlightStyle::Border);
        assert!(!settings.auto_redirect_enabled);
    }

    #[test]
    fn test_serialized_keys_are_camel_case() {
        let value = Settings::default().to_json();
        assert_eq!(
            value,
            json!({
                "highlightEnabled": true,
                "highlightColor": "#ff4444",
                "highlightStyle": "border",
                "autoRedirectEnabled": false,
            })
        );
    }

    #[test]
    fn test_stored_drops_wrong_types() {
        let stored = StoredSettings::from_json(&json!({
            "highlightEnabled": "yes",
            "highlightColor": 7,
            "highlightStyle": "outline",
            "autoRedirectEnabled": true,
            "unrelated": 1,
        }));
        assert_eq!(stored.highlight_enabled, None);
        assert_eq!(stored.highlight_color, None);
        assert_eq!(stored.style(), Some(HighlightStyle::Outline));
        assert_eq!(stored.auto_redirect_enabled, Some(true));

        assert_eq!(StoredSettings::from_json(&json!(null)), StoredSettings::default());
    }

    #[test]
    fn test_backfill_empty_record() {
        let (settings, filled) = Settings::backfill(&StoredSettings::default());
        assert_eq!(settings, Settings::default());
        assert!(filled);
    }

    #[test]
    fn test_backfill_keeps_complete_record() {
        let stored = StoredSettings::from_json(&json!({
            "highlightEnabled": true,
            "highlightColor": "#00ff00",
            "highlightStyle": "underline",
            "autoRedirectEnabled": true,
        }));
        let (settings, filled) = Settings::backfill(&stored);
        assert!(!filled);
        assert_eq!(settings.highlight_color, "#00ff00");
        assert_eq!(settings.highlight_style, HighlightStyle::Underline);
        assert!(settings.auto_redirect_enabled);
    }

    #[test]
    fn test_backfill_replaces_falsy_but_keeps_redirect_false() {
        let stored = StoredSettings::from_json(&json!({
            "highlightEnabled": false,
            "highlightColor": "",
            "highlightStyle": "dotted",
            "autoRedirectEnabled": false,
        }));
        let (settings, filled) = Settings::backfill(&stored);
        assert!(filled);
        assert!(settings.highlight_enabled);
        assert_eq!(settings.highlight_color, DEFAULT_HIGHLIGHT_COLOR);
        assert_eq!(settings.highlight_style, HighlightStyle::Border);
        assert!(!settings.auto_redirect_enabled);
    }

    #[test]
    fn test_merged_lets_stored_values_win() {
        let stored = StoredSettings::from_json(&json!({
            "highlightEnabled": false,
            "highlightStyle": "background",
        }));
        let settings = Settings::merged(&stored);
        assert!(!settings.highlight_enabled);
        assert_eq!(settings.highlight_style, HighlightStyle::Background);
        assert_eq!(settings.highlight_color, DEFAULT_HIGHLIGHT_COLOR);
    }

    #[test]
    fn test_storage_event_parsing() {
        let changes = SettingsChanges::from_storage_event(&json!({
            "highlightColor": { "oldValue": "#ff4444", "newValue": "#00ff00" },
            "highlightEnabled": { "oldValue": true, "newValue": false },
            "somethingElse": { "newValue": 3 },
        }));
        assert_eq!(
            changes.keys,
            SettingsKeys::HIGHLIGHT_COLOR | SettingsKeys::HIGHLIGHT_ENABLED
        );

        let mut settings = Settings::default();
        settings.apply(&changes);
        assert!(!settings.highlight_enabled);
        assert_eq!(settings.highlight_color, "#00ff00");
        assert_eq!(settings.highlight_style, HighlightStyle::Border);
    }

    #[test]
    fn test_removed_key_reverts_to_default() {
        let mut settings = Settings {
            auto_redirect_enabled: true,
            ..Settings::default()
        };
        let changes = SettingsChanges::from_storage_event(&json!({
            "autoRedirectEnabled": { "oldValue": true },
        }));
        assert_eq!(changes.keys, SettingsKeys::AUTO_REDIRECT_ENABLED);
        settings.apply(&changes);
        assert!(!settings.auto_redirect_enabled);
    }

    #[test]
    fn test_diff() {
        let old = Settings::default();
        let new = Settings {
            highlight_style: HighlightStyle::Outline,
            ..Settings::default()
        };
        let changes = old.diff(&new);
        assert_eq!(changes.keys, SettingsKeys::HIGHLIGHT_STYLE);
        assert!(old.diff(&old).is_empty());

        let mut applied = old.clone();
        applied.apply(&changes);
        assert_eq!(applied, new);
    }
}
