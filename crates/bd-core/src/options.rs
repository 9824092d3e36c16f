//! Options page model
//!
//! Mirrors the form controls on the options page. The wasm layer reads the
//! controls into an [`OptionsForm`], and renders what this module returns.

use crate::settings::Settings;
use crate::style::{declarations, PREVIEW_CORNER_RADIUS};
use crate::types::{HighlightStyle, StyleDecl};

/// Element ids on the options page.
pub mod ids {
    pub const HIGHLIGHT_ENABLED: &str = "highlightEnabled";
    pub const AUTO_REDIRECT_ENABLED: &str = "autoRedirectEnabled";
    pub const HIGHLIGHT_STYLE: &str = "highlightStyle";
    pub const HIGHLIGHT_COLOR: &str = "highlightColor";
    pub const COLOR_VALUE: &str = "colorValue";
    pub const PREVIEW_LINK: &str = "previewLink";
    pub const SAVE_BUTTON: &str = "saveButton";
    pub const RESET_BUTTON: &str = "resetButton";
    pub const SAVE_MESSAGE: &str = "saveMessage";
    pub const STYLE_SETTINGS: &str = "styleSettings";
    pub const COLOR_SETTINGS: &str = "colorSettings";
}

/// Class toggled on setting sections while highlighting is off.
pub const DISABLED_CLASS: &str = "disabled";

/// How long a save message stays visible.
pub const SAVE_MESSAGE_TIMEOUT_MS: i32 = 3000;

/// Current state of the form controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionsForm {
    pub highlight_enabled: bool,
    pub auto_redirect_enabled: bool,
    pub highlight_style: HighlightStyle,
    pub highlight_color: String,
}

impl From<&Settings> for OptionsForm {
    fn from(settings: &Settings) -> Self {
        Self {
            highlight_enabled: settings.highlight_enabled,
            auto_redirect_enabled: settings.auto_redirect_enabled,
            highlight_style: settings.highlight_style,
            highlight_color: settings.highlight_color.clone(),
        }
    }
}

impl OptionsForm {
    /// Build from raw control values. An unknown style value falls back to
    /// the default style.
    pub fn from_controls(highlight_enabled: bool, auto_redirect_enabled: bool, style: &str, color: &str) -> Self {
        Self {
            highlight_enabled,
            auto_redirect_enabled,
            highlight_style: style.parse().unwrap_or_default(),
            highlight_color: color.to_string(),
        }
    }

    pub fn to_settings(&self) -> Settings {
        Settings {
            highlight_enabled: self.highlight_enabled,
            highlight_color: self.highlight_color.clone(),
            highlight_style: self.highlight_style,
            auto_redirect_enabled: self.auto_redirect_enabled,
        }
    }

    /// Declarations for the preview link, or `None` when highlighting is off
    /// and the preview should show a plain link.
    pub fn preview(&self) -> Option<Vec<StyleDecl>> {
        if !self.highlight_enabled {
            return None;
        }
        Some(declarations(self.highlight_style, &self.highlight_color, PREVIEW_CORNER_RADIUS))
    }

    /// Whether the style and colour sections should be greyed out.
    pub fn sections_disabled(&self) -> bool {
        !self.highlight_enabled
    }
}

// =============================================================================
// Save Messages
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

impl MessageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Transient status line under the form buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveMessage {
    pub text: String,
    pub kind: MessageKind,
}

impl SaveMessage {
    pub fn saved() -> Self {
        Self {
            text: "Settings saved successfully!".to_string(),
            kind: MessageKind::Success,
        }
    }

    pub fn reset() -> Self {
        Self {
            text: "Settings reset to defaults!".to_string(),
            kind: MessageKind::Success,
        }
    }

    pub fn save_failed(error: &str) -> Self {
        Self {
            text: format!("Error saving settings: {}", error),
            kind: MessageKind::Error,
        }
    }

    /// Class attribute while the message is shown.
    pub fn class_name(&self) -> String {
        format!("save-message show {}", self.kind.as_str())
    }
}
