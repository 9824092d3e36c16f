//! Shared type definitions
//!
//! These cross the wasm boundary as plain strings, so every enum here has a
//! stable lowercase name.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Highlight Style
// =============================================================================

/// Visual treatment applied to a highlighted link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum HighlightStyle {
    /// Solid border with rounded corners
    #[default]
    Border,
    /// Translucent fill with rounded corners
    Background,
    /// Outline ring offset from the box
    Outline,
    /// Bottom border only
    Underline,
}

impl HighlightStyle {
    pub const ALL: [HighlightStyle; 4] = [Self::Border, Self::Background, Self::Outline, Self::Underline];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Border => "border",
            Self::Background => "background",
            Self::Outline => "outline",
            Self::Underline => "underline",
        }
    }
}

impl FromStr for HighlightStyle {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "border" => Ok(Self::Border),
            "background" => Ok(Self::Background),
            "outline" => Ok(Self::Outline),
            "underline" => Ok(Self::Underline),
            _ => Err(()),
        }
    }
}

impl fmt::Display for HighlightStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Style Declarations
// =============================================================================

/// A single CSS property assignment on an element's inline style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleDecl {
    pub property: &'static str,
    pub value: String,
}

impl StyleDecl {
    pub fn new(property: &'static str, value: impl Into<String>) -> Self {
        Self {
            property,
            value: value.into(),
        }
    }
}

// =============================================================================
// Actions
// =============================================================================

/// What the click handler should do with a click on a link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickAction {
    /// Leave the click alone; the browser navigates as usual
    PassThrough,
    /// Suppress navigation without opening anything
    Cancel,
    /// Suppress navigation and open this URL in a new browsing context
    Open(String),
}

impl ClickAction {
    /// Whether default navigation must be cancelled.
    pub fn cancels(&self) -> bool {
        !matches!(self, Self::PassThrough)
    }
}

/// Outcome of the "Open AliExpress Product" context menu item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    /// Open the canonical product page in a new tab
    OpenTab(String),
    /// Show this message in the page
    Alert(&'static str),
}

/// Counts from a single highlight pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanReport {
    /// Anchors with an `href` that were examined
    pub examined: usize,
    /// Anchors that matched and were styled
    pub highlighted: usize,
}
