//! Declarative highlight style table
//!
//! Each style maps to a fixed set of inline properties. Removal always
//! clears the full property set, whatever style was applied.

use crate::types::{HighlightStyle, StyleDecl};

/// Class added to highlighted links.
pub const HIGHLIGHT_CLASS: &str = "aliexpress-bundle-deal";

/// Marker attribute on highlighted links.
pub const MARKER_ATTRIBUTE: &str = "data-bundle-deal";

/// Marker attribute value.
pub const MARKER_VALUE: &str = "true";

/// Custom property carrying the highlight colour for stylesheet theming.
pub const COLOR_PROPERTY: &str = "--bundle-deal-color";

/// Every inline property any style may set, cleared on removal.
pub const STYLE_PROPERTIES: [&str; 6] = [
    "border",
    "background-color",
    "outline",
    "outline-offset",
    "border-bottom",
    "border-radius",
];

/// Corner radius used on page links.
pub const PAGE_CORNER_RADIUS: &str = "4px";

/// Corner radius used on the options page preview link.
pub const PREVIEW_CORNER_RADIUS: &str = "6px";

/// Alpha byte appended for the background fill (0x33 = 20%).
const FILL_ALPHA_HEX: &str = "33";

/// Produce a translucent version of a CSS colour.
///
/// Hex colours get an alpha byte; anything else is mixed with transparent.
pub fn translucent(color: &str) -> String {
    let color = color.trim();
    if let Some(hex) = color.strip_prefix('#') {
        if hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            match hex.len() {
                6 => return format!("#{}{}", hex, FILL_ALPHA_HEX),
                3 => {
                    let mut out = String::with_capacity(9);
                    out.push('#');
                    for c in hex.chars() {
                        out.push(c);
                        out.push(c);
                    }
                    out.push_str(FILL_ALPHA_HEX);
                    return out;
                }
                _ => {}
            }
        }
    }
    format!("color-mix(in srgb, {} 20%, transparent)", color)
}

/// Style table entry for a style and colour, without the custom property.
pub fn style_table(style: HighlightStyle, color: &str, corner_radius: &str) -> Vec<StyleDecl> {
    match style {
        HighlightStyle::Border => vec![
            StyleDecl::new("border", format!("2px solid {}", color)),
            StyleDecl::new("border-radius", corner_radius),
        ],
        HighlightStyle::Background => vec![
            StyleDecl::new("background-color", translucent(color)),
            StyleDecl::new("border-radius", corner_radius),
        ],
        HighlightStyle::Outline => vec![
            StyleDecl::new("outline", format!("2px solid {}", color)),
            StyleDecl::new("outline-offset", "2px"),
        ],
        HighlightStyle::Underline => vec![
            StyleDecl::new("border-bottom", format!("3px solid {}", color)),
        ],
    }
}

/// All declarations for a highlighted element: the colour custom property
/// followed by the style table entry.
pub fn declarations(style: HighlightStyle, color: &str, corner_radius: &str) -> Vec<StyleDecl> {
    let mut decls = Vec::with_capacity(3);
    decls.push(StyleDecl::new(COLOR_PROPERTY, color));
    decls.extend(style_table(style, color, corner_radius));
    decls
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translucent() {
        assert_eq!(translucent("#ff4444"), "#ff444433");
        assert_eq!(translucent("#0f0"), "#00ff0033");
        assert_eq!(translucent("red"), "color-mix(in srgb, red 20%, transparent)");
        assert_eq!(
            translucent("#ff444480"),
            "color-mix(in srgb, #ff444480 20%, transparent)"
        );
    }

    #[test]
    fn test_underline_only_sets_bottom_border() {
        let decls = style_table(HighlightStyle::Underline, "#00ff00", PAGE_CORNER_RADIUS);
        assert_eq!(decls, vec![StyleDecl::new("border-bottom", "3px solid #00ff00")]);
    }

    #[test]
    fn test_border_and_background_round_corners() {
        let border = style_table(HighlightStyle::Border, "#ff4444", PAGE_CORNER_RADIUS);
        assert!(border.contains(&StyleDecl::new("border", "2px solid #ff4444")));
        assert!(border.contains(&StyleDecl::new("border-radius", "4px")));

        let background = style_table(HighlightStyle::Background, "#ff4444", PREVIEW_CORNER_RADIUS);
        assert!(background.contains(&StyleDecl::new("background-color", "#ff444433")));
        assert!(background.contains(&StyleDecl::new("border-radius", "6px")));
    }

    #[test]
    fn test_outline_offset() {
        let decls = style_table(HighlightStyle::Outline, "blue", PAGE_CORNER_RADIUS);
        assert_eq!(
            decls,
            vec![
                StyleDecl::new("outline", "2px solid blue"),
                StyleDecl::new("outline-offset", "2px"),
            ]
        );
    }

    #[test]
    fn test_every_table_property_is_cleared_on_removal() {
        for style in HighlightStyle::ALL {
            for decl in style_table(style, "#123456", PAGE_CORNER_RADIUS) {
                assert!(STYLE_PROPERTIES.contains(&decl.property), "{}", decl.property);
            }
        }
    }

    #[test]
    fn test_declarations_lead_with_color_property() {
        let decls = declarations(HighlightStyle::Border, "#abcdef", PAGE_CORNER_RADIUS);
        assert_eq!(decls[0], StyleDecl::new(COLOR_PROPERTY, "#abcdef"));
        assert_eq!(decls.len(), 3);
    }
}
