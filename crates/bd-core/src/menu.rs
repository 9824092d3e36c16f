//! "Open AliExpress Product" context menu item

use crate::extract::product_url_for;
use crate::types::MenuAction;

/// Menu item id.
pub const MENU_ITEM_ID: &str = "open-aliexpress-product";

/// Menu item label.
pub const MENU_ITEM_TITLE: &str = "Open AliExpress Product";

/// Context the item is shown in.
pub const MENU_CONTEXT: &str = "link";

/// Shown in the page when the link carries no identifier.
pub const NO_PRODUCT_ID_MESSAGE: &str = "No product ID found in the link.";

/// Resolve a click on the menu item for the link under the cursor.
pub fn menu_action(link_url: Option<&str>) -> MenuAction {
    match product_url_for(link_url) {
        Some(url) => MenuAction::OpenTab(url),
        None => MenuAction::Alert(NO_PRODUCT_ID_MESSAGE),
    }
}

/// Script that shows `message` as an alert in the page.
pub fn alert_script(message: &str) -> String {
    // JSON string syntax is valid JS string syntax.
    let literal = serde_json::to_string(message).unwrap_or_else(|_| "\"\"".to_string());
    format!("alert({});", literal)
}
