//! Bindings to the `browser.*` WebExtension APIs used by the extension.

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    // storage.sync

    #[wasm_bindgen(catch, js_namespace = ["browser", "storage", "sync"], js_name = get)]
    pub async fn storage_sync_get(keys: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["browser", "storage", "sync"], js_name = set)]
    pub async fn storage_sync_set(items: &JsValue) -> Result<JsValue, JsValue>;

    /// Listener receives `(changes, areaName)`.
    #[wasm_bindgen(js_namespace = ["browser", "storage", "onChanged"], js_name = addListener)]
    pub fn on_storage_changed(listener: &js_sys::Function);

    // contextMenus

    #[wasm_bindgen(js_namespace = ["browser", "contextMenus"], js_name = create)]
    pub fn context_menus_create(properties: &JsValue);

    /// Listener receives `(info, tab)`.
    #[wasm_bindgen(js_namespace = ["browser", "contextMenus", "onClicked"], js_name = addListener)]
    pub fn on_context_menu_clicked(listener: &js_sys::Function);

    // browserAction

    #[wasm_bindgen(js_namespace = ["browser", "browserAction", "onClicked"], js_name = addListener)]
    pub fn on_browser_action_clicked(listener: &js_sys::Function);

    // runtime

    #[wasm_bindgen(catch, js_namespace = ["browser", "runtime"], js_name = openOptionsPage)]
    pub async fn open_options_page() -> Result<JsValue, JsValue>;

    // tabs

    #[wasm_bindgen(catch, js_namespace = ["browser", "tabs"], js_name = create)]
    pub async fn tabs_create(properties: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["browser", "tabs"], js_name = executeScript)]
    pub async fn tabs_execute_script(tab_id: i32, details: &JsValue) -> Result<JsValue, JsValue>;
}
