//! WebAssembly bindings for Bundle Deal Finder
//!
//! Each extension context loads this module and calls one entry point:
//! `start_content` on shop pages, `start_background` in the background
//! script and `start_options` on the options page. The pure helpers are
//! exported as well for use from plain JS.

mod background;
mod browser;
mod content;
mod convert;
pub mod dom;
mod options_page;

use bd_core::{canonical_product_url as core_canonical_product_url, Settings};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

fn document() -> Result<web_sys::Document, JsValue> {
    web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("No document available"))
}

#[wasm_bindgen]
pub fn start_content() -> Result<(), JsValue> {
    content::start(document()?)
}

#[wasm_bindgen]
pub fn start_background() -> Result<(), JsValue> {
    background::start()
}

#[wasm_bindgen]
pub fn start_options() -> Result<(), JsValue> {
    options_page::start(document()?)
}

#[wasm_bindgen]
pub fn is_bundle_deal_url(url: Option<String>) -> bool {
    bd_core::is_bundle_deal_url(url.as_deref())
}

#[wasm_bindgen]
pub fn extract_ali_id(url: Option<String>) -> Option<String> {
    bd_core::extract_ali_id(url.as_deref())
}

#[wasm_bindgen]
pub fn canonical_product_url(id: &str) -> String {
    core_canonical_product_url(id)
}

#[wasm_bindgen]
pub fn default_settings() -> String {
    Settings::default().to_json().to_string()
}
