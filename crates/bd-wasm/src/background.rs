//! Background script: settings backfill, context menu and toolbar action.

use bd_core::menu::{alert_script, MENU_CONTEXT, MENU_ITEM_ID, MENU_ITEM_TITLE};
use bd_core::{menu_action, MenuAction, Settings, StoredSettings};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::browser;
use crate::convert::{describe, get_i32, get_string, settings_to_js, to_json};

pub fn start() -> Result<(), JsValue> {
    wasm_bindgen_futures::spawn_local(async {
        if let Err(e) = initialize_settings().await {
            log::error!("failed to initialize settings: {}", describe(&e));
        }
    });

    create_context_menu();
    install_menu_listener();
    install_toolbar_listener();

    Ok(())
}

/// Read the record with defaults filled in, backfill falsy values and write
/// the complete record back.
async fn initialize_settings() -> Result<(), JsValue> {
    let defaults = settings_to_js(&Settings::default())?;
    let result = browser::storage_sync_get(&defaults).await?;
    let (settings, filled) = Settings::backfill(&StoredSettings::from_json(&to_json(&result)));
    if filled {
        log::info!("settings backfilled with defaults");
    }
    browser::storage_sync_set(&settings_to_js(&settings)?).await?;
    Ok(())
}

fn create_context_menu() {
    let properties = js_sys::Object::new();
    let contexts = js_sys::Array::of1(&JsValue::from_str(MENU_CONTEXT));
    let _ = js_sys::Reflect::set(&properties, &"id".into(), &JsValue::from_str(MENU_ITEM_ID));
    let _ = js_sys::Reflect::set(&properties, &"title".into(), &JsValue::from_str(MENU_ITEM_TITLE));
    let _ = js_sys::Reflect::set(&properties, &"contexts".into(), &contexts);
    browser::context_menus_create(&properties);
}

fn install_menu_listener() {
    let listener = Closure::<dyn FnMut(JsValue, JsValue)>::new(|info: JsValue, tab: JsValue| {
        if get_string(&info, "menuItemId").as_deref() != Some(MENU_ITEM_ID) {
            return;
        }
        let link_url = get_string(&info, "linkUrl").unwrap_or_default();
        let tab_id = get_i32(&tab, "id");

        match menu_action(Some(&link_url)) {
            MenuAction::OpenTab(url) => wasm_bindgen_futures::spawn_local(open_tab(url)),
            MenuAction::Alert(message) => match tab_id {
                Some(tab_id) => wasm_bindgen_futures::spawn_local(alert_in_tab(tab_id, message)),
                None => log::warn!("no tab to show {:?} in", message),
            },
        }
    });
    browser::on_context_menu_clicked(listener.as_ref().unchecked_ref());
    listener.forget();
}

fn install_toolbar_listener() {
    let listener = Closure::<dyn FnMut(JsValue)>::new(|_tab: JsValue| {
        wasm_bindgen_futures::spawn_local(async {
            if let Err(e) = browser::open_options_page().await {
                log::error!("failed to open options page: {}", describe(&e));
            }
        });
    });
    browser::on_browser_action_clicked(listener.as_ref().unchecked_ref());
    listener.forget();
}

async fn open_tab(url: String) {
    let properties = js_sys::Object::new();
    let _ = js_sys::Reflect::set(&properties, &"url".into(), &JsValue::from_str(&url));
    if let Err(e) = browser::tabs_create(&properties).await {
        log::error!("failed to open {}: {}", url, describe(&e));
    }
}

async fn alert_in_tab(tab_id: i32, message: &'static str) {
    let details = js_sys::Object::new();
    let _ = js_sys::Reflect::set(&details, &"code".into(), &JsValue::from_str(&alert_script(message)));
    if browser::tabs_execute_script(tab_id, &details).await.is_err() {
        log::error!("Failed to show alert");
    }
}
