//! Content script: highlighting and click redirection on shop pages.

use std::cell::RefCell;
use std::rc::Rc;

use bd_core::settings::keys;
use bd_core::types::ClickAction;
use bd_core::{decide_click, Highlighter, ScanReport, Settings, SettingsChanges, StoredSettings};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, MutationObserver, MutationObserverInit};

use crate::browser;
use crate::convert::{describe, to_json};
use crate::dom::{DomDocument, LINK_SELECTOR};

/// Storage area the settings live in.
const SYNC_AREA: &str = "sync";

struct ContentState {
    highlighter: Highlighter,
    document: DomDocument,
}

type Shared = Rc<RefCell<ContentState>>;

fn log_report(trigger: &str, report: Option<ScanReport>) {
    if let Some(report) = report {
        log::debug!(
            "{}: {} of {} links highlighted",
            trigger,
            report.highlighted,
            report.examined
        );
    }
}

/// Wire up the content script. Listeners are installed synchronously; the
/// first scan runs once stored settings arrive.
pub fn start(document: Document) -> Result<(), JsValue> {
    let state: Shared = Rc::new(RefCell::new(ContentState {
        highlighter: Highlighter::new(Settings::default()),
        document: DomDocument(document.clone()),
    }));

    install_storage_listener(&state);
    install_mutation_observer(&state, &document)?;
    install_click_listener(&state, &document)?;

    if document.ready_state() == "loading" {
        install_ready_listener(&state, &document)?;
    }

    let loader = Rc::clone(&state);
    wasm_bindgen_futures::spawn_local(async move {
        load_settings(loader).await;
    });

    Ok(())
}

async fn load_settings(state: Shared) {
    let request = js_sys::Array::new();
    for key in keys::ALL {
        request.push(&JsValue::from_str(key));
    }

    let stored = match browser::storage_sync_get(&JsValue::from(request)).await {
        Ok(result) => StoredSettings::from_json(&to_json(&result)),
        Err(e) => {
            log::warn!("failed to read settings, using defaults: {}", describe(&e));
            StoredSettings::default()
        }
    };

    let mut guard = state.borrow_mut();
    let state = &mut *guard;
    let report = state.highlighter.load(Settings::merged(&stored), &state.document);
    log_report("load", report);
}

fn install_storage_listener(state: &Shared) {
    let state = Rc::clone(state);
    let listener = Closure::<dyn FnMut(JsValue, JsValue)>::new(move |changes: JsValue, area: JsValue| {
        if area.as_string().as_deref() != Some(SYNC_AREA) {
            return;
        }
        let changes = SettingsChanges::from_storage_event(&to_json(&changes));
        if changes.is_empty() {
            return;
        }
        let mut guard = state.borrow_mut();
        let state = &mut *guard;
        let report = state.highlighter.apply_changes(&changes, &state.document);
        log_report("settings", report);
    });
    browser::on_storage_changed(listener.as_ref().unchecked_ref());
    listener.forget();
}

fn install_mutation_observer(state: &Shared, document: &Document) -> Result<(), JsValue> {
    let body = match document.body() {
        Some(body) => body,
        None => {
            log::warn!("document has no body, dynamic links will not be highlighted");
            return Ok(());
        }
    };

    let state = Rc::clone(state);
    let callback = Closure::<dyn FnMut(js_sys::Array, MutationObserver)>::new(
        move |_records: js_sys::Array, _observer: MutationObserver| {
            let guard = state.borrow();
            let report = guard.highlighter.on_mutation(&guard.document);
            log_report("mutation", report);
        },
    );

    let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;
    let init = MutationObserverInit::new();
    init.set_child_list(true);
    init.set_subtree(true);
    observer.observe_with_options(&body, &init)?;
    callback.forget();

    Ok(())
}

fn install_click_listener(state: &Shared, document: &Document) -> Result<(), JsValue> {
    let state = Rc::clone(state);
    let listener = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        let href = event
            .target()
            .and_then(|target| target.dyn_into::<Element>().ok())
            .and_then(|element| element.closest(LINK_SELECTOR).ok().flatten())
            .and_then(|link| link.get_attribute("href"));

        let action = decide_click(state.borrow().highlighter.settings(), href.as_deref());
        if !action.cancels() {
            return;
        }

        event.prevent_default();
        event.stop_propagation();

        if let ClickAction::Open(url) = action {
            let opened = web_sys::window()
                .map(|window| window.open_with_url_and_target(&url, "_blank"));
            if let Some(Err(e)) = opened {
                log::error!("failed to open {}: {}", url, describe(&e));
            }
        }
    });

    // Capture phase, so the page's own handlers never see the click.
    document.add_event_listener_with_callback_and_bool("click", listener.as_ref().unchecked_ref(), true)?;
    listener.forget();

    Ok(())
}

fn install_ready_listener(state: &Shared, document: &Document) -> Result<(), JsValue> {
    let state = Rc::clone(state);
    let listener = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
        let guard = state.borrow();
        let report = guard.highlighter.on_mutation(&guard.document);
        log_report("ready", report);
    });
    document.add_event_listener_with_callback("DOMContentLoaded", listener.as_ref().unchecked_ref())?;
    listener.forget();
    Ok(())
}
