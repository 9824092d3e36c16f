//! Options page: binds the form controls to stored settings and keeps the
//! preview link in sync.

use std::rc::Rc;

use bd_core::options::{ids, OptionsForm, SaveMessage, DISABLED_CLASS, SAVE_MESSAGE_TIMEOUT_MS};
use bd_core::style::{COLOR_PROPERTY, HIGHLIGHT_CLASS, STYLE_PROPERTIES};
use bd_core::{Settings, StoredSettings};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement, HtmlInputElement, HtmlSelectElement};

use crate::browser;
use crate::convert::{describe, settings_to_js, to_json};

/// Handles to every control on the page.
struct OptionsPage {
    highlight_enabled: HtmlInputElement,
    auto_redirect_enabled: HtmlInputElement,
    highlight_style: HtmlSelectElement,
    highlight_color: HtmlInputElement,
    color_value: Element,
    preview_link: HtmlElement,
    save_button: Element,
    reset_button: Element,
    save_message: Element,
    style_settings: Element,
    color_settings: Element,
}

fn element(document: &Document, id: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing element #{}", id)))
}

fn typed<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    element(document, id)?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Element #{} has the wrong type", id)))
}

impl OptionsPage {
    fn bind(document: &Document) -> Result<Self, JsValue> {
        Ok(Self {
            highlight_enabled: typed(document, ids::HIGHLIGHT_ENABLED)?,
            auto_redirect_enabled: typed(document, ids::AUTO_REDIRECT_ENABLED)?,
            highlight_style: typed(document, ids::HIGHLIGHT_STYLE)?,
            highlight_color: typed(document, ids::HIGHLIGHT_COLOR)?,
            color_value: element(document, ids::COLOR_VALUE)?,
            preview_link: typed(document, ids::PREVIEW_LINK)?,
            save_button: element(document, ids::SAVE_BUTTON)?,
            reset_button: element(document, ids::RESET_BUTTON)?,
            save_message: element(document, ids::SAVE_MESSAGE)?,
            style_settings: element(document, ids::STYLE_SETTINGS)?,
            color_settings: element(document, ids::COLOR_SETTINGS)?,
        })
    }

    fn form(&self) -> OptionsForm {
        OptionsForm::from_controls(
            self.highlight_enabled.checked(),
            self.auto_redirect_enabled.checked(),
            &self.highlight_style.value(),
            &self.highlight_color.value(),
        )
    }

    fn fill(&self, settings: &Settings) {
        self.highlight_enabled.set_checked(settings.highlight_enabled);
        self.auto_redirect_enabled.set_checked(settings.auto_redirect_enabled);
        self.highlight_style.set_value(settings.highlight_style.as_str());
        self.highlight_color.set_value(&settings.highlight_color);
        self.color_value.set_text_content(Some(&settings.highlight_color));
        self.update_preview();
        self.toggle_sections();
    }

    fn update_preview(&self) {
        let style = self.preview_link.style();
        for property in STYLE_PROPERTIES {
            let _ = style.remove_property(property);
        }
        let _ = style.remove_property(COLOR_PROPERTY);

        let classes = self.preview_link.class_list();
        match self.form().preview() {
            Some(decls) => {
                for decl in decls {
                    let _ = style.set_property(decl.property, &decl.value);
                }
                let _ = classes.add_1(HIGHLIGHT_CLASS);
            }
            None => {
                let _ = classes.remove_1(HIGHLIGHT_CLASS);
            }
        }
    }

    fn toggle_sections(&self) {
        let disabled = self.form().sections_disabled();
        for section in [&self.style_settings, &self.color_settings] {
            let _ = section.class_list().toggle_with_force(DISABLED_CLASS, disabled);
        }
    }

    fn show_message(&self, message: SaveMessage) {
        self.save_message.set_text_content(Some(&message.text));
        self.save_message.set_class_name(&message.class_name());

        let target = self.save_message.clone();
        let hide = Closure::once_into_js(move || {
            let _ = target.class_list().remove_1("show");
        });
        if let Some(window) = web_sys::window() {
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                hide.unchecked_ref(),
                SAVE_MESSAGE_TIMEOUT_MS,
            );
        }
    }
}

pub fn start(document: Document) -> Result<(), JsValue> {
    let page = Rc::new(OptionsPage::bind(&document)?);

    listen(&page.highlight_enabled, "change", &page, |page| {
        page.toggle_sections();
        page.update_preview();
    })?;
    listen(&page.highlight_style, "change", &page, |page| page.update_preview())?;
    listen(&page.highlight_color, "input", &page, |page| {
        page.color_value.set_text_content(Some(&page.highlight_color.value()));
        page.update_preview();
    })?;
    listen(&page.save_button, "click", &page, |page| {
        wasm_bindgen_futures::spawn_local(save(Rc::clone(page)));
    })?;
    listen(&page.reset_button, "click", &page, |page| {
        wasm_bindgen_futures::spawn_local(reset(Rc::clone(page)));
    })?;

    wasm_bindgen_futures::spawn_local(load(page));
    Ok(())
}

fn listen(
    target: &web_sys::EventTarget,
    event: &str,
    page: &Rc<OptionsPage>,
    handler: impl Fn(&Rc<OptionsPage>) + 'static,
) -> Result<(), JsValue> {
    let page = Rc::clone(page);
    let listener = Closure::<dyn FnMut(Event)>::new(move |_event: Event| handler(&page));
    target.add_event_listener_with_callback(event, listener.as_ref().unchecked_ref())?;
    listener.forget();
    Ok(())
}

async fn read_settings() -> Settings {
    let defaults = match settings_to_js(&Settings::default()) {
        Ok(defaults) => defaults,
        Err(_) => return Settings::default(),
    };
    match browser::storage_sync_get(&defaults).await {
        Ok(result) => Settings::merged(&StoredSettings::from_json(&to_json(&result))),
        Err(e) => {
            log::warn!("failed to read settings, showing defaults: {}", describe(&e));
            Settings::default()
        }
    }
}

async fn write_settings(settings: &Settings) -> Result<(), JsValue> {
    browser::storage_sync_set(&settings_to_js(settings)?).await.map(|_| ())
}

async fn load(page: Rc<OptionsPage>) {
    let settings = read_settings().await;
    page.fill(&settings);
}

async fn save(page: Rc<OptionsPage>) {
    let settings = page.form().to_settings();
    match write_settings(&settings).await {
        Ok(()) => {
            page.show_message(SaveMessage::saved());
            page.update_preview();
        }
        Err(e) => page.show_message(SaveMessage::save_failed(&describe(&e))),
    }
}

async fn reset(page: Rc<OptionsPage>) {
    match write_settings(&Settings::default()).await {
        Ok(()) => {
            load(Rc::clone(&page)).await;
            page.show_message(SaveMessage::reset());
        }
        Err(e) => page.show_message(SaveMessage::save_failed(&describe(&e))),
    }
}
