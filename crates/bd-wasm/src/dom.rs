//! `web-sys` implementation of the highlight engine's document traits.

use bd_core::highlight::{LinkDocument, LinkElement};
use bd_core::style::{MARKER_ATTRIBUTE, MARKER_VALUE};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

/// Selector for anchors the engine examines.
pub const LINK_SELECTOR: &str = "a[href]";

/// An anchor element in the page.
#[derive(Debug, Clone)]
pub struct DomLink(pub Element);

impl DomLink {
    fn style(&self) -> Option<web_sys::CssStyleDeclaration> {
        self.0.dyn_ref::<HtmlElement>().map(HtmlElement::style)
    }
}

// DOM exceptions here only come from invalid names, which are all constants.
impl LinkElement for DomLink {
    fn href(&self) -> Option<String> {
        self.0.get_attribute("href")
    }

    fn add_class(&self, class: &str) {
        let _ = self.0.class_list().add_1(class);
    }

    fn remove_class(&self, class: &str) {
        let _ = self.0.class_list().remove_1(class);
    }

    fn set_attribute(&self, name: &str, value: &str) {
        let _ = self.0.set_attribute(name, value);
    }

    fn remove_attribute(&self, name: &str) {
        let _ = self.0.remove_attribute(name);
    }

    fn set_style_property(&self, property: &str, value: &str) {
        if let Some(style) = self.style() {
            let _ = style.set_property(property, value);
        }
    }

    fn remove_style_property(&self, property: &str) {
        if let Some(style) = self.style() {
            let _ = style.remove_property(property);
        }
    }
}

/// The page document.
#[derive(Debug, Clone)]
pub struct DomDocument(pub Document);

impl DomDocument {
    fn select(&self, selector: &str) -> Vec<DomLink> {
        let nodes = match self.0.query_selector_all(selector) {
            Ok(nodes) => nodes,
            Err(_) => return Vec::new(),
        };
        let mut links = Vec::with_capacity(nodes.length() as usize);
        for i in 0..nodes.length() {
            if let Some(element) = nodes.get(i).and_then(|node| node.dyn_into::<Element>().ok()) {
                links.push(DomLink(element));
            }
        }
        links
    }
}

impl LinkDocument for DomDocument {
    type Link = DomLink;

    fn links(&self) -> Vec<DomLink> {
        self.select(LINK_SELECTOR)
    }

    fn marked_links(&self) -> Vec<DomLink> {
        self.select(&format!("a[{}=\"{}\"]", MARKER_ATTRIBUTE, MARKER_VALUE))
    }
}
