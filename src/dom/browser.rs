//! `web-sys` implementation of [`Dom`]. Requires a browser environment.
//!
//! DOM exceptions are swallowed: every operation here is best-effort, and a
//! failed attribute write must not abort the event handler that issued it.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Window};

use super::Dom;

#[derive(Clone)]
pub struct BrowserDom {
    window: Window,
    document: Document,
}

impl BrowserDom {
    /// Bind to the current window's document, if there is one.
    pub fn current() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self { window, document })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

impl Dom for BrowserDom {
    type Element = Element;

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn query(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    fn query_all(&self, selector: &str) -> Vec<Element> {
        let Ok(list) = self.document.query_selector_all(selector) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn query_within(&self, scope: &Element, selector: &str) -> Option<Element> {
        scope.query_selector(selector).ok().flatten()
    }

    fn closest(&self, el: &Element, selector: &str) -> Option<Element> {
        el.closest(selector).ok().flatten()
    }

    fn contains(&self, outer: &Element, inner: &Element) -> bool {
        outer.contains(Some(inner))
    }

    fn is_same(&self, a: &Element, b: &Element) -> bool {
        a.is_same_node(Some(b))
    }

    fn tag_name(&self, el: &Element) -> String {
        el.tag_name().to_ascii_uppercase()
    }

    fn id_of(&self, el: &Element) -> String {
        el.id()
    }

    fn next_sibling(&self, el: &Element) -> Option<Element> {
        el.next_element_sibling()
    }

    fn root(&self) -> Option<Element> {
        self.document.document_element()
    }

    fn attribute(&self, el: &Element, name: &str) -> Option<String> {
        el.get_attribute(name)
    }

    fn set_attribute(&self, el: &Element, name: &str, value: &str) {
        let _ = el.set_attribute(name, value);
    }

    fn remove_attribute(&self, el: &Element, name: &str) {
        let _ = el.remove_attribute(name);
    }

    fn has_class(&self, el: &Element, class: &str) -> bool {
        el.class_list().contains(class)
    }

    fn set_class(&self, el: &Element, class: &str, on: bool) {
        let _ = el.class_list().toggle_with_force(class, on);
    }

    fn text(&self, el: &Element) -> String {
        el.text_content().unwrap_or_default()
    }

    fn set_text(&self, el: &Element, text: &str) {
        el.set_text_content(Some(text));
    }

    fn focus(&self, el: &Element) {
        if let Some(html) = el.dyn_ref::<HtmlElement>() {
            let _ = html.focus();
        }
    }

    fn set_scroll_locked(&self, locked: bool) {
        let Some(body) = self.document.body() else {
            return;
        };
        let style = body.style();
        if locked {
            let _ = style.set_property("overflow", "hidden");
        } else {
            let _ = style.remove_property("overflow");
        }
    }

    fn scroll_offset(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn scroll_to_top(&self) {
        self.window.scroll_to_with_x_and_y(0.0, 0.0);
    }
}
