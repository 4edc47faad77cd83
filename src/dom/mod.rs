//! Abstract element surface consumed by the modal manager and page behaviors.
//!
//! SYSTEM CONTEXT
//! ==============
//! The interactive cores never touch `web-sys` directly. They talk to a
//! [`Dom`] implementation: [`browser::BrowserDom`] in the browser, and an
//! in-memory arena under test.

#[cfg(feature = "hydrate")]
pub mod browser;
#[cfg(test)]
pub mod memory;

/// Element lookup, attributes, classes and focus for a single document.
///
/// Implementations are cheap handles (`Clone`) so deferred work such as a
/// scheduled focus shift can carry its own copy.
pub trait Dom: Clone + 'static {
    /// Opaque handle to one element of the document.
    type Element: Clone + 'static;

    /// `document.getElementById`.
    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// First match for `selector` in the whole document.
    fn query(&self, selector: &str) -> Option<Self::Element>;

    /// All matches for `selector` in the whole document, in document order.
    fn query_all(&self, selector: &str) -> Vec<Self::Element>;

    /// First descendant of `scope` matching `selector`.
    fn query_within(&self, scope: &Self::Element, selector: &str) -> Option<Self::Element>;

    /// Nearest inclusive ancestor of `el` matching `selector`.
    fn closest(&self, el: &Self::Element, selector: &str) -> Option<Self::Element>;

    /// Whether `inner` is `outer` or one of its descendants.
    fn contains(&self, outer: &Self::Element, inner: &Self::Element) -> bool;

    /// Identity comparison of two handles.
    fn is_same(&self, a: &Self::Element, b: &Self::Element) -> bool;

    /// Upper-case tag name (`"DIV"`, `"A"`).
    fn tag_name(&self, el: &Self::Element) -> String;

    fn id_of(&self, el: &Self::Element) -> String;

    fn next_sibling(&self, el: &Self::Element) -> Option<Self::Element>;

    /// The `<html>` element.
    fn root(&self) -> Option<Self::Element>;

    fn attribute(&self, el: &Self::Element, name: &str) -> Option<String>;

    fn set_attribute(&self, el: &Self::Element, name: &str, value: &str);

    fn remove_attribute(&self, el: &Self::Element, name: &str);

    fn has_class(&self, el: &Self::Element, class: &str) -> bool;

    /// Force `class` on or off.
    fn set_class(&self, el: &Self::Element, class: &str, on: bool);

    fn text(&self, el: &Self::Element) -> String;

    fn set_text(&self, el: &Self::Element, text: &str);

    fn focus(&self, el: &Self::Element);

    /// Set or clear `overflow: hidden` on `<body>`.
    fn set_scroll_locked(&self, locked: bool);

    /// Current vertical scroll offset of the window, in CSS pixels.
    fn scroll_offset(&self) -> f64;

    fn scroll_to_top(&self);
}

/// Tags that are interactive without extra ARIA wiring.
const NATIVE_INTERACTIVE: &[&str] = &["A", "BUTTON", "INPUT", "SELECT", "TEXTAREA", "SUMMARY"];

/// Whether `el` is keyboard-operable on its own.
pub fn is_natively_interactive<D: Dom>(dom: &D, el: &D::Element) -> bool {
    let tag = dom.tag_name(el);
    NATIVE_INTERACTIVE.contains(&tag.as_str())
}

/// Give a non-native trigger a button role and a tab stop, keeping any
/// values already present in markup.
pub fn ensure_button_semantics<D: Dom>(dom: &D, el: &D::Element) {
    if is_natively_interactive(dom, el) {
        return;
    }
    if dom.attribute(el, "role").is_none() {
        dom.set_attribute(el, "role", "button");
    }
    if dom.attribute(el, "tabindex").is_none() {
        dom.set_attribute(el, "tabindex", "0");
    }
}

/// Keys that matter to the interactive cores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Enter,
    Space,
    Escape,
    Other(String),
}

impl Key {
    /// Map a `KeyboardEvent.key` value.
    #[must_use]
    pub fn from_key_name(name: &str) -> Self {
        match name {
            "Enter" => Self::Enter,
            " " | "Spacebar" => Self::Space,
            "Escape" | "Esc" => Self::Escape,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Keys that activate a button-role element.
    #[must_use]
    pub fn activates(&self) -> bool {
        matches!(self, Self::Enter | Self::Space)
    }
}
