//! One-shot document stamping at boot.

use crate::dom::Dom;

pub const NO_JS_CLASS: &str = "no-js";
pub const YEAR_ID: &str = "year";

/// Drop the `no-js` marker from `<html>` so script-only styles apply.
pub fn mark_scripted<D: Dom>(dom: &D) {
    if let Some(root) = dom.root() {
        dom.set_class(&root, NO_JS_CLASS, false);
    }
}

/// Write `year` into the footer's `#year` element, if present.
pub fn stamp_year<D: Dom>(dom: &D, year: u32) -> bool {
    let Some(el) = dom.element_by_id(YEAR_ID) else {
        return false;
    };
    dom.set_text(&el, &year.to_string());
    true
}

/// The current calendar year according to the browser clock.
#[cfg(feature = "hydrate")]
pub fn current_year() -> u32 {
    js_sys::Date::new_0().get_full_year()
}

#[cfg(test)]
#[path = "document_test.rs"]
mod document_test;
