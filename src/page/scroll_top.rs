//! Scroll-to-top control.

use crate::dom::Dom;

pub const BUTTON_ID: &str = "scrollTop";
const VISIBLE_CLASS: &str = "visible";

/// Show the control once the page is scrolled past `threshold_px`.
/// Returns whether it is visible.
pub fn on_scroll<D: Dom>(dom: &D, button: &D::Element, threshold_px: f64) -> bool {
    let visible = dom.scroll_offset() > threshold_px;
    dom.set_class(button, VISIBLE_CLASS, visible);
    visible
}

/// Jump back to the top and hide the control.
pub fn activate<D: Dom>(dom: &D, button: &D::Element) {
    dom.scroll_to_top();
    dom.set_class(button, VISIBLE_CLASS, false);
}

#[cfg(test)]
#[path = "scroll_top_test.rs"]
mod scroll_top_test;
