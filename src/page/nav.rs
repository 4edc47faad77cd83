//! Mobile navigation drawer and accordions.

use crate::dom::Dom;

pub const MENU_TOGGLE_ID: &str = "menuToggle";
pub const NAV_LINKS_ID: &str = "navLinks";
pub const ACCORDION_SELECTOR: &str = ".accordion";
const OPEN_CLASS: &str = "open";
const ARIA_EXPANDED: &str = "aria-expanded";

/// Flip the drawer and mirror the state into the toggle's `aria-expanded`.
/// Returns whether the drawer is now open.
pub fn toggle_menu<D: Dom>(dom: &D, toggle: &D::Element, links: &D::Element) -> bool {
    let open = !dom.has_class(links, OPEN_CLASS);
    dom.set_class(links, OPEN_CLASS, open);
    dom.set_attribute(toggle, ARIA_EXPANDED, if open { "true" } else { "false" });
    open
}

/// Flip an accordion button and its panel (the next sibling element).
/// Returns whether the accordion is now expanded.
pub fn toggle_accordion<D: Dom>(dom: &D, button: &D::Element) -> bool {
    let expanded = dom.attribute(button, ARIA_EXPANDED).as_deref() == Some("true");
    let next = !expanded;
    dom.set_attribute(button, ARIA_EXPANDED, if next { "true" } else { "false" });
    if let Some(panel) = dom.next_sibling(button) {
        dom.set_class(&panel, OPEN_CLASS, next);
    }
    next
}

#[cfg(test)]
#[path = "nav_test.rs"]
mod nav_test;
