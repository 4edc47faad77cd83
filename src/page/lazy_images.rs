//! Deferred image loading.
//!
//! Images marked `loading="lazy"` may carry their real source in
//! `data-src`. The browser glue observes them with an
//! `IntersectionObserver` and calls [`reveal`] once each one scrolls into
//! view.

use crate::dom::Dom;

pub const LAZY_SELECTOR: &str = r#"img[loading="lazy"]"#;
const DATA_SRC: &str = "data-src";

pub fn lazy_images<D: Dom>(dom: &D) -> Vec<D::Element> {
    dom.query_all(LAZY_SELECTOR)
}

/// Swap in `data-src` when present; otherwise the current `src` stays.
/// Returns whether the source changed.
pub fn reveal<D: Dom>(dom: &D, img: &D::Element) -> bool {
    let Some(src) = dom.attribute(img, DATA_SRC) else {
        return false;
    };
    if dom.attribute(img, "src").as_deref() == Some(src.as_str()) {
        return false;
    }
    dom.set_attribute(img, "src", &src);
    true
}

#[cfg(test)]
#[path = "lazy_images_test.rs"]
mod lazy_images_test;
