//! Light/dark theme initialization and toggle.
//!
//! Reads the stored preference and applies a `data-theme` attribute to the
//! `<html>` element. Toggle writes back to the store and updates that
//! attribute.
//!
//! TRADE-OFFS
//! ==========
//! The system color-scheme query is only consulted when nothing is stored,
//! and outside the browser it always reports light.

use crate::dom::Dom;
use crate::util::storage::PreferenceStore;

pub const STORAGE_KEY: &str = "theme";
pub const THEME_ATTRIBUTE: &str = "data-theme";
pub const TOGGLE_ID: &str = "themeToggle";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// A stored preference wins; otherwise follow the system color scheme.
pub fn resolve(stored: Option<&str>, prefers_dark: bool) -> Theme {
    stored.and_then(Theme::parse).unwrap_or(if prefers_dark { Theme::Dark } else { Theme::Light })
}

/// Whether the system prefers a dark color scheme.
pub fn system_prefers_dark() -> bool {
    #[cfg(feature = "hydrate")]
    {
        web_sys::window()
            .and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok().flatten())
            .is_some_and(|mq| mq.matches())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        false
    }
}

pub fn apply<D: Dom>(dom: &D, theme: Theme) {
    if let Some(root) = dom.root() {
        dom.set_attribute(&root, THEME_ATTRIBUTE, theme.as_str());
    }
}

/// Theme currently applied to the document; light when unset.
pub fn current<D: Dom>(dom: &D) -> Theme {
    dom.root()
        .and_then(|root| dom.attribute(&root, THEME_ATTRIBUTE))
        .as_deref()
        .and_then(Theme::parse)
        .unwrap_or_default()
}

/// Apply the initial theme at boot. The store is only read here.
pub fn init<D: Dom, P: PreferenceStore>(dom: &D, store: &P, prefers_dark: bool) -> Theme {
    let theme = resolve(store.get(STORAGE_KEY).as_deref(), prefers_dark);
    apply(dom, theme);
    theme
}

/// Flip the theme and persist the new preference.
pub fn toggle<D: Dom, P: PreferenceStore>(dom: &D, store: &P) -> Theme {
    let next = current(dom).toggled();
    apply(dom, next);
    store.set(STORAGE_KEY, next.as_str());
    next
}

#[cfg(test)]
#[path = "theme_test.rs"]
mod theme_test;
