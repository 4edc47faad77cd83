//! Page configuration.
//!
//! The defaults describe the published site. A page may override any field
//! by embedding a JSON document:
//!
//! ```html
//! <script type="application/json" id="site-config">
//!   { "focus_delay_ms": 150,
//!     "triggers": [ { "trigger": "contactButton", "dialog": "contactModal" } ] }
//! </script>
//! ```
//!
//! Absent fields keep their defaults. A malformed document is logged and
//! ignored rather than breaking initialization.

use std::collections::HashSet;

use serde::Deserialize;

use crate::dom::Dom;

/// Element id of the embedded JSON override.
pub const CONFIG_ELEMENT_ID: &str = "site-config";

pub const DEFAULT_FOCUS_DELAY_MS: u32 = 100;
pub const DEFAULT_SCROLL_TOP_THRESHOLD_PX: f64 = 400.0;
pub const DEFAULT_SERVICE_WORKER_PATH: &str = "/sw.js";
pub const DEFAULT_ANALYTICS_DOMAIN: &str = "example.com";
pub const DEFAULT_ANALYTICS_SRC: &str = "https://plausible.io/js/plausible.js";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid site config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("dialog '{0}' is bound to more than one trigger")]
    DuplicateDialog(String),
    #[error("binding has an empty {0} id")]
    EmptyId(&'static str),
}

/// Which open dialog the Escape key closes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscapePolicy {
    /// The most recently opened dialog that is still open.
    #[default]
    MostRecent,
    /// The first open dialog in this explicit order; dialogs not listed
    /// follow in registration order.
    Fixed(Vec<String>),
}

/// One service-offering card and the dialog it opens.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CardBinding {
    pub card: String,
    pub dialog: String,
}

impl CardBinding {
    fn new(card: &str, dialog: &str) -> Self {
        Self { card: card.to_owned(), dialog: dialog.to_owned() }
    }
}

/// A standalone trigger element, looked up by id, and the dialog it opens.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TriggerBinding {
    pub trigger: String,
    pub dialog: String,
}

/// Selectors locating the parts of a dialog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DialogSelectors {
    pub overlay: String,
    pub close: String,
    pub content: String,
}

impl Default for DialogSelectors {
    fn default() -> Self {
        Self {
            overlay: ".modal-overlay".to_owned(),
            close: ".modal-close".to_owned(),
            content: ".modal-content".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Container the card click/keydown listeners are delegated to.
    pub cards_container: String,
    /// Selector identifying a card inside the container.
    pub card_selector: String,
    pub cards: Vec<CardBinding>,
    /// Triggers outside the card container, each with its own listeners.
    pub triggers: Vec<TriggerBinding>,
    pub dialog: DialogSelectors,
    /// Delay before focus moves into a freshly opened dialog.
    pub focus_delay_ms: u32,
    pub escape_policy: EscapePolicy,
    pub scroll_top_threshold_px: f64,
    pub service_worker_path: Option<String>,
    pub analytics_opt_in: bool,
    pub analytics_domain: String,
    pub analytics_src: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            cards_container: "#projects .cards".to_owned(),
            card_selector: ".service-offering-card".to_owned(),
            cards: vec![
                CardBinding::new("info-arch-service-card", "infoArchServiceModal"),
                CardBinding::new("technical-content-card", "technicalContentModal"),
                CardBinding::new("api-doc-service-card", "apiDocServiceModal"),
                CardBinding::new("ai-native-doc-card", "aiNativeDocModal"),
            ],
            triggers: Vec::new(),
            dialog: DialogSelectors::default(),
            focus_delay_ms: DEFAULT_FOCUS_DELAY_MS,
            escape_policy: EscapePolicy::default(),
            scroll_top_threshold_px: DEFAULT_SCROLL_TOP_THRESHOLD_PX,
            service_worker_path: Some(DEFAULT_SERVICE_WORKER_PATH.to_owned()),
            analytics_opt_in: false,
            analytics_domain: DEFAULT_ANALYTICS_DOMAIN.to_owned(),
            analytics_src: DEFAULT_ANALYTICS_SRC.to_owned(),
        }
    }
}

impl SiteConfig {
    /// Parse and validate a JSON override document.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read the embedded override from the page, falling back to defaults.
    pub fn load<D: Dom>(dom: &D) -> Self {
        let Some(el) = dom.element_by_id(CONFIG_ELEMENT_ID) else {
            return Self::default();
        };
        match Self::from_json(&dom.text(&el)) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{e}; using default site config");
                Self::default()
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let cards = self.cards.iter().map(|b| ("card", b.card.as_str(), b.dialog.as_str()));
        let triggers = self.triggers.iter().map(|b| ("trigger", b.trigger.as_str(), b.dialog.as_str()));
        let mut seen = HashSet::new();
        for (kind, trigger, dialog) in cards.chain(triggers) {
            if trigger.is_empty() {
                return Err(ConfigError::EmptyId(kind));
            }
            if dialog.is_empty() {
                return Err(ConfigError::EmptyId("dialog"));
            }
            if !seen.insert(dialog) {
                return Err(ConfigError::DuplicateDialog(dialog.to_owned()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
