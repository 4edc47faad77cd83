//! Cache version and pre-seeded asset manifest.
//!
//! Bumping the version is the only way to invalidate the offline cache: the
//! next activation deletes every cache under any other name. Builds can set
//! `FOLIO_CACHE_VERSION` to override the default without touching code.

pub const DEFAULT_CACHE_VERSION: &str = "ayananta-site-v1";

/// Paths seeded on install, in order.
pub const DEFAULT_ASSETS: &[&str] = &[
    "/",
    "/index.html",
    "/assets/css/style.css",
    "/assets/js/main.js",
    "/assets/images/profile.jpg",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    pub cache_version: String,
    pub assets: Vec<String>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_VERSION, DEFAULT_ASSETS)
    }
}

impl WorkerConfig {
    pub fn new(cache_version: &str, assets: &[&str]) -> Self {
        Self {
            cache_version: cache_version.to_owned(),
            assets: assets.iter().map(|a| (*a).to_owned()).collect(),
        }
    }

    /// Default manifest under the version baked in at compile time.
    pub fn from_build_env() -> Self {
        Self::with_version_override(option_env!("FOLIO_CACHE_VERSION"))
    }

    fn with_version_override(raw: Option<&str>) -> Self {
        let version = raw.map(str::trim).filter(|v| !v.is_empty()).unwrap_or(DEFAULT_CACHE_VERSION);
        Self::new(version, DEFAULT_ASSETS)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
