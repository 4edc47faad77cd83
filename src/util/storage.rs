//! Key/value preference storage.
//!
//! SYSTEM CONTEXT
//! ==============
//! The theme preference is the only durable client state on the site. It is
//! read through [`PreferenceStore`] so the theme logic runs the same against
//! `localStorage` and against the in-memory store used by tests.

/// A string-keyed, string-valued preference store.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;

    /// Best-effort write; storage quota or privacy-mode failures are ignored.
    fn set(&self, key: &str, value: &str);
}

/// `window.localStorage`. Every call degrades to a no-op when storage is
/// unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl PreferenceStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        #[cfg(feature = "hydrate")]
        {
            let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten())?;
            storage.get_item(key).ok().flatten()
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = key;
            None
        }
    }

    fn set(&self, key: &str, value: &str) {
        #[cfg(feature = "hydrate")]
        {
            let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) else {
                return;
            };
            let _ = storage.set_item(key, value);
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (key, value);
        }
    }
}


#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;
