//! Reference-counted background scroll lock.
//!
//! The body's `overflow` flag is page-wide. Each open dialog holds one
//! reference; the page scrolls again only when the last one is released.

use crate::dom::Dom;

#[derive(Debug, Default)]
pub struct ScrollLock {
    holders: usize,
}

impl ScrollLock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn holders(&self) -> usize {
        self.holders
    }

    pub fn is_locked(&self) -> bool {
        self.holders > 0
    }

    pub fn acquire<D: Dom>(&mut self, dom: &D) {
        self.holders += 1;
        if self.holders == 1 {
            dom.set_scroll_locked(true);
        }
    }

    /// Release one reference. Extra releases are ignored.
    pub fn release<D: Dom>(&mut self, dom: &D) {
        if self.holders == 0 {
            return;
        }
        self.holders -= 1;
        if self.holders == 0 {
            dom.set_scroll_locked(false);
        }
    }

    /// Drop every reference and unlock, e.g. on page teardown.
    pub fn reset<D: Dom>(&mut self, dom: &D) {
        self.holders = 0;
        dom.set_scroll_locked(false);
    }
}

#[cfg(test)]
#[path = "scroll_lock_test.rs"]
mod scroll_lock_test;
