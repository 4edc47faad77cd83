//! # folio
//!
//! WASM page module for the portfolio site. Replaces the hand-written page
//! script with a Rust-native interaction layer.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`dom`] | Abstract element surface and its `web-sys` implementation |
//! | [`modal`] | Dialog registry, lifecycle, focus and dismissal rules |
//! | [`page`] | Navigation, accordions, theme, lazy images, contact form, scroll-to-top |
//! | [`config`] | Typed page configuration with embedded JSON overrides |
//! | [`util`] | Preference storage |
//!
//! Browser wiring lives in `boot` and is compiled only with the `hydrate`
//! feature; everything else is platform independent and tested natively.

#[cfg(feature = "hydrate")]
pub mod boot;
pub mod config;
pub mod dom;
pub mod modal;
pub mod page;
pub mod util;
