//! # offline-worker
//!
//! Service worker for the portfolio site: seeds a versioned cache on
//! install, drops stale versions on activate, and answers GET requests
//! cache-first with network write-through.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`cache`] | Storage, network, and spawner seams |
//! | [`lifecycle`] | Install / activate / fetch over those seams |
//! | [`config`] | Cache version and asset manifest |
//! | [`error`] | `WorkerError` |
//!
//! `browser` binds the lifecycle to `ServiceWorkerGlobalScope` and is
//! compiled only with the `hydrate` feature.

#[cfg(feature = "hydrate")]
pub mod browser;
pub mod cache;
pub mod config;
pub mod error;
pub mod lifecycle;
#[cfg(test)]
pub mod memory;

pub use config::WorkerConfig;
pub use error::WorkerError;
pub use lifecycle::{FetchOutcome, OfflineCache, WorkerState};
