//! Utility helpers shared across page modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser/environment concerns from page and modal
//! logic to improve reuse and testability.

pub mod storage;
