//! Modal dialogs bound to trigger elements and service-offering cards.
//!
//! DESIGN
//! ======
//! Every dialog is a record in one registry processed by a single generic
//! open/close routine. Page-wide resources are owned here rather than by
//! individual dialogs: the background scroll lock is reference counted, and
//! the deferred focus shift is a cancellable task keyed by dialog id.
//!
//! TRADE-OFFS
//! ==========
//! Opening a dialog never closes another. Escape closes exactly one dialog
//! per press; [`crate::config::EscapePolicy`] decides which.

pub mod manager;
pub mod schedule;
pub mod scroll_lock;

pub use manager::{Dispatch, ModalHandle, ModalManager, ModalRef, Trigger, Visibility};
pub use schedule::Scheduler;
pub use scroll_lock::ScrollLock;
