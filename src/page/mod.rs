//! Page behaviors outside the modal system.
//!
//! Each function takes the elements it needs and does nothing else; the
//! browser glue in `boot` looks elements up and skips any behavior
//! whose markup is missing.

pub mod contact_form;
pub mod document;
pub mod lazy_images;
pub mod nav;
pub mod scroll_top;
pub mod theme;
