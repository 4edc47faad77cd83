//! Client-only contact form. Nothing is sent anywhere; a valid submission
//! is acknowledged in place and the form is cleared by the caller.

use crate::dom::Dom;

pub const FORM_ID: &str = "contactForm";
pub const STATUS_ID: &str = "formStatus";
pub const THANK_YOU: &str = "Thanks. Your message has been noted.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// Browser validation failed; the form keeps its input.
    Invalid,
    /// Acknowledged; the caller resets the form.
    Accepted,
}

pub fn submit<D: Dom>(dom: &D, valid: bool) -> Submission {
    if !valid {
        return Submission::Invalid;
    }
    if let Some(status) = dom.element_by_id(STATUS_ID) {
        dom.set_text(&status, THANK_YOU);
    }
    Submission::Accepted
}

#[cfg(test)]
#[path = "contact_form_test.rs"]
mod contact_form_test;
