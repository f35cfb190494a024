//! Form actions for both applications.
//!
//! Every action runs the same stages: validate the raw form, check identity
//! where required, resolve the parent entity, perform one write. Success is a
//! [`RedirectTo`] to the canonical page, failure is a [`FormErrors`] for the
//! form to re-render. Nothing here panics or leaks a storage error upward.

pub mod forum;
pub mod snippets;

use axum::response::{IntoResponse, Redirect, Response};

use crate::forms::FormErrors;

/// Navigation target after a successful action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTo(pub String);

impl RedirectTo {
    #[must_use]
    pub fn path(&self) -> &str {
        &self.0
    }
}

impl IntoResponse for RedirectTo {
    fn into_response(self) -> Response {
        Redirect::to(&self.0).into_response()
    }
}

/// Outcome of a form action.
pub type ActionResult = Result<RedirectTo, FormErrors>;
