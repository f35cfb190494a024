//! Maud page templates for both applications.
//!
//! Each page function produces a complete HTML document. Pages that contain
//! a form take a [`FormState`] so a failed submission can be re-rendered with
//! the submitted values and the errors.

pub mod forum;
pub mod snippets;

use crate::components::FieldErrors;
use crate::forms::{FormData, FormErrors};

/// Submitted values and errors of a form being re-rendered.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormState<'a> {
    pub values: Option<&'a FormData>,
    pub errors: Option<&'a FormErrors>,
}

impl<'a> FormState<'a> {
    /// An empty form.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A failed submission.
    #[must_use]
    pub fn failed(values: &'a FormData, errors: &'a FormErrors) -> Self {
        Self {
            values: Some(values),
            errors: Some(errors),
        }
    }

    /// Previously submitted value of `name`.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&'a str> {
        self.values
            .and_then(|values| values.get(name))
            .map(String::as_str)
    }

    #[must_use]
    pub fn field_errors(&self, name: &str) -> FieldErrors<'a> {
        FieldErrors::new(self.errors, name)
    }

    #[must_use]
    pub fn is_invalid(&self, name: &str) -> bool {
        self.errors
            .is_some_and(|errors| !errors.field_errors(name).is_empty())
    }
}
