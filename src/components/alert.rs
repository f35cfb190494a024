//! Alert components for form-level messages.
//!
//! Field errors render next to their input (see [`super::form::FieldErrors`]).
//! Everything else an action reports, such as a missing login or a storage
//! failure, is shown as an alert above the form.

use maud::{html, Markup, Render};

use crate::forms::FormErrors;

/// An error message above a form.
#[derive(Debug, Clone, Copy)]
pub struct Alert<'a> {
    pub message: &'a str,
}

impl<'a> Alert<'a> {
    #[must_use]
    pub const fn error(message: &'a str) -> Self {
        Self { message }
    }
}

impl Render for Alert<'_> {
    fn render(&self) -> Markup {
        html! {
            article class="error" role="alert" { (self.message) }
        }
    }
}

/// Form-level messages from a failed action, one error alert each.
#[derive(Debug, Clone, Copy)]
pub struct FormAlerts<'a> {
    pub errors: Option<&'a FormErrors>,
}

impl<'a> FormAlerts<'a> {
    #[must_use]
    pub const fn new(errors: Option<&'a FormErrors>) -> Self {
        Self { errors }
    }
}

impl Render for FormAlerts<'_> {
    fn render(&self) -> Markup {
        let messages = self.errors.map_or(&[][..], FormErrors::form_errors);
        html! {
            @for message in messages {
                (Alert::error(message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_error() {
        let html = Alert::error("Something broke").render().into_string();
        assert!(html.contains(r#"class="error""#));
        assert!(html.contains(r#"role="alert""#));
        assert!(html.contains("Something broke"));
    }

    #[test]
    fn test_alert_escapes_message() {
        let html = Alert::error("<script>").render().into_string();
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_form_alerts_render_form_level_only() {
        let mut errors = FormErrors::unauthenticated("You must be logged in to create a post");
        errors.add("title", "Title must be at least 3 characters");

        let html = FormAlerts::new(Some(&errors)).render().into_string();
        assert!(html.contains("You must be logged in to create a post"));
        assert!(!html.contains("Title must be"));
    }

    #[test]
    fn test_form_alerts_empty() {
        assert!(FormAlerts::new(None).render().into_string().is_empty());
        let errors = FormErrors::field("title", "x");
        assert!(FormAlerts::new(Some(&errors))
            .render()
            .into_string()
            .is_empty());
    }
}
