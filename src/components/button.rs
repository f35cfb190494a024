//! Button component for the web UI.
//!
//! Renders as either a `<button>` or an `<a>` element depending on whether
//! an href is provided.

use maud::{html, Markup, Render};

/// Button style variants matching CSS classes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ButtonVariant {
    #[default]
    Primary,
    Outline,
    Danger,
    Secondary,
}

impl ButtonVariant {
    /// Returns the CSS class(es) for this variant.
    #[must_use]
    pub fn class(&self) -> &'static str {
        match self {
            Self::Primary => "btn btn-primary",
            Self::Outline => "btn outline",
            Self::Danger => "btn btn-danger",
            Self::Secondary => "btn btn-secondary",
        }
    }
}

/// A configurable button component.
///
/// # Example
///
/// ```ignore
/// use crate::components::button::Button;
///
/// let save = Button::primary("Save").submit();
/// let edit = Button::outline("Edit").href("/snippets/1/edit");
/// ```
#[derive(Debug, Clone)]
pub struct Button<'a> {
    /// Button label text
    pub label: &'a str,
    /// Button style variant
    pub variant: ButtonVariant,
    /// Optional href (renders as `<a>` if present)
    pub href: Option<&'a str>,
    /// Button type attribute (for `<button>` elements)
    pub r#type: Option<&'a str>,
}

impl<'a> Button<'a> {
    /// Creates a new button with the given label and variant.
    #[must_use]
    pub fn new(label: &'a str, variant: ButtonVariant) -> Self {
        Self {
            label,
            variant,
            href: None,
            r#type: None,
        }
    }

    #[must_use]
    pub fn primary(label: &'a str) -> Self {
        Self::new(label, ButtonVariant::Primary)
    }

    #[must_use]
    pub fn outline(label: &'a str) -> Self {
        Self::new(label, ButtonVariant::Outline)
    }

    #[must_use]
    pub fn danger(label: &'a str) -> Self {
        Self::new(label, ButtonVariant::Danger)
    }

    #[must_use]
    pub fn secondary(label: &'a str) -> Self {
        Self::new(label, ButtonVariant::Secondary)
    }

    /// Sets the href, rendering the button as an `<a>` element.
    #[must_use]
    pub fn href(mut self, href: &'a str) -> Self {
        self.href = Some(href);
        self
    }

    /// Makes this a form submit button.
    #[must_use]
    pub fn submit(mut self) -> Self {
        self.r#type = Some("submit");
        self
    }
}

impl Render for Button<'_> {
    fn render(&self) -> Markup {
        let class = self.variant.class();

        if let Some(href) = self.href {
            html! {
                a class=(class) href=(href) role="button" { (self.label) }
            }
        } else {
            html! {
                button class=(class) type=(self.r#type.unwrap_or("button")) {
                    (self.label)
                }
            }
        }
    }
}
