//! Form components for maud templates.
//!
//! Inputs keep the submitted value when a form is re-rendered after a
//! failed action, and [`FieldErrors`] lists the messages for one field.

use maud::{html, Markup, Render};

use crate::forms::FormErrors;

/// A form container element.
#[derive(Debug)]
pub struct Form<'a> {
    /// Form action URL
    pub action: &'a str,
    /// HTTP method ("get" or "post")
    pub method: &'a str,
    /// Form content (inputs, buttons, etc.)
    pub content: Markup,
    /// Optional CSS class
    pub class: Option<&'a str>,
}

impl<'a> Form<'a> {
    /// Create a new form with the given action and method.
    #[must_use]
    pub fn new(action: &'a str, method: &'a str, content: Markup) -> Self {
        Self {
            action,
            method,
            content,
            class: None,
        }
    }

    /// Create a POST form.
    #[must_use]
    pub fn post(action: &'a str, content: Markup) -> Self {
        Self::new(action, "post", content)
    }

    /// Set the CSS class.
    #[must_use]
    pub fn class(mut self, class: &'a str) -> Self {
        self.class = Some(class);
        self
    }
}

impl Render for Form<'_> {
    fn render(&self) -> Markup {
        html! {
            form action=(self.action) method=(self.method) class=[self.class] {
                (self.content)
            }
        }
    }
}

/// An input element.
#[derive(Debug, Clone)]
pub struct Input<'a> {
    /// Input name attribute
    pub name: &'a str,
    /// Input type ("text", "search", "hidden", etc.)
    pub r#type: &'a str,
    /// Current value
    pub value: Option<&'a str>,
    /// Placeholder text
    pub placeholder: Option<&'a str>,
    /// Whether the field is required
    pub required: bool,
    /// Optional ID attribute
    pub id: Option<&'a str>,
    /// Autocomplete attribute
    pub autocomplete: Option<&'a str>,
    /// Marks the field as failing validation
    pub invalid: bool,
}

impl<'a> Input<'a> {
    /// Create a new input with the given name and type.
    #[must_use]
    pub fn new(name: &'a str, r#type: &'a str) -> Self {
        Self {
            name,
            r#type,
            value: None,
            placeholder: None,
            required: false,
            id: None,
            autocomplete: None,
            invalid: false,
        }
    }

    /// Create a text input.
    #[must_use]
    pub fn text(name: &'a str) -> Self {
        Self::new(name, "text")
    }

    /// Create a search input.
    #[must_use]
    pub fn search(name: &'a str) -> Self {
        Self::new(name, "search")
    }

    /// Set the value if Some.
    #[must_use]
    pub fn value_opt(mut self, value: Option<&'a str>) -> Self {
        self.value = value;
        self
    }

    /// Set the placeholder.
    #[must_use]
    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    /// Mark as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the ID.
    #[must_use]
    pub fn id(mut self, id: &'a str) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the autocomplete attribute.
    #[must_use]
    pub fn autocomplete(mut self, autocomplete: &'a str) -> Self {
        self.autocomplete = Some(autocomplete);
        self
    }

    /// Mark the field invalid when it has errors.
    #[must_use]
    pub fn invalid(mut self, invalid: bool) -> Self {
        self.invalid = invalid;
        self
    }
}

impl Render for Input<'_> {
    fn render(&self) -> Markup {
        html! {
            input
                type=(self.r#type)
                name=(self.name)
                value=[self.value]
                placeholder=[self.placeholder]
                required[self.required]
                id=[self.id]
                autocomplete=[self.autocomplete]
                aria-invalid=[self.invalid.then_some("true")];
        }
    }
}

/// A textarea element.
#[derive(Debug)]
pub struct TextArea<'a> {
    /// Textarea name attribute
    pub name: &'a str,
    /// Current value/content
    pub value: Option<&'a str>,
    /// Placeholder text
    pub placeholder: Option<&'a str>,
    /// Number of visible rows
    pub rows: Option<u32>,
    /// Optional ID attribute
    pub id: Option<&'a str>,
    /// Optional CSS class
    pub class: Option<&'a str>,
    /// Marks the field as failing validation
    pub invalid: bool,
}

impl<'a> TextArea<'a> {
    /// Create a new textarea with the given name.
    #[must_use]
    pub fn new(name: &'a str) -> Self {
        Self {
            name,
            value: None,
            placeholder: None,
            rows: None,
            id: None,
            class: None,
            invalid: false,
        }
    }

    /// Set the value if Some.
    #[must_use]
    pub fn value_opt(mut self, value: Option<&'a str>) -> Self {
        self.value = value;
        self
    }

    /// Set the placeholder.
    #[must_use]
    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    /// Set the number of rows.
    #[must_use]
    pub fn rows(mut self, rows: u32) -> Self {
        self.rows = Some(rows);
        self
    }

    /// Set the ID.
    #[must_use]
    pub fn id(mut self, id: &'a str) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the CSS class.
    #[must_use]
    pub fn class(mut self, class: &'a str) -> Self {
        self.class = Some(class);
        self
    }

    /// Mark the field invalid when it has errors.
    #[must_use]
    pub fn invalid(mut self, invalid: bool) -> Self {
        self.invalid = invalid;
        self
    }
}

impl Render for TextArea<'_> {
    fn render(&self) -> Markup {
        html! {
            textarea
                name=(self.name)
                placeholder=[self.placeholder]
                rows=[self.rows]
                id=[self.id]
                class=[self.class]
                aria-invalid=[self.invalid.then_some("true")]
            {
                @if let Some(value) = self.value {
                    (value)
                }
            }
        }
    }
}

/// Validation messages for a single field.
#[derive(Debug)]
pub struct FieldErrors<'a> {
    pub messages: &'a [String],
}

impl<'a> FieldErrors<'a> {
    /// Messages for `field` in `errors`, if any errors were recorded.
    #[must_use]
    pub fn new(errors: Option<&'a FormErrors>, field: &str) -> Self {
        Self {
            messages: errors.map_or(&[], |e| e.field_errors(field)),
        }
    }
}

impl Render for FieldErrors<'_> {
    fn render(&self) -> Markup {
        html! {
            @if !self.messages.is_empty() {
                small class="field-error" { (self.messages.join(", ")) }
            }
        }
    }
}

/// A form group container for label + input + field errors.
#[derive(Debug)]
pub struct FormGroup<'a> {
    /// Label text
    pub label: &'a str,
    /// Input ID (also used for label's `for` attribute)
    pub id: &'a str,
    /// The input element
    pub input: Markup,
    /// Errors rendered under the input
    pub errors: FieldErrors<'a>,
}

impl<'a> FormGroup<'a> {
    /// Create a new form group.
    #[must_use]
    pub fn new(label: &'a str, id: &'a str, input: Markup) -> Self {
        Self {
            label,
            id,
            input,
            errors: FieldErrors { messages: &[] },
        }
    }

    /// Attach the errors for this group's field.
    #[must_use]
    pub fn errors(mut self, errors: FieldErrors<'a>) -> Self {
        self.errors = errors;
        self
    }
}

impl Render for FormGroup<'_> {
    fn render(&self) -> Markup {
        html! {
            div class="form-group" {
                label for=(self.id) { (self.label) }
                (self.input)
                (self.errors)
            }
        }
    }
}
