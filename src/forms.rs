//! Form input validation.
//!
//! Routes hand every submission over as a raw [`FormData`] map. The `parse`
//! constructors below turn that map into typed inputs, or collect every
//! violation into a [`FormErrors`] value that the templates render next to
//! the offending fields.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Raw string-keyed form submission.
pub type FormData = HashMap<String, String>;

/// What kind of failure a [`FormErrors`] value describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// One or more fields failed validation. Storage was not touched.
    #[default]
    Validation,
    /// No principal on the request. Storage was not touched.
    Unauthenticated,
    /// A referenced entity does not exist.
    NotFound,
    /// The write collided with an existing row.
    Conflict,
    /// The storage call failed.
    Storage,
}

/// Per-field and form-level error messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormErrors {
    kind: FailureKind,
    fields: BTreeMap<String, Vec<String>>,
    #[serde(rename = "_form")]
    form: Vec<String>,
}

impl FormErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A single field error.
    #[must_use]
    pub fn field(name: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(name, message);
        errors
    }

    /// A form-level error of the given kind.
    #[must_use]
    pub fn form(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            fields: BTreeMap::new(),
            form: vec![message.into()],
        }
    }

    #[must_use]
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::form(FailureKind::Unauthenticated, message)
    }

    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::form(FailureKind::NotFound, message)
    }

    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::form(FailureKind::Conflict, message)
    }

    /// Convert a storage failure into a form-level message.
    ///
    /// Uses the full error chain when it has any text, `fallback` otherwise.
    #[must_use]
    pub fn storage(error: &anyhow::Error, fallback: &str) -> Self {
        let message = format!("{error:#}");
        if message.trim().is_empty() {
            Self::form(FailureKind::Storage, fallback)
        } else {
            Self::form(FailureKind::Storage, message)
        }
    }

    /// Record a message against a field.
    pub fn add(&mut self, name: &str, message: impl Into<String>) {
        self.fields
            .entry(name.to_string())
            .or_default()
            .push(message.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.form.is_empty()
    }

    #[must_use]
    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    /// Messages recorded for `name`, empty if the field is valid.
    #[must_use]
    pub fn field_errors(&self, name: &str) -> &[String] {
        self.fields.get(name).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn form_errors(&self) -> &[String] {
        &self.form
    }

    /// Names of every field that has at least one error.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = self.form.clone();
        for (name, messages) in &self.fields {
            parts.push(format!("{name}: {}", messages.join(", ")));
        }
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for FormErrors {}

/// How strictly topic names are checked against the slug pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlugRule {
    /// At least one lowercase letter or dash somewhere in the name.
    #[default]
    Loose,
    /// The whole name consists of lowercase letters and dashes.
    Strict,
}

static SLUG_CHAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z-]").unwrap());
static SLUG_FULL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z-]+$").unwrap());

impl SlugRule {
    #[must_use]
    pub fn matches(self, name: &str) -> bool {
        match self {
            Self::Loose => SLUG_CHAR.is_match(name),
            Self::Strict => SLUG_FULL.is_match(name),
        }
    }
}

fn value<'a>(form: &'a FormData, name: &str) -> &'a str {
    form.get(name).map_or("", String::as_str)
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn min_len(errors: &mut FormErrors, name: &str, value: &str, min: usize, message: &str) {
    if char_len(value) < min {
        errors.add(name, message);
    }
}

/// Validated input for creating a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePostInput {
    pub title: String,
    pub content: String,
    pub topic_slug: String,
}

impl CreatePostInput {
    /// Validate `title`, `content` and `topic_slug`.
    ///
    /// # Errors
    ///
    /// Returns every field violation found.
    pub fn parse(form: &FormData) -> Result<Self, FormErrors> {
        let title = value(form, "title");
        let content = value(form, "content");
        let topic_slug = value(form, "topic_slug");

        let mut errors = FormErrors::new();
        min_len(&mut errors, "title", title, 3, "Title must be at least 3 characters");
        min_len(
            &mut errors,
            "content",
            content,
            10,
            "Content must be at least 10 characters",
        );
        min_len(&mut errors, "topic_slug", topic_slug, 1, "Topic slug is required");

        errors.into_result(|| Self {
            title: title.to_string(),
            content: content.to_string(),
            topic_slug: topic_slug.to_string(),
        })
    }
}

/// Validated input for creating a topic. The name becomes the slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTopicInput {
    pub name: String,
    pub description: String,
}

impl CreateTopicInput {
    /// Validate `name` and `description`.
    ///
    /// # Errors
    ///
    /// Returns every field violation found.
    pub fn parse(form: &FormData, rule: SlugRule) -> Result<Self, FormErrors> {
        let name = value(form, "name");
        let description = value(form, "description");

        let mut errors = FormErrors::new();
        min_len(&mut errors, "name", name, 3, "Must be at least 3 characters");
        if !rule.matches(name) {
            errors.add("name", "Must be lowercase letters or dashes without space");
        }
        min_len(
            &mut errors,
            "description",
            description,
            10,
            "Must be at least 10 characters",
        );

        errors.into_result(|| Self {
            name: name.to_string(),
            description: description.to_string(),
        })
    }
}

/// Validated input for creating a snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSnippetInput {
    pub title: String,
    pub code: String,
}

impl CreateSnippetInput {
    /// Check the title length. `code` is accepted as-is.
    ///
    /// # Errors
    ///
    /// Returns a `title` field error when the title is too short.
    pub fn parse(form: &FormData) -> Result<Self, FormErrors> {
        let title = value(form, "title");
        if char_len(title) < 3 {
            return Err(FormErrors::field(
                "title",
                "Title must be at least 3 characters long",
            ));
        }

        Ok(Self {
            title: title.to_string(),
            code: value(form, "code").to_string(),
        })
    }
}

/// Replacement code for an existing snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSnippetInput {
    pub code: String,
}

impl EditSnippetInput {
    #[must_use]
    pub fn parse(form: &FormData) -> Self {
        Self {
            code: value(form, "code").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> FormData {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_post_input_valid() {
        let input = CreatePostInput::parse(&form(&[
            ("title", "Hello"),
            ("content", "Long enough content"),
            ("topic_slug", "rust"),
            ("extra", "ignored"),
        ]))
        .unwrap();
        assert_eq!(input.title, "Hello");
        assert_eq!(input.topic_slug, "rust");
    }

    #[test]
    fn test_post_input_collects_all_errors() {
        let errors = CreatePostInput::parse(&form(&[("title", "ab")])).unwrap_err();
        assert_eq!(errors.kind(), FailureKind::Validation);
        assert_eq!(
            errors.field_errors("title"),
            ["Title must be at least 3 characters"]
        );
        assert_eq!(
            errors.field_errors("content"),
            ["Content must be at least 10 characters"]
        );
        assert_eq!(errors.field_errors("topic_slug"), ["Topic slug is required"]);
        assert!(errors.form_errors().is_empty());
    }

    #[test]
    fn test_lengths_count_characters_not_bytes() {
        // Three characters, six bytes.
        let input = CreatePostInput::parse(&form(&[
            ("title", "ééé"),
            ("content", "éééééééééé"),
            ("topic_slug", "x"),
        ]));
        assert!(input.is_ok());

        let errors = CreatePostInput::parse(&form(&[
            ("title", "éé"),
            ("content", "ééééééééé"),
            ("topic_slug", "x"),
        ]))
        .unwrap_err();
        assert_eq!(errors.fields().count(), 2);
    }

    #[test]
    fn test_topic_name_too_short() {
        let errors = CreateTopicInput::parse(
            &form(&[("name", "ab"), ("description", "a fine description")]),
            SlugRule::Loose,
        )
        .unwrap_err();
        assert_eq!(errors.field_errors("name"), ["Must be at least 3 characters"]);
        assert!(errors.field_errors("description").is_empty());
    }

    #[test]
    fn test_topic_valid_name() {
        let input = CreateTopicInput::parse(
            &form(&[("name", "valid-name"), ("description", "0123456789")]),
            SlugRule::Strict,
        )
        .unwrap();
        assert_eq!(input.name, "valid-name");
    }

    #[test]
    fn test_loose_slug_rule_accepts_partial_match() {
        assert!(SlugRule::Loose.matches("Hello World"));
        assert!(SlugRule::Loose.matches("-"));
        assert!(!SlugRule::Loose.matches("HELLO"));
        assert!(!SlugRule::Loose.matches("123"));
    }

    #[test]
    fn test_strict_slug_rule_requires_full_match() {
        assert!(SlugRule::Strict.matches("rust-lang"));
        assert!(!SlugRule::Strict.matches("Hello World"));
        assert!(!SlugRule::Strict.matches("rust lang"));
        assert!(!SlugRule::Strict.matches(""));
    }

    #[test]
    fn test_topic_pattern_error() {
        let errors = CreateTopicInput::parse(
            &form(&[("name", "ABC"), ("description", "0123456789")]),
            SlugRule::Loose,
        )
        .unwrap_err();
        assert_eq!(
            errors.field_errors("name"),
            ["Must be lowercase letters or dashes without space"]
        );
    }

    #[test]
    fn test_snippet_title_guard() {
        let errors = CreateSnippetInput::parse(&form(&[("title", "ab"), ("code", "x")]))
            .unwrap_err();
        assert_eq!(
            errors.field_errors("title"),
            ["Title must be at least 3 characters long"]
        );
        assert_eq!(errors.fields().count(), 1);

        let input = CreateSnippetInput::parse(&form(&[("title", "abc")])).unwrap();
        assert_eq!(input.code, "");
    }

    #[test]
    fn test_storage_error_message() {
        let err = anyhow::anyhow!("disk full").context("Failed to insert snippet");
        let errors = FormErrors::storage(&err, "Something went wrong");
        assert_eq!(errors.kind(), FailureKind::Storage);
        assert_eq!(
            errors.form_errors(),
            ["Failed to insert snippet: disk full"]
        );

        let empty = anyhow::anyhow!("");
        let errors = FormErrors::storage(&empty, "Something went wrong");
        assert_eq!(errors.form_errors(), ["Something went wrong"]);
    }

    #[test]
    fn test_display() {
        let mut errors = FormErrors::unauthenticated("You must be logged in");
        errors.add("title", "too short");
        assert_eq!(errors.to_string(), "You must be logged in; title: too short");
    }
}
