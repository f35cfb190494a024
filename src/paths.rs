//! Route builders for both applications.
//!
//! Slugs are percent-encoded so that loosely validated topic names still
//! produce usable URLs.

use urlencoding::encode;

/// Forum home page.
#[must_use]
pub fn home() -> String {
    "/".to_string()
}

/// Topic detail page.
#[must_use]
pub fn topic_show(topic_slug: &str) -> String {
    format!("/topics/{}", encode(topic_slug))
}

/// Post creation page for a topic.
#[must_use]
pub fn post_create(topic_slug: &str) -> String {
    format!("/topics/{}/posts/new", encode(topic_slug))
}

/// Post creation form action for a topic.
#[must_use]
pub fn topic_posts(topic_slug: &str) -> String {
    format!("/topics/{}/posts", encode(topic_slug))
}

/// Post detail page.
#[must_use]
pub fn post_show(topic_slug: &str, post_id: i64) -> String {
    format!("/topics/{}/posts/{post_id}", encode(topic_slug))
}

/// Search results for a term.
#[must_use]
pub fn search(term: &str) -> String {
    format!("/search?term={}", encode(term))
}

/// Snippet list (the snippets app's home page).
#[must_use]
pub fn snippets_home() -> String {
    "/".to_string()
}

#[must_use]
pub fn snippet_new() -> String {
    "/snippets/new".to_string()
}

#[must_use]
pub fn snippet_show(id: i64) -> String {
    format!("/snippets/{id}")
}

#[must_use]
pub fn snippet_edit(id: i64) -> String {
    format!("/snippets/{id}/edit")
}

#[must_use]
pub fn snippet_delete(id: i64) -> String {
    format!("/snippets/{id}/delete")
}
