//! Base layout components for the web UI.
//!
//! This module provides the page skeleton shared by both applications:
//! the HTML head, the per-site navigation header and the footer.

use maud::{html, Markup, Render, DOCTYPE};

use super::button::Button;
use super::form::{Form, Input};
use crate::auth::SessionUser;

/// Which application a page belongs to. Controls branding and navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Site {
    Forum,
    Snippets,
}

impl Site {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Forum => "Discuss",
            Self::Snippets => "Snippets",
        }
    }
}

/// Base page layout builder.
///
/// # Example
///
/// ```ignore
/// use maud::html;
/// use crate::components::layout::{BaseLayout, Site};
///
/// let content = html! { h1 { "Hello World" } };
/// let page = BaseLayout::new("My Page", Site::Forum)
///     .with_user(ctx.user())
///     .render(content);
/// ```
#[derive(Debug, Clone)]
pub struct BaseLayout<'a> {
    title: &'a str,
    site: Site,
    user: Option<&'a SessionUser>,
    search_term: Option<&'a str>,
}

impl<'a> BaseLayout<'a> {
    /// Create a new base layout with the given page title.
    #[must_use]
    pub fn new(title: &'a str, site: Site) -> Self {
        Self {
            title,
            site,
            user: None,
            search_term: None,
        }
    }

    /// Set the signed-in user shown in the forum header.
    #[must_use]
    pub fn with_user(mut self, user: Option<&'a SessionUser>) -> Self {
        self.user = user;
        self
    }

    /// Prefill the forum search box.
    #[must_use]
    pub fn with_search_term(mut self, term: &'a str) -> Self {
        self.search_term = Some(term);
        self
    }

    /// Render the complete HTML page with the given content.
    ///
    /// The content will be placed inside the `<main class="container">` element.
    #[must_use]
    pub fn render(self, content: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="UTF-8";
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                    meta name="color-scheme" content="light dark";
                    title { (self.title) " - " (self.site.name()) }
                }
                body {
                    (self.render_header())
                    main class="container" {
                        (content)
                    }
                    (self.render_footer())
                }
            }
        }
    }

    fn render_header(&self) -> Markup {
        match self.site {
            Site::Forum => self.render_forum_header(),
            Site::Snippets => Self::render_snippets_header(),
        }
    }

    fn render_forum_header(&self) -> Markup {
        let search = html! {
            (Input::search("term")
                .value_opt(self.search_term)
                .placeholder("Search posts")
                .autocomplete("off"))
        };

        html! {
            header class="container" {
                nav {
                    ul {
                        li {
                            a href="/" {
                                strong class="site-logo" { "Discuss" }
                            }
                        }
                    }
                    ul {
                        li { (Form::post("/search", search).class("search-form")) }
                    }
                    ul {
                        (self.render_auth_nav())
                    }
                }
            }
        }
    }

    /// Render authentication-related navigation items.
    fn render_auth_nav(&self) -> Markup {
        match self.user {
            Some(user) => html! {
                li class="profile" {
                    @if let Some(image) = &user.image {
                        img class="avatar" src=(image) alt="" width="32" height="32";
                    }
                    " "
                    (user.name.as_deref().unwrap_or(&user.id))
                }
                li {
                    (Form::post("/auth/signout", Button::outline("Sign Out").submit().render()))
                }
            },
            None => html! {
                li {
                    (Form::post("/auth/signin", Button::secondary("Sign In").submit().render()))
                }
            },
        }
    }

    fn render_snippets_header() -> Markup {
        html! {
            header class="container" {
                nav {
                    ul {
                        li { a href="/" { strong class="site-logo" { "Snippets" } } }
                    }
                    ul {
                        li { a href="/" { "Home" } }
                        li { a href="/snippets/new" { "Create Snippet" } }
                    }
                }
            }
        }
    }

    /// Render the page footer.
    fn render_footer(&self) -> Markup {
        html! {
            footer class="container" {
                small { (self.site.name()) }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> SessionUser {
        SessionUser {
            id: "u1".to_string(),
            name: Some("Ada".to_string()),
            email: Some("ada@example.com".to_string()),
            image: Some("https://example.com/ada.png".to_string()),
        }
    }

    #[test]
    fn test_base_layout_basic_structure() {
        let content = html! { h1 { "Test Content" } };
        let html = BaseLayout::new("Test Page", Site::Forum)
            .render(content)
            .into_string();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Test Page - Discuss</title>"));
        assert!(html.contains(r#"<main class="container">"#));
        assert!(html.contains("<h1>Test Content</h1>"));
    }

    #[test]
    fn test_forum_header_anonymous() {
        let html = BaseLayout::new("Home", Site::Forum)
            .render(html! {})
            .into_string();

        assert!(html.contains(r#"action="/auth/signin""#));
        assert!(!html.contains(r#"action="/auth/signout""#));
        assert!(html.contains(r#"action="/search""#));
    }

    #[test]
    fn test_forum_header_signed_in() {
        let user = test_user();
        let html = BaseLayout::new("Home", Site::Forum)
            .with_user(Some(&user))
            .render(html! {})
            .into_string();

        assert!(html.contains(r#"action="/auth/signout""#));
        assert!(html.contains("Ada"));
        assert!(html.contains(r#"src="https://example.com/ada.png""#));
    }

    #[test]
    fn test_search_term_is_prefilled_and_escaped() {
        let html = BaseLayout::new("Search", Site::Forum)
            .with_search_term("<b>x</b>")
            .render(html! {})
            .into_string();

        assert!(html.contains("&lt;b&gt;x&lt;/b&gt;"));
        assert!(!html.contains("<b>x</b>"));
    }

    #[test]
    fn test_snippets_header() {
        let html = BaseLayout::new("Snippets", Site::Snippets)
            .render(html! {})
            .into_string();

        assert!(html.contains("<title>Snippets - Snippets</title>"));
        assert!(html.contains(r#"<a href="/snippets/new">Create Snippet</a>"#));
        assert!(!html.contains("/auth/signin"));
    }
}
