//! Forum pages: home, topic, post, post creation, search and 404.

use maud::{html, Markup, Render};

use super::FormState;
use crate::auth::SessionUser;
use crate::components::{
    comment_count_label, BaseLayout, Button, EmptyState, Form, FormAlerts, FormGroup, Input,
    PostList, Site, TextArea, TopicList,
};
use crate::db::{PostWithData, Topic};
use crate::paths;

/// Data for the forum home page.
#[derive(Debug, Clone, Copy)]
pub struct HomePageParams<'a> {
    pub user: Option<&'a SessionUser>,
    pub top_posts: &'a [PostWithData],
    pub topics: &'a [Topic],
    pub topic_form: FormState<'a>,
}

/// Top posts, the topic creation form and the topic list.
#[must_use]
pub fn render_home(params: &HomePageParams<'_>) -> Markup {
    let content = html! {
        div class="grid home" {
            section class="top-posts" {
                h1 { "Top Posts" }
                (PostList::new(params.top_posts).with_topics())
            }
            aside {
                (render_topic_form(params.topic_form))
                h3 { "Topics" }
                (TopicList::new(params.topics))
            }
        }
    };

    BaseLayout::new("Home", Site::Forum)
        .with_user(params.user)
        .render(content)
}

fn render_topic_form(state: FormState<'_>) -> Markup {
    let fields = html! {
        (FormAlerts::new(state.errors))
        (FormGroup::new(
            "Name",
            "topic-name",
            Input::text("name")
                .id("topic-name")
                .placeholder("Name")
                .value_opt(state.value("name"))
                .invalid(state.is_invalid("name"))
                .render(),
        )
        .errors(state.field_errors("name")))
        (FormGroup::new(
            "Description",
            "topic-description",
            TextArea::new("description")
                .id("topic-description")
                .placeholder("Describe your topic")
                .value_opt(state.value("description"))
                .invalid(state.is_invalid("description"))
                .render(),
        )
        .errors(state.field_errors("description")))
        (Button::primary("Create Topic").submit())
    };

    html! {
        section class="topic-create" {
            h3 { "Create a Topic" }
            (Form::post("/topics", fields).class("topic-form"))
        }
    }
}

/// A topic page with its posts.
#[must_use]
pub fn render_topic(user: Option<&SessionUser>, topic: &Topic, posts: &[PostWithData]) -> Markup {
    let new_post_path = paths::post_create(&topic.slug);

    let content = html! {
        div class="grid topic" {
            section {
                h1 class="topic-slug" { (topic.slug) }
                p class="topic-description" { (topic.description) }
                (PostList::new(posts))
            }
            aside {
                (Button::primary("Create Post").href(&new_post_path))
            }
        }
    };

    BaseLayout::new(&topic.slug, Site::Forum)
        .with_user(user)
        .render(content)
}

/// The post creation page for a topic.
#[must_use]
pub fn render_post_create(
    user: Option<&SessionUser>,
    topic_slug: &str,
    state: FormState<'_>,
) -> Markup {
    let action = paths::topic_posts(topic_slug);

    let fields = html! {
        (FormAlerts::new(state.errors))
        (FormGroup::new(
            "Title",
            "post-title",
            Input::text("title")
                .id("post-title")
                .placeholder("Title")
                .value_opt(state.value("title"))
                .invalid(state.is_invalid("title"))
                .render(),
        )
        .errors(state.field_errors("title")))
        (FormGroup::new(
            "Content",
            "post-content",
            TextArea::new("content")
                .id("post-content")
                .placeholder("Content")
                .rows(8)
                .value_opt(state.value("content"))
                .invalid(state.is_invalid("content"))
                .render(),
        )
        .errors(state.field_errors("content")))
        (state.field_errors("topic_slug"))
        (Button::primary("Create Post").submit())
    };

    let content = html! {
        h1 { "Create a Post" }
        p {
            "In "
            a href=(paths::topic_show(topic_slug)) { (topic_slug) }
        }
        (Form::post(&action, fields).class("post-form"))
    };

    BaseLayout::new("Create a Post", Site::Forum)
        .with_user(user)
        .render(content)
}

/// A single post.
#[must_use]
pub fn render_post(user: Option<&SessionUser>, post: &PostWithData) -> Markup {
    let author = post.user_name.as_deref().unwrap_or("Anonymous");

    let content = html! {
        article class="post" {
            header {
                a href=(paths::topic_show(&post.topic_slug)) { "< Back to " (post.topic_slug) }
                h1 { (post.title) }
                p class="meta" {
                    @if let Some(image) = &post.user_image {
                        img class="avatar" src=(image) alt="" width="24" height="24";
                        " "
                    }
                    "By " (author) " · " (post.created_at)
                }
            }
            p class="post-content" { (post.content) }
            footer {
                small { (comment_count_label(post.comment_count)) }
            }
        }
    };

    BaseLayout::new(&post.title, Site::Forum)
        .with_user(user)
        .render(content)
}

/// Search results for `term`.
#[must_use]
pub fn render_search(user: Option<&SessionUser>, term: &str, posts: &[PostWithData]) -> Markup {
    let content = html! {
        h1 { "Search results for \"" (term) "\"" }
        @if term.is_empty() {
            (EmptyState::new("Enter a term to search posts."))
        } @else {
            (PostList::new(posts).with_topics().empty_message("No posts matched your search."))
        }
    };

    BaseLayout::new("Search", Site::Forum)
        .with_user(user)
        .with_search_term(term)
        .render(content)
}

/// 404 page for the forum.
#[must_use]
pub fn render_not_found(user: Option<&SessionUser>, message: &str) -> Markup {
    let content = html! {
        h1 { "Not Found" }
        p { (message) }
        a href=(paths::home()) { "Go home" }
    };

    BaseLayout::new("Not Found", Site::Forum)
        .with_user(user)
        .render(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::{FormData, FormErrors};

    fn post(id: i64, title: &str) -> PostWithData {
        PostWithData {
            id,
            title: title.to_string(),
            content: "Some long content".to_string(),
            created_at: "2024-01-01T00:00:00.000Z".to_string(),
            topic_slug: "rust".to_string(),
            user_name: Some("Ada".to_string()),
            user_image: None,
            comment_count: 2,
        }
    }

    fn topic() -> Topic {
        Topic {
            id: 1,
            slug: "rust".to_string(),
            description: "All about Rust".to_string(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_home_lists_posts_and_topics() {
        let posts = vec![post(1, "First post")];
        let topics = vec![topic()];
        let html = render_home(&HomePageParams {
            user: None,
            top_posts: &posts,
            topics: &topics,
            topic_form: FormState::empty(),
        })
        .into_string();

        assert!(html.contains("First post"));
        assert!(html.contains(r#"href="/topics/rust""#));
        assert!(html.contains(r#"action="/topics""#));
    }

    #[test]
    fn test_home_rerenders_topic_form_errors() {
        let mut values = FormData::new();
        values.insert("name".to_string(), "ab".to_string());
        let errors = FormErrors::field("name", "Must be at least 3 characters");

        let html = render_home(&HomePageParams {
            user: None,
            top_posts: &[],
            topics: &[],
            topic_form: FormState::failed(&values, &errors),
        })
        .into_string();

        assert!(html.contains("Must be at least 3 characters"));
        assert!(html.contains(r#"value="ab""#));
    }

    #[test]
    fn test_topic_page() {
        let posts = vec![post(3, "Hello")];
        let html = render_topic(None, &topic(), &posts).into_string();
        assert!(html.contains(r#"<h1 class="topic-slug">rust</h1>"#));
        assert!(html.contains(r#"href="/topics/rust/posts/3""#));
        assert!(html.contains(r#"href="/topics/rust/posts/new""#));
    }

    #[test]
    fn test_post_create_page_form_action() {
        let html = render_post_create(None, "rust", FormState::empty()).into_string();
        assert!(html.contains(r#"action="/topics/rust/posts""#));
        assert!(html.contains(r#"name="title""#));
        assert!(html.contains(r#"name="content""#));
    }

    #[test]
    fn test_post_page_escapes_content() {
        let mut p = post(1, "Title");
        p.content = "<script>alert(1)</script>".to_string();
        let html = render_post(None, &p).into_string();
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("2 comments"));
    }

    #[test]
    fn test_search_page_empty_results() {
        let html = render_search(None, "nothing", &[]).into_string();
        assert!(html.contains("No posts matched your search."));
        assert!(html.contains(r#"value="nothing""#));
    }
}
