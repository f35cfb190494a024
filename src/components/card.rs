//! Card components for post and topic listings.

use maud::{html, Markup, Render};

use crate::db::{PostWithData, Topic};
use crate::paths;

/// A post summary card used by every post listing.
///
/// # Example
///
/// ```ignore
/// use crate::components::card::PostCard;
///
/// let card = PostCard::new(&post).with_topic();
/// ```
#[derive(Debug, Clone)]
pub struct PostCard<'a> {
    pub post: &'a PostWithData,
    pub show_topic: bool,
}

impl<'a> PostCard<'a> {
    #[must_use]
    pub const fn new(post: &'a PostWithData) -> Self {
        Self {
            post,
            show_topic: false,
        }
    }

    /// Show which topic the post belongs to.
    #[must_use]
    pub const fn with_topic(mut self) -> Self {
        self.show_topic = true;
        self
    }
}

impl Render for PostCard<'_> {
    fn render(&self) -> Markup {
        let post = self.post;
        let author = post.user_name.as_deref().unwrap_or("Anonymous");

        html! {
            article class="post-card" {
                h3 {
                    a href=(paths::post_show(&post.topic_slug, post.id)) { (post.title) }
                }
                p class="meta" {
                    "By " (author)
                    @if self.show_topic {
                        " in "
                        a href=(paths::topic_show(&post.topic_slug)) { (post.topic_slug) }
                    }
                    " · "
                    (comment_count_label(post.comment_count))
                }
            }
        }
    }
}

/// "1 comment", "3 comments".
#[must_use]
pub fn comment_count_label(count: i64) -> String {
    if count == 1 {
        "1 comment".to_string()
    } else {
        format!("{count} comments")
    }
}

/// A list of post cards, or an empty state when there are none.
#[derive(Debug, Clone)]
pub struct PostList<'a> {
    pub posts: &'a [PostWithData],
    pub show_topic: bool,
    pub empty_message: &'a str,
}

impl<'a> PostList<'a> {
    #[must_use]
    pub const fn new(posts: &'a [PostWithData]) -> Self {
        Self {
            posts,
            show_topic: false,
            empty_message: "No posts yet.",
        }
    }

    #[must_use]
    pub const fn with_topics(mut self) -> Self {
        self.show_topic = true;
        self
    }

    #[must_use]
    pub const fn empty_message(mut self, message: &'a str) -> Self {
        self.empty_message = message;
        self
    }
}

impl Render for PostList<'_> {
    fn render(&self) -> Markup {
        html! {
            @if self.posts.is_empty() {
                (EmptyState::new(self.empty_message))
            } @else {
                div class="post-list" {
                    @for post in self.posts {
                        @if self.show_topic {
                            (PostCard::new(post).with_topic())
                        } @else {
                            (PostCard::new(post))
                        }
                    }
                }
            }
        }
    }
}

/// Sidebar list of topics linking to each topic page.
#[derive(Debug, Clone)]
pub struct TopicList<'a> {
    pub topics: &'a [Topic],
}

impl<'a> TopicList<'a> {
    #[must_use]
    pub const fn new(topics: &'a [Topic]) -> Self {
        Self { topics }
    }
}

impl Render for TopicList<'_> {
    fn render(&self) -> Markup {
        html! {
            @if self.topics.is_empty() {
                (EmptyState::new("No topics yet."))
            } @else {
                ul class="topic-list" {
                    @for topic in self.topics {
                        li {
                            a href=(paths::topic_show(&topic.slug)) { (topic.slug) }
                        }
                    }
                }
            }
        }
    }
}

/// Placeholder shown when a listing is empty.
#[derive(Debug, Clone)]
pub struct EmptyState<'a> {
    pub message: &'a str,
}

impl<'a> EmptyState<'a> {
    #[must_use]
    pub const fn new(message: &'a str) -> Self {
        Self { message }
    }
}

impl Render for EmptyState<'_> {
    fn render(&self) -> Markup {
        html! {
            p class="empty-state" { (self.message) }
        }
    }
}
