use serde::{Deserialize, Serialize};

/// A discussion category. The slug is its public identifier.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Topic {
    pub id: i64,
    pub slug: String,
    pub description: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for inserting a new topic.
#[derive(Debug, Clone)]
pub struct NewTopic {
    pub slug: String,
    pub description: String,
}

/// A user-authored post as stored.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub user_id: String,
    pub topic_id: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for inserting a new post.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub user_id: String,
    pub topic_id: i64,
}

/// A post joined with the fields listings need: topic slug, author and
/// comment count.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PostWithData {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: String,
    pub topic_slug: String,
    pub user_name: Option<String>,
    pub user_image: Option<String>,
    pub comment_count: i64,
}

/// A principal issued by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
    pub created_at: String,
}

/// Data for creating or refreshing a user at sign-in.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
}

/// A session row joined with its user.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SessionWithUser {
    pub session_id: i64,
    pub expires_at: String,
    pub user_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
}

/// A stored block of code.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Snippet {
    pub id: i64,
    pub title: String,
    pub code: String,
}

/// Data for inserting a new snippet.
#[derive(Debug, Clone)]
pub struct NewSnippet {
    pub title: String,
    pub code: String,
}
