use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use sqlx::SqlitePool;

use super::models::{
    NewPost, NewSnippet, NewTopic, NewUser, Post, PostWithData, SessionWithUser, Snippet, Topic,
    User,
};

/// Number of posts shown on the forum home page.
pub const TOP_POSTS_LIMIT: i64 = 5;

/// Current time in the RFC 3339 form stored in every timestamp column.
///
/// Millisecond precision keeps lexical order equal to chronological order.
#[must_use]
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Escape `%`, `_` and `\` so a user term matches literally inside LIKE.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

// ========== Topics ==========

/// Insert a new topic, returning its ID.
pub async fn insert_topic(pool: &SqlitePool, topic: &NewTopic) -> Result<i64> {
    let now = now_timestamp();
    let result = sqlx::query(
        r"
        INSERT INTO topics (slug, description, created_at, updated_at)
        VALUES (?, ?, ?, ?)
        ",
    )
    .bind(&topic.slug)
    .bind(&topic.description)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await
    .context("Failed to insert topic")?;

    Ok(result.last_insert_rowid())
}

/// Get a topic by its slug.
pub async fn get_topic_by_slug(pool: &SqlitePool, slug: &str) -> Result<Option<Topic>> {
    sqlx::query_as("SELECT * FROM topics WHERE slug = ?")
        .bind(slug)
        .fetch_optional(pool)
        .await
        .context("Failed to fetch topic by slug")
}

/// List every topic in creation order.
pub async fn list_topics(pool: &SqlitePool) -> Result<Vec<Topic>> {
    sqlx::query_as("SELECT * FROM topics ORDER BY id")
        .fetch_all(pool)
        .await
        .context("Failed to list topics")
}

/// Count all topics.
pub async fn count_topics(pool: &SqlitePool) -> Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM topics")
        .fetch_one(pool)
        .await
        .context("Failed to count topics")
}

// ========== Posts ==========

const POST_WITH_DATA_SELECT: &str = r"
    SELECT
        p.id,
        p.title,
        p.content,
        p.created_at,
        t.slug AS topic_slug,
        u.name AS user_name,
        u.image AS user_image,
        (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comment_count
    FROM posts p
    JOIN topics t ON t.id = p.topic_id
    LEFT JOIN users u ON u.id = p.user_id
";

/// Insert a new post, returning its ID.
pub async fn insert_post(pool: &SqlitePool, post: &NewPost) -> Result<i64> {
    let now = now_timestamp();
    let result = sqlx::query(
        r"
        INSERT INTO posts (title, content, user_id, topic_id, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        ",
    )
    .bind(&post.title)
    .bind(&post.content)
    .bind(&post.user_id)
    .bind(post.topic_id)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await
    .context("Failed to insert post")?;

    Ok(result.last_insert_rowid())
}

/// Get a stored post by ID.
pub async fn get_post(pool: &SqlitePool, id: i64) -> Result<Option<Post>> {
    sqlx::query_as("SELECT * FROM posts WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to fetch post")
}

/// Get a post with its topic slug, author and comment count.
pub async fn fetch_post(pool: &SqlitePool, id: i64) -> Result<Option<PostWithData>> {
    let sql = format!("{POST_WITH_DATA_SELECT} WHERE p.id = ?");
    sqlx::query_as(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to fetch post with data")
}

/// Posts belonging to the topic with the given slug, in insertion order.
pub async fn fetch_posts_by_topic_slug(
    pool: &SqlitePool,
    slug: &str,
) -> Result<Vec<PostWithData>> {
    let sql = format!("{POST_WITH_DATA_SELECT} WHERE t.slug = ? ORDER BY p.id");
    sqlx::query_as(&sql)
        .bind(slug)
        .fetch_all(pool)
        .await
        .context("Failed to fetch posts by topic slug")
}

/// The most recent posts across all topics, newest first.
pub async fn fetch_top_posts(pool: &SqlitePool) -> Result<Vec<PostWithData>> {
    let sql = format!("{POST_WITH_DATA_SELECT} ORDER BY p.created_at DESC, p.id DESC LIMIT ?");
    sqlx::query_as(&sql)
        .bind(TOP_POSTS_LIMIT)
        .fetch_all(pool)
        .await
        .context("Failed to fetch top posts")
}

/// Posts whose title or content contains `term`.
///
/// Matching follows SQLite `LIKE`, which ignores ASCII case only.
pub async fn fetch_posts_by_search_term(
    pool: &SqlitePool,
    term: &str,
) -> Result<Vec<PostWithData>> {
    let pattern = format!("%{}%", escape_like(term));
    let sql = format!(
        r"{POST_WITH_DATA_SELECT}
        WHERE p.title LIKE ?1 ESCAPE '\' OR p.content LIKE ?1 ESCAPE '\'
        ORDER BY p.created_at DESC, p.id DESC"
    );
    sqlx::query_as(&sql)
        .bind(&pattern)
        .fetch_all(pool)
        .await
        .context("Failed to search posts")
}

/// Count all posts.
pub async fn count_posts(pool: &SqlitePool) -> Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM posts")
        .fetch_one(pool)
        .await
        .context("Failed to count posts")
}

// ========== Comments ==========

/// Insert a comment on a post, returning its ID.
pub async fn insert_comment(
    pool: &SqlitePool,
    post_id: i64,
    user_id: &str,
    content: &str,
) -> Result<i64> {
    let result = sqlx::query(
        "INSERT INTO comments (content, post_id, user_id, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(content)
    .bind(post_id)
    .bind(user_id)
    .bind(now_timestamp())
    .execute(pool)
    .await
    .context("Failed to insert comment")?;

    Ok(result.last_insert_rowid())
}

// ========== Users ==========

/// Create a user or refresh the profile fields of an existing one.
pub async fn upsert_user(pool: &SqlitePool, user: &NewUser) -> Result<()> {
    sqlx::query(
        r"
        INSERT INTO users (id, name, email, image, created_at)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            email = excluded.email,
            image = excluded.image
        ",
    )
    .bind(&user.id)
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.image)
    .bind(now_timestamp())
    .execute(pool)
    .await
    .context("Failed to upsert user")?;

    Ok(())
}

/// Get a user by ID.
pub async fn get_user_by_id(pool: &SqlitePool, id: &str) -> Result<Option<User>> {
    sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to fetch user")
}

// ========== Sessions ==========

/// Create a session for a user, returning its ID.
pub async fn create_session(
    pool: &SqlitePool,
    user_id: &str,
    token_hash: &str,
    expires_at: &str,
) -> Result<i64> {
    let result = sqlx::query(
        r"
        INSERT INTO sessions (user_id, token_hash, created_at, expires_at)
        VALUES (?, ?, ?, ?)
        ",
    )
    .bind(user_id)
    .bind(token_hash)
    .bind(now_timestamp())
    .bind(expires_at)
    .execute(pool)
    .await
    .context("Failed to create session")?;

    Ok(result.last_insert_rowid())
}

/// Look up a session and its user by token hash.
pub async fn get_session_with_user(
    pool: &SqlitePool,
    token_hash: &str,
) -> Result<Option<SessionWithUser>> {
    sqlx::query_as(
        r"
        SELECT s.id AS session_id, s.expires_at, u.id AS user_id, u.name, u.email, u.image
        FROM sessions s
        JOIN users u ON u.id = s.user_id
        WHERE s.token_hash = ?
        ",
    )
    .bind(token_hash)
    .fetch_optional(pool)
    .await
    .context("Failed to fetch session")
}

/// Delete a session by token hash.
pub async fn delete_session(pool: &SqlitePool, token_hash: &str) -> Result<()> {
    sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
        .bind(token_hash)
        .execute(pool)
        .await
        .context("Failed to delete session")?;
    Ok(())
}

/// Delete every expired session, returning how many were removed.
pub async fn delete_expired_sessions(pool: &SqlitePool) -> Result<u64> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at < ?")
        .bind(now_timestamp())
        .execute(pool)
        .await
        .context("Failed to delete expired sessions")?;
    Ok(result.rows_affected())
}

// ========== Snippets ==========

/// List every snippet in creation order.
pub async fn list_snippets(pool: &SqlitePool) -> Result<Vec<Snippet>> {
    sqlx::query_as("SELECT * FROM snippets ORDER BY id")
        .fetch_all(pool)
        .await
        .context("Failed to list snippets")
}

/// Get a snippet by ID.
pub async fn get_snippet(pool: &SqlitePool, id: i64) -> Result<Option<Snippet>> {
    sqlx::query_as("SELECT * FROM snippets WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to fetch snippet")
}

/// Insert a new snippet, returning its ID.
pub async fn insert_snippet(pool: &SqlitePool, snippet: &NewSnippet) -> Result<i64> {
    let result = sqlx::query("INSERT INTO snippets (title, code) VALUES (?, ?)")
        .bind(&snippet.title)
        .bind(&snippet.code)
        .execute(pool)
        .await
        .context("Failed to insert snippet")?;

    Ok(result.last_insert_rowid())
}

/// Replace a snippet's code. Returns `false` when no snippet has that ID.
pub async fn update_snippet_code(pool: &SqlitePool, id: i64, code: &str) -> Result<bool> {
    let result = sqlx::query("UPDATE snippets SET code = ? WHERE id = ?")
        .bind(code)
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to update snippet")?;

    Ok(result.rows_affected() > 0)
}

/// Delete a snippet. Returns `false` when no snippet has that ID.
pub async fn delete_snippet(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM snippets WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete snippet")?;

    Ok(result.rows_affected() > 0)
}

/// Count all snippets.
pub async fn count_snippets(pool: &SqlitePool) -> Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM snippets")
        .fetch_one(pool)
        .await
        .context("Failed to count snippets")
}
