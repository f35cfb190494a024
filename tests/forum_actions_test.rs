//! Integration tests for the forum form actions.

use std::sync::Mutex;

use discuss_snippets::actions::forum::{create_post, create_topic};
use discuss_snippets::auth::{RequestContext, SessionUser};
use discuss_snippets::db::{
    count_posts, count_topics, fetch_posts_by_topic_slug, get_topic_by_slug, insert_topic,
    upsert_user, Database, NewTopic, NewUser,
};
use discuss_snippets::forms::{FailureKind, FormData, SlugRule};
use discuss_snippets::web::ViewCache;
use tempfile::TempDir;

/// Records every invalidated path.
#[derive(Default)]
struct RecordingCache {
    invalidated: Mutex<Vec<String>>,
}

impl RecordingCache {
    fn paths(&self) -> Vec<String> {
        self.invalidated.lock().unwrap().clone()
    }
}

impl ViewCache for RecordingCache {
    fn invalidate(&self, path: &str) {
        self.invalidated.lock().unwrap().push(path.to_string());
    }
}

async fn setup_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.sqlite");
    let db = Database::new(&db_path)
        .await
        .expect("Failed to create database");
    (db, temp_dir)
}

fn form(pairs: &[(&str, &str)]) -> FormData {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

async fn signed_in(db: &Database) -> RequestContext {
    upsert_user(
        db.pool(),
        &NewUser {
            id: "user-1".to_string(),
            name: Some("Ada".to_string()),
            email: Some("ada@example.com".to_string()),
            image: None,
        },
    )
    .await
    .expect("Failed to create user");

    RequestContext::signed_in(SessionUser {
        id: "user-1".to_string(),
        name: Some("Ada".to_string()),
        email: Some("ada@example.com".to_string()),
        image: None,
    })
}

async fn seed_topic(db: &Database, slug: &str) {
    insert_topic(
        db.pool(),
        &NewTopic {
            slug: slug.to_string(),
            description: "A topic for testing".to_string(),
        },
    )
    .await
    .expect("Failed to insert topic");
}

// ========== create_topic ==========

#[tokio::test]
async fn test_create_topic_success() {
    let (db, _temp_dir) = setup_db().await;
    let ctx = signed_in(&db).await;
    let cache = RecordingCache::default();

    let redirect = create_topic(
        &db,
        &cache,
        &ctx,
        SlugRule::Loose,
        &form(&[("name", "valid-name"), ("description", "0123456789")]),
    )
    .await
    .expect("Topic should be created");

    assert_eq!(redirect.path(), "/topics/valid-name");
    assert_eq!(count_topics(db.pool()).await.unwrap(), 1);
    let topic = get_topic_by_slug(db.pool(), "valid-name")
        .await
        .unwrap()
        .expect("Topic row missing");
    assert_eq!(topic.description, "0123456789");
    assert_eq!(cache.paths(), ["/"]);
}

#[tokio::test]
async fn test_create_topic_short_name_writes_nothing() {
    let (db, _temp_dir) = setup_db().await;
    let ctx = signed_in(&db).await;
    let cache = RecordingCache::default();

    let errors = create_topic(
        &db,
        &cache,
        &ctx,
        SlugRule::Loose,
        &form(&[("name", "ab"), ("description", "0123456789")]),
    )
    .await
    .expect_err("Short name should fail");

    assert_eq!(errors.kind(), FailureKind::Validation);
    assert_eq!(errors.field_errors("name"), ["Must be at least 3 characters"]);
    assert_eq!(count_topics(db.pool()).await.unwrap(), 0);
    assert!(cache.paths().is_empty());
}

#[tokio::test]
async fn test_create_topic_requires_login() {
    let (db, _temp_dir) = setup_db().await;
    let cache = RecordingCache::default();

    let errors = create_topic(
        &db,
        &cache,
        &RequestContext::anonymous(),
        SlugRule::Loose,
        &form(&[("name", "valid-name"), ("description", "0123456789")]),
    )
    .await
    .expect_err("Anonymous user should be rejected");

    assert_eq!(errors.kind(), FailureKind::Unauthenticated);
    assert_eq!(
        errors.form_errors(),
        ["You must be logged in to create a topic"]
    );
    assert_eq!(count_topics(db.pool()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_topic_rejects_empty_user_id() {
    let (db, _temp_dir) = setup_db().await;
    let cache = RecordingCache::default();
    let ctx = RequestContext::signed_in(SessionUser {
        id: String::new(),
        name: None,
        email: None,
        image: None,
    });

    let errors = create_topic(
        &db,
        &cache,
        &ctx,
        SlugRule::Loose,
        &form(&[("name", "valid-name"), ("description", "0123456789")]),
    )
    .await
    .unwrap_err();

    assert_eq!(errors.kind(), FailureKind::Unauthenticated);
    assert_eq!(count_topics(db.pool()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_topic_duplicate_slug() {
    let (db, _temp_dir) = setup_db().await;
    let ctx = signed_in(&db).await;
    let cache = RecordingCache::default();
    let input = form(&[("name", "rust"), ("description", "Everything about Rust")]);

    create_topic(&db, &cache, &ctx, SlugRule::Loose, &input)
        .await
        .expect("First topic should be created");
    let errors = create_topic(&db, &cache, &ctx, SlugRule::Loose, &input)
        .await
        .expect_err("Duplicate should fail");

    assert_eq!(errors.kind(), FailureKind::Conflict);
    assert_eq!(errors.form_errors(), ["Topic already exists"]);
    assert_eq!(count_topics(db.pool()).await.unwrap(), 1);
}

#[tokio::test]
async fn test_slug_rules() {
    let (db, _temp_dir) = setup_db().await;
    let ctx = signed_in(&db).await;
    let cache = RecordingCache::default();
    let input = form(&[("name", "Rust Lang"), ("description", "Everything about Rust")]);

    let errors = create_topic(&db, &cache, &ctx, SlugRule::Strict, &input)
        .await
        .expect_err("Strict rule rejects spaces and capitals");
    assert_eq!(
        errors.field_errors("name"),
        ["Must be lowercase letters or dashes without space"]
    );

    let redirect = create_topic(&db, &cache, &ctx, SlugRule::Loose, &input)
        .await
        .expect("Loose rule accepts a partial match");
    assert_eq!(redirect.path(), "/topics/Rust%20Lang");
}

// ========== create_post ==========

#[tokio::test]
async fn test_create_post_success() {
    let (db, _temp_dir) = setup_db().await;
    let ctx = signed_in(&db).await;
    let cache = RecordingCache::default();
    seed_topic(&db, "rust").await;

    let redirect = create_post(
        &db,
        &cache,
        &ctx,
        &form(&[
            ("title", "Hello"),
            ("content", "Hello world, this is a post"),
            ("topic_slug", "rust"),
        ]),
    )
    .await
    .expect("Post should be created");

    let posts = fetch_posts_by_topic_slug(db.pool(), "rust").await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].user_name.as_deref(), Some("Ada"));
    assert_eq!(
        redirect.path(),
        format!("/topics/rust/posts/{}", posts[0].id)
    );
    assert_eq!(cache.paths(), ["/topics/rust", "/"]);
}

#[tokio::test]
async fn test_create_post_short_title_writes_nothing() {
    let (db, _temp_dir) = setup_db().await;
    let ctx = signed_in(&db).await;
    let cache = RecordingCache::default();
    seed_topic(&db, "rust").await;

    let errors = create_post(
        &db,
        &cache,
        &ctx,
        &form(&[
            ("title", "ab"),
            ("content", "Hello world, this is a post"),
            ("topic_slug", "rust"),
        ]),
    )
    .await
    .expect_err("Short title should fail");

    assert_eq!(errors.kind(), FailureKind::Validation);
    assert_eq!(
        errors.field_errors("title"),
        ["Title must be at least 3 characters"]
    );
    assert_eq!(count_posts(db.pool()).await.unwrap(), 0);
    assert!(cache.paths().is_empty());
}

#[tokio::test]
async fn test_create_post_requires_login() {
    let (db, _temp_dir) = setup_db().await;
    let cache = RecordingCache::default();
    seed_topic(&db, "rust").await;

    let errors = create_post(
        &db,
        &cache,
        &RequestContext::anonymous(),
        &form(&[
            ("title", "Hello"),
            ("content", "Hello world, this is a post"),
            ("topic_slug", "rust"),
        ]),
    )
    .await
    .expect_err("Anonymous user should be rejected");

    assert_eq!(errors.kind(), FailureKind::Unauthenticated);
    assert_eq!(
        errors.form_errors(),
        ["You must be logged in to create a post"]
    );
    assert_eq!(count_posts(db.pool()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_post_unknown_topic() {
    let (db, _temp_dir) = setup_db().await;
    let ctx = signed_in(&db).await;
    let cache = RecordingCache::default();

    let errors = create_post(
        &db,
        &cache,
        &ctx,
        &form(&[
            ("title", "Hello"),
            ("content", "Hello world, this is a post"),
            ("topic_slug", "does-not-exist"),
        ]),
    )
    .await
    .expect_err("Unknown topic should fail");

    assert_eq!(errors.kind(), FailureKind::NotFound);
    assert_eq!(errors.form_errors(), ["Topic not found"]);
    assert_eq!(count_posts(db.pool()).await.unwrap(), 0);
    assert!(cache.paths().is_empty());
}

// ========== storage failures ==========

async fn drop_table(db: &Database, table: &str) {
    sqlx::query(&format!("DROP TABLE {table}"))
        .execute(db.pool())
        .await
        .expect("Failed to drop table");
}

#[tokio::test]
async fn test_create_topic_storage_failure_is_reported() {
    let (db, _temp_dir) = setup_db().await;
    let ctx = signed_in(&db).await;
    let cache = RecordingCache::default();
    drop_table(&db, "topics").await;

    let errors = create_topic(
        &db,
        &cache,
        &ctx,
        SlugRule::Loose,
        &form(&[("name", "valid-name"), ("description", "0123456789")]),
    )
    .await
    .expect_err("Insert into a missing table must fail");

    assert_eq!(errors.kind(), FailureKind::Storage);
    let [message] = errors.form_errors() else {
        panic!("Expected one form error, got {:?}", errors.form_errors());
    };
    assert!(message.contains("no such table: topics"), "{message}");
    assert!(cache.paths().is_empty());
}

#[tokio::test]
async fn test_create_post_storage_failure_is_reported() {
    let (db, _temp_dir) = setup_db().await;
    let ctx = signed_in(&db).await;
    let cache = RecordingCache::default();
    seed_topic(&db, "rust").await;
    drop_table(&db, "comments").await;
    drop_table(&db, "posts").await;

    let errors = create_post(
        &db,
        &cache,
        &ctx,
        &form(&[
            ("title", "Hello"),
            ("content", "Hello world, this is a post"),
            ("topic_slug", "rust"),
        ]),
    )
    .await
    .expect_err("Insert into a missing table must fail");

    assert_eq!(errors.kind(), FailureKind::Storage);
    let [message] = errors.form_errors() else {
        panic!("Expected one form error, got {:?}", errors.form_errors());
    };
    assert!(message.contains("no such table: posts"), "{message}");
    assert!(cache.paths().is_empty());
}
