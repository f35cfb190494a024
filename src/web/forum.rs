use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::Deserialize;

use super::pages::forum::{self as forum_pages, HomePageParams};
use super::pages::FormState;
use super::{cached_page, failure_status, internal_error, AppState};
use crate::actions;
use crate::auth::{CurrentSession, SessionUser};
use crate::db::{
    fetch_post, fetch_posts_by_search_term, fetch_posts_by_topic_slug, fetch_top_posts,
    get_topic_by_slug, list_topics, PostWithData, Topic,
};
use crate::forms::{FailureKind, FormData, FormErrors};
use crate::paths;

/// Routes of the forum application.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/topics", post(create_topic))
        .route("/topics/:slug", get(topic_show))
        .route("/topics/:slug/posts", post(create_post))
        .route("/topics/:slug/posts/new", get(post_new))
        .route("/topics/:slug/posts/:id", get(post_show))
        .route("/search", get(search).post(search_submit))
        .route("/healthz", get(health))
        .route("/api/posts/search", get(api_search))
}

// ========== HTML Routes ==========

async fn load_home(state: &AppState) -> Result<(Vec<PostWithData>, Vec<Topic>), Response> {
    let top_posts = fetch_top_posts(state.db.pool())
        .await
        .map_err(|e| internal_error("Failed to fetch top posts", &e))?;
    let topics = list_topics(state.db.pool())
        .await
        .map_err(|e| internal_error("Failed to list topics", &e))?;
    Ok((top_posts, topics))
}

fn render_home(
    user: Option<&SessionUser>,
    top_posts: &[PostWithData],
    topics: &[Topic],
    topic_form: FormState<'_>,
) -> String {
    forum_pages::render_home(&HomePageParams {
        user,
        top_posts,
        topics,
        topic_form,
    })
    .into_string()
}

async fn home(State(state): State<AppState>, CurrentSession(ctx): CurrentSession) -> Response {
    let user = ctx.user();
    let state_ref = &state;

    cached_page(&state.cache, &paths::home(), user.is_none(), move || async move {
        let (top_posts, topics) = load_home(state_ref).await?;
        Ok::<_, Response>(render_home(user, &top_posts, &topics, FormState::empty()))
    })
    .await
}

async fn create_topic(
    State(state): State<AppState>,
    CurrentSession(ctx): CurrentSession,
    Form(form): Form<FormData>,
) -> Response {
    let result = actions::forum::create_topic(
        &state.db,
        state.cache.as_ref(),
        &ctx,
        state.config.topic_slug_rule,
        &form,
    )
    .await;

    match result {
        Ok(redirect) => redirect.into_response(),
        Err(errors) => {
            let (top_posts, topics) = match load_home(&state).await {
                Ok(data) => data,
                Err(response) => return response,
            };
            let html = render_home(
                ctx.user(),
                &top_posts,
                &topics,
                FormState::failed(&form, &errors),
            );
            (failure_status(&errors), Html(html)).into_response()
        }
    }
}

async fn topic_show(
    State(state): State<AppState>,
    CurrentSession(ctx): CurrentSession,
    Path(slug): Path<String>,
) -> Response {
    let user = ctx.user();
    let state_ref = &state;
    let slug_ref = slug.as_str();

    cached_page(
        &state.cache,
        &paths::topic_show(&slug),
        user.is_none(),
        move || async move {
            let topic = match get_topic_by_slug(state_ref.db.pool(), slug_ref).await {
                Ok(Some(topic)) => topic,
                Ok(None) => return Err(not_found_page(user, "Topic not found")),
                Err(e) => return Err(internal_error("Failed to fetch topic", &e)),
            };
            let posts = fetch_posts_by_topic_slug(state_ref.db.pool(), slug_ref)
                .await
                .map_err(|e| internal_error("Failed to fetch topic posts", &e))?;
            Ok::<_, Response>(forum_pages::render_topic(user, &topic, &posts).into_string())
        },
    )
    .await
}

async fn post_new(
    State(state): State<AppState>,
    CurrentSession(ctx): CurrentSession,
    Path(slug): Path<String>,
) -> Response {
    match get_topic_by_slug(state.db.pool(), &slug).await {
        Ok(Some(topic)) => {
            let html = forum_pages::render_post_create(ctx.user(), &topic.slug, FormState::empty());
            Html(html.into_string()).into_response()
        }
        Ok(None) => not_found_page(ctx.user(), "Topic not found"),
        Err(e) => internal_error("Failed to fetch topic", &e),
    }
}

async fn create_post(
    State(state): State<AppState>,
    CurrentSession(ctx): CurrentSession,
    Path(slug): Path<String>,
    Form(mut form): Form<FormData>,
) -> Response {
    form.insert("topic_slug".to_string(), slug.clone());

    match actions::forum::create_post(&state.db, state.cache.as_ref(), &ctx, &form).await {
        Ok(redirect) => redirect.into_response(),
        Err(errors) => render_post_form_errors(ctx.user(), &slug, &form, &errors),
    }
}

fn render_post_form_errors(
    user: Option<&SessionUser>,
    slug: &str,
    form: &FormData,
    errors: &FormErrors,
) -> Response {
    let html = forum_pages::render_post_create(user, slug, FormState::failed(form, errors));
    (failure_status(errors), Html(html.into_string())).into_response()
}

async fn post_show(
    State(state): State<AppState>,
    CurrentSession(ctx): CurrentSession,
    Path((slug, id)): Path<(String, i64)>,
) -> Response {
    match fetch_post(state.db.pool(), id).await {
        Ok(Some(post)) if post.topic_slug == slug => {
            Html(forum_pages::render_post(ctx.user(), &post).into_string()).into_response()
        }
        Ok(_) => not_found_page(ctx.user(), "Post not found"),
        Err(e) => internal_error("Failed to fetch post", &e),
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    term: Option<String>,
}

async fn search(
    State(state): State<AppState>,
    CurrentSession(ctx): CurrentSession,
    Query(params): Query<SearchParams>,
) -> Response {
    let term = params.term.unwrap_or_default();

    let posts = if term.is_empty() {
        Vec::new()
    } else {
        match fetch_posts_by_search_term(state.db.pool(), &term).await {
            Ok(posts) => posts,
            Err(e) => return internal_error("Failed to search posts", &e),
        }
    };

    Html(forum_pages::render_search(ctx.user(), &term, &posts).into_string()).into_response()
}

async fn search_submit(Form(form): Form<FormData>) -> Response {
    actions::forum::search(&form).into_response()
}

async fn health() -> &'static str {
    "OK"
}

/// Fallback for unknown forum paths.
pub async fn not_found(CurrentSession(ctx): CurrentSession) -> Response {
    not_found_page(ctx.user(), "The page you are looking for does not exist.")
}

fn not_found_page(user: Option<&SessionUser>, message: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(forum_pages::render_not_found(user, message).into_string()),
    )
        .into_response()
}

// ========== JSON API ==========

async fn api_search(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Response {
    let term = params.term.unwrap_or_default();
    if term.is_empty() {
        let errors = FormErrors::field("term", "Search term is required");
        return (failure_status(&errors), Json(errors)).into_response();
    }

    match fetch_posts_by_search_term(state.db.pool(), &term).await {
        Ok(posts) => Json(serde_json::json!({
            "term": term,
            "count": posts.len(),
            "posts": posts,
        }))
        .into_response(),
        Err(e) => {
            tracing::error!("Failed to search posts: {e:#}");
            let errors = FormErrors::form(FailureKind::Storage, "Search failed");
            (failure_status(&errors), Json(errors)).into_response()
        }
    }
}
