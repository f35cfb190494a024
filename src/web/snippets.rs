use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Router};

use super::pages::snippets as snippet_pages;
use super::pages::FormState;
use super::{cached_page, failure_status, internal_error, AppState};
use crate::actions;
use crate::db::{get_snippet, list_snippets, Snippet};
use crate::forms::{FailureKind, FormData, FormErrors};
use crate::paths;

/// Routes of the snippet manager.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/snippets/new", get(new_form).post(create))
        .route("/snippets/:id", get(show))
        .route("/snippets/:id/edit", get(edit_form).post(edit))
        .route("/snippets/:id/delete", post(delete))
        .route("/healthz", get(health))
}

// The snippet manager has no sessions, so every request is cacheable.

async fn index(State(state): State<AppState>) -> Response {
    let state_ref = &state;
    cached_page(&state.cache, &paths::snippets_home(), true, move || async move {
        let snippets = list_snippets(state_ref.db.pool())
            .await
            .map_err(|e| internal_error("Failed to list snippets", &e))?;
        Ok::<_, Response>(snippet_pages::render_index(&snippets).into_string())
    })
    .await
}

async fn new_form() -> Response {
    Html(snippet_pages::render_new(FormState::empty()).into_string()).into_response()
}

async fn create(State(state): State<AppState>, Form(form): Form<FormData>) -> Response {
    match actions::snippets::create_snippet(&state.db, state.cache.as_ref(), &form).await {
        Ok(redirect) => redirect.into_response(),
        Err(errors) => {
            let html = snippet_pages::render_new(FormState::failed(&form, &errors));
            (failure_status(&errors), Html(html.into_string())).into_response()
        }
    }
}

async fn load_snippet(state: &AppState, id: i64) -> Result<Snippet, Response> {
    match get_snippet(state.db.pool(), id).await {
        Ok(Some(snippet)) => Ok(snippet),
        Ok(None) => Err(not_found_page("Snippet not found")),
        Err(e) => Err(internal_error("Failed to fetch snippet", &e)),
    }
}

async fn show(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let state_ref = &state;
    cached_page(&state.cache, &paths::snippet_show(id), true, move || async move {
        let snippet = load_snippet(state_ref, id).await?;
        Ok::<_, Response>(snippet_pages::render_show(&snippet, FormState::empty()).into_string())
    })
    .await
}

async fn edit_form(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match load_snippet(&state, id).await {
        Ok(snippet) => {
            Html(snippet_pages::render_edit(&snippet, FormState::empty()).into_string())
                .into_response()
        }
        Err(response) => response,
    }
}

async fn edit(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<FormData>,
) -> Response {
    match actions::snippets::edit_snippet(&state.db, state.cache.as_ref(), id, &form).await {
        Ok(redirect) => redirect.into_response(),
        Err(errors) => action_failed(&state, id, &errors, |snippet| {
            snippet_pages::render_edit(snippet, FormState::failed(&form, &errors))
        })
        .await,
    }
}

async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match actions::snippets::delete_snippet(&state.db, state.cache.as_ref(), id).await {
        Ok(redirect) => redirect.into_response(),
        Err(errors) => action_failed(&state, id, &errors, |snippet| {
            snippet_pages::render_show(
                snippet,
                FormState {
                    values: None,
                    errors: Some(&errors),
                },
            )
        })
        .await,
    }
}

/// Response for a failed edit or delete.
///
/// A missing snippet gets the 404 page. Anything else re-renders the page the
/// form lives on with the errors.
async fn action_failed<F>(state: &AppState, id: i64, errors: &FormErrors, render: F) -> Response
where
    F: FnOnce(&Snippet) -> maud::Markup,
{
    if errors.kind() == FailureKind::NotFound {
        let message = errors
            .form_errors()
            .first()
            .map_or("Snippet not found", String::as_str);
        return not_found_page(message);
    }

    match load_snippet(state, id).await {
        Ok(snippet) => (failure_status(errors), Html(render(&snippet).into_string())).into_response(),
        Err(response) => response,
    }
}

async fn health() -> &'static str {
    "OK"
}

/// Fallback for unknown snippet paths.
pub async fn not_found() -> Response {
    not_found_page("The page you are looking for does not exist.")
}

fn not_found_page(message: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(snippet_pages::render_not_found(message).into_string()),
    )
        .into_response()
}
