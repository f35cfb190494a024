//! HTTP layer: two axum routers sharing one database.
//!
//! The forum and the snippet manager both use `/` as their home page, so each
//! runs on its own port with its own [`PageCache`].

mod auth;
pub mod forum;
pub mod page_cache;
pub mod pages;
pub mod snippets;

pub use page_cache::{PageCache, ViewCache};

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::FromRef;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Router;
use sqlx::SqlitePool;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::db::Database;
use crate::forms::{FailureKind, FormErrors};

/// Shared state of one application.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<Config>,
    pub cache: Arc<PageCache>,
}

impl AppState {
    /// State with a fresh page cache configured from `config`.
    #[must_use]
    pub fn new(db: Database, config: Arc<Config>) -> Self {
        let cache = Arc::new(PageCache::new(config.page_cache_ttl));
        Self { db, config, cache }
    }
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.db.pool().clone()
    }
}

/// Build the forum application.
pub fn forum_app(state: AppState) -> Router {
    Router::new()
        .merge(forum::router())
        .merge(auth::router())
        .fallback(forum::not_found)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Build the snippets application.
pub fn snippets_app(state: AppState) -> Router {
    Router::new()
        .merge(snippets::router())
        .fallback(snippets::not_found)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve both applications until `shutdown` completes.
///
/// # Errors
///
/// Returns an error if an address is invalid, a port cannot be bound, or
/// either server fails.
pub async fn serve<F>(config: Config, db: Database, shutdown: F) -> Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let forum_addr: SocketAddr = format!("{}:{}", config.web_host, config.forum_port)
        .parse()
        .context("Invalid forum address")?;
    let snippets_addr: SocketAddr = format!("{}:{}", config.web_host, config.snippets_port)
        .parse()
        .context("Invalid snippets address")?;

    let config = Arc::new(config);
    let forum = forum_app(AppState::new(db.clone(), Arc::clone(&config)));
    let snippets = snippets_app(AppState::new(db, config));

    let forum_listener = tokio::net::TcpListener::bind(forum_addr)
        .await
        .context("Failed to bind forum server")?;
    let snippets_listener = tokio::net::TcpListener::bind(snippets_addr)
        .await
        .context("Failed to bind snippets server")?;

    info!(addr = %forum_addr, "Starting forum web server");
    info!(addr = %snippets_addr, "Starting snippets web server");

    // One signal stops both servers.
    let (stop_tx, stop_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move {
        shutdown.await;
        let _ = stop_tx.send(true);
    });

    let forum_server = axum::serve(forum_listener, forum)
        .with_graceful_shutdown(wait_for_stop(stop_rx.clone()));
    let snippets_server =
        axum::serve(snippets_listener, snippets).with_graceful_shutdown(wait_for_stop(stop_rx));

    tokio::try_join!(
        async { forum_server.await.context("Forum server error") },
        async { snippets_server.await.context("Snippets server error") },
    )?;

    Ok(())
}

async fn wait_for_stop(mut rx: tokio::sync::watch::Receiver<bool>) {
    while !*rx.borrow() {
        if rx.changed().await.is_err() {
            return;
        }
    }
}

/// HTTP status for a failed action.
#[must_use]
pub fn failure_status(errors: &FormErrors) -> StatusCode {
    match errors.kind() {
        FailureKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
        FailureKind::Unauthenticated => StatusCode::UNAUTHORIZED,
        FailureKind::NotFound => StatusCode::NOT_FOUND,
        FailureKind::Conflict => StatusCode::CONFLICT,
        FailureKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Serve a listing page from `cache` when possible, rendering and storing it
/// otherwise. Only anonymous requests use the cache.
pub async fn cached_page<F, Fut>(cache: &PageCache, path: &str, anonymous: bool, render: F) -> Response
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<String, Response>>,
{
    if anonymous {
        if let Some(html) = cache.get(path) {
            tracing::debug!(path, "Page cache hit");
            return Html(html).into_response();
        }
    }

    match render().await {
        Ok(html) => {
            if anonymous {
                cache.insert(path, html.clone());
            }
            Html(html).into_response()
        }
        Err(response) => response,
    }
}

/// Plain 500 response after a failed read.
pub(crate) fn internal_error(context: &str, error: &anyhow::Error) -> Response {
    tracing::error!("{context}: {error:#}");
    (StatusCode::INTERNAL_SERVER_ERROR, "Database error").into_response()
}
