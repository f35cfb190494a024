//! Sign-in and sign-out routes.
//!
//! The identity provider runs as an authenticating reverse proxy in front of
//! the forum and hands the principal over in `X-Forwarded-*` headers. Sign-in
//! turns those headers into a local session; nothing else reads them.

use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::post;
use axum::Router;
use tracing::{error, info, warn};

use super::AppState;
use crate::auth::{
    clear_session_cookie, generate_session_token, hash_session_token, session_cookie,
    session_expiry, token_from_cookie_header,
};
use crate::db::{self as queries, NewUser};
use crate::paths;

const USER_HEADER: &str = "x-forwarded-user";
const EMAIL_HEADER: &str = "x-forwarded-email";
const NAME_HEADER: &str = "x-forwarded-preferred-username";
const AVATAR_HEADER: &str = "x-forwarded-avatar";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/signin", post(signin))
        .route("/auth/signout", post(signout))
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// The principal asserted by the proxy, if any.
fn principal_from_headers(headers: &HeaderMap) -> Option<NewUser> {
    let id = header_value(headers, USER_HEADER)?;
    Some(NewUser {
        name: header_value(headers, NAME_HEADER).or_else(|| Some(id.clone())),
        email: header_value(headers, EMAIL_HEADER),
        image: header_value(headers, AVATAR_HEADER),
        id,
    })
}

/// POST /auth/signin - Start a session for the proxy-asserted user.
async fn signin(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if !state.config.auth_proxy_enabled {
        return StatusCode::NOT_FOUND.into_response();
    }

    let Some(user) = principal_from_headers(&headers) else {
        warn!("Sign-in attempted without identity headers");
        return (StatusCode::UNAUTHORIZED, "No identity provided").into_response();
    };

    if let Err(e) = queries::upsert_user(state.db.pool(), &user).await {
        error!(user_id = %user.id, "Failed to store user: {e:#}");
        return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to sign in").into_response();
    }

    let token = generate_session_token();
    let expires_at = session_expiry(state.config.session_ttl);
    if let Err(e) = queries::create_session(
        state.db.pool(),
        &user.id,
        &hash_session_token(&token),
        &expires_at,
    )
    .await
    {
        error!(user_id = %user.id, "Failed to create session: {e:#}");
        return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to sign in").into_response();
    }

    info!(user_id = %user.id, "User signed in");

    let cookie = session_cookie(
        &token,
        state.config.session_ttl.as_secs(),
        state.config.cookie_secure,
    );
    with_cookie(Redirect::to(&paths::home()).into_response(), &cookie)
}

/// POST /auth/signout - End the current session.
async fn signout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let token = headers
        .get(header::COOKIE)
        .and_then(|h| h.to_str().ok())
        .and_then(token_from_cookie_header);

    if let Some(token) = token {
        if let Err(e) = queries::delete_session(state.db.pool(), &hash_session_token(token)).await
        {
            error!("Failed to delete session: {e:#}");
        } else {
            info!("User signed out");
        }
    }

    let cookie = clear_session_cookie(state.config.cookie_secure);
    with_cookie(Redirect::to(&paths::home()).into_response(), &cookie)
}

fn with_cookie(mut response: Response, cookie: &str) -> Response {
    match HeaderValue::from_str(cookie) {
        Ok(value) => {
            response.headers_mut().insert(header::SET_COOKIE, value);
        }
        Err(e) => error!("Invalid session cookie header: {e}"),
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_principal_from_headers() {
        let mut headers = HeaderMap::new();
        assert!(principal_from_headers(&headers).is_none());

        headers.insert(USER_HEADER, HeaderValue::from_static("u-123"));
        let user = principal_from_headers(&headers).unwrap();
        assert_eq!(user.id, "u-123");
        assert_eq!(user.name.as_deref(), Some("u-123"));
        assert!(user.email.is_none());

        headers.insert(NAME_HEADER, HeaderValue::from_static("ada"));
        headers.insert(EMAIL_HEADER, HeaderValue::from_static("ada@example.com"));
        let user = principal_from_headers(&headers).unwrap();
        assert_eq!(user.name.as_deref(), Some("ada"));
        assert_eq!(user.email.as_deref(), Some("ada@example.com"));
    }

    #[test]
    fn test_blank_user_header_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_HEADER, HeaderValue::from_static("  "));
        assert!(principal_from_headers(&headers).is_none());
    }
}
