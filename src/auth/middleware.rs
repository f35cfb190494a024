use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
    response::Response,
};
use sqlx::SqlitePool;

use super::context::{resolve_session, RequestContext};
use super::session::token_from_cookie_header;

/// Identity context of the current request.
///
/// Never rejects: a missing, unknown or expired session cookie yields an
/// anonymous context, and handlers decide whether that is acceptable.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub RequestContext);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
    SqlitePool: FromRef<S>,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let pool = SqlitePool::from_ref(state);

        let token = parts
            .headers
            .get(header::COOKIE)
            .and_then(|h| h.to_str().ok())
            .and_then(token_from_cookie_header);

        let Some(token) = token else {
            return Ok(Self(RequestContext::anonymous()));
        };

        match resolve_session(&pool, token).await {
            Ok(ctx) => Ok(Self(ctx)),
            Err(e) => {
                tracing::warn!("Failed to resolve session: {e:#}");
                Ok(Self(RequestContext::anonymous()))
            }
        }
    }
}
