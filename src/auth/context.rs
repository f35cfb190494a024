use anyhow::Result;
use sqlx::SqlitePool;
use tracing::debug;

use super::session::hash_session_token;
use crate::db::{self, now_timestamp};
use crate::forms::FormErrors;

/// The principal attached to a session, as issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
}

/// A resolved session. `user` is absent for sessions the identity provider
/// has not bound to a principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: Option<SessionUser>,
}

/// Request-scoped identity context handed to every action handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub session: Option<Session>,
}

impl RequestContext {
    /// A request without any session.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A request carrying a session for `user`.
    #[must_use]
    pub fn signed_in(user: SessionUser) -> Self {
        Self {
            session: Some(Session { user: Some(user) }),
        }
    }

    /// The signed-in user, if any.
    #[must_use]
    pub fn user(&self) -> Option<&SessionUser> {
        self.session.as_ref().and_then(|s| s.user.as_ref())
    }
}

/// Fail with a form-level error unless the request has a principal with an id.
///
/// # Errors
///
/// Returns an unauthenticated [`FormErrors`] carrying `message`.
pub fn require_principal<'a>(
    ctx: &'a RequestContext,
    message: &str,
) -> Result<&'a SessionUser, FormErrors> {
    match ctx.user() {
        Some(user) if !user.id.is_empty() => Ok(user),
        _ => Err(FormErrors::unauthenticated(message)),
    }
}

/// Resolve a session token to a request context.
///
/// Unknown tokens resolve to an anonymous context. Expired sessions are
/// deleted and also resolve to anonymous.
pub async fn resolve_session(pool: &SqlitePool, token: &str) -> Result<RequestContext> {
    let token_hash = hash_session_token(token);
    let Some(row) = db::get_session_with_user(pool, &token_hash).await? else {
        return Ok(RequestContext::anonymous());
    };

    if row.expires_at < now_timestamp() {
        debug!(session_id = row.session_id, "Session expired");
        db::delete_session(pool, &token_hash).await?;
        return Ok(RequestContext::anonymous());
    }

    Ok(RequestContext::signed_in(SessionUser {
        id: row.user_id,
        name: row.name,
        email: row.email,
        image: row.image,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::FailureKind;

    fn user(id: &str) -> SessionUser {
        SessionUser {
            id: id.to_string(),
            name: Some("Ada".to_string()),
            email: None,
            image: None,
        }
    }

    #[test]
    fn test_require_principal_anonymous() {
        let err = require_principal(&RequestContext::anonymous(), "log in").unwrap_err();
        assert_eq!(err.kind(), FailureKind::Unauthenticated);
        assert_eq!(err.form_errors(), ["log in"]);
    }

    #[test]
    fn test_require_principal_session_without_user() {
        let ctx = RequestContext {
            session: Some(Session { user: None }),
        };
        assert!(require_principal(&ctx, "log in").is_err());
    }

    #[test]
    fn test_require_principal_empty_id() {
        let ctx = RequestContext::signed_in(user(""));
        assert!(require_principal(&ctx, "log in").is_err());
    }

    #[test]
    fn test_require_principal_ok() {
        let ctx = RequestContext::signed_in(user("u1"));
        assert_eq!(require_principal(&ctx, "log in").unwrap().id, "u1");
    }
}
