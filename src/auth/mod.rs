//! Identity handling.
//!
//! Authentication itself is done by an external identity provider sitting in
//! front of the forum. This module only turns its result into sessions and
//! resolves those sessions back into a [`RequestContext`] per request.

pub mod context;
pub mod middleware;
pub mod session;

pub use context::{require_principal, resolve_session, RequestContext, Session, SessionUser};
pub use middleware::CurrentSession;
pub use session::{
    clear_session_cookie, generate_session_token, hash_session_token, session_cookie,
    session_expiry, token_from_cookie_header, SESSION_COOKIE,
};
