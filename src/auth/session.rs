use chrono::{Duration, SecondsFormat, Utc};
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use sha2::{Digest, Sha256};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session";

/// Generate a cryptographically secure random session token.
#[must_use]
pub fn generate_session_token() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

/// Hash a session token for storage. Only the hash is kept in the database.
#[must_use]
pub fn hash_session_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Expiry timestamp for a session created now.
#[must_use]
pub fn session_expiry(ttl: std::time::Duration) -> String {
    let ttl = Duration::from_std(ttl).unwrap_or_else(|_| Duration::days(30));
    (Utc::now() + ttl).to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Build the `Set-Cookie` value for a new session.
#[must_use]
pub fn session_cookie(token: &str, max_age_secs: u64, secure: bool) -> String {
    let secure = if secure { "; Secure" } else { "" };
    format!("{SESSION_COOKIE}={token}; HttpOnly{secure}; SameSite=Lax; Path=/; Max-Age={max_age_secs}")
}

/// Build the `Set-Cookie` value that clears the session.
#[must_use]
pub fn clear_session_cookie(secure: bool) -> String {
    session_cookie("", 0, secure)
}

/// Pull the session token out of a `Cookie` header value.
#[must_use]
pub fn token_from_cookie_header(cookies: &str) -> Option<&str> {
    cookies
        .split(';')
        .find_map(|cookie| {
            cookie
                .trim()
                .strip_prefix(SESSION_COOKIE)
                .and_then(|rest| rest.strip_prefix('='))
        })
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_session_token() {
        let token1 = generate_session_token();
        let token2 = generate_session_token();

        assert_eq!(token1.len(), 64);
        assert_ne!(token1, token2);
        assert!(token1.chars().all(|c| c.is_alphanumeric()));
    }

    #[test]
    fn test_hash_is_stable_hex() {
        let hash = hash_session_token("abc");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, hash_session_token("abc"));
        assert_ne!(hash, hash_session_token("abd"));
    }

    #[test]
    fn test_token_from_cookie_header() {
        assert_eq!(token_from_cookie_header("session=abc"), Some("abc"));
        assert_eq!(
            token_from_cookie_header("theme=dark; session=xyz; other=1"),
            Some("xyz")
        );
        assert_eq!(token_from_cookie_header("sessionid=nope"), None);
        assert_eq!(token_from_cookie_header("session="), None);
        assert_eq!(token_from_cookie_header("theme=dark"), None);
    }

    #[test]
    fn test_session_cookie() {
        let cookie = session_cookie("tok", 60, true);
        assert!(cookie.starts_with("session=tok; HttpOnly; Secure;"));
        assert!(cookie.ends_with("Max-Age=60"));

        let cleared = clear_session_cookie(false);
        assert!(!cleared.contains("Secure"));
        assert!(cleared.contains("Max-Age=0"));
    }

    #[test]
    fn test_session_expiry_in_future() {
        let expiry = session_expiry(std::time::Duration::from_secs(3600));
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        assert!(expiry > now);
    }
}
