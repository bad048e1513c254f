//! Opaque admin-session cookie helpers. The session is cookie-only with a
//! sliding expiry: every successful check re-issues the cookie for another
//! full window, and logout overwrites it with an immediately-expired one.
//! No server-side session table exists.

use axum::http::{header, HeaderMap};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "admin_session";
pub const SESSION_MAX_AGE_SECONDS: u64 = 30 * 60;

/// Mint a fresh opaque session token.
pub fn issue_token() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Build the `Set-Cookie` value carrying a live session token.
pub fn session_cookie(token: &str, secure: bool) -> String {
    let mut cookie = format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={SESSION_MAX_AGE_SECONDS}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Build the `Set-Cookie` value that removes the session cookie.
pub fn expired_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Extract the session token from the request's `Cookie` header, if any.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == SESSION_COOKIE && !value.is_empty() {
            Some(value.to_string())
        } else {
            None
        }
    })
}
