//! Refresh-credential cookie side channel.
//!
//! The rotating refresh credential travels in a `refreshToken` cookie
//! (`Path=/`, `SameSite=Lax`) rather than in response bodies. These helpers
//! build the `Set-Cookie` values and read the credential back from request
//! headers.

use axum::http::{header, HeaderMap};

/// Cookie name carrying the refresh credential.
pub const REFRESH_COOKIE: &str = "refreshToken";

/// Build a `Set-Cookie` value installing a refresh credential.
pub fn refresh_cookie(token: &str, ttl_days: i64) -> String {
    format!(
        "{}={}; Max-Age={}; Path=/; SameSite=Lax",
        REFRESH_COOKIE,
        token,
        ttl_days * 86_400
    )
}

/// Build a `Set-Cookie` value clearing the refresh credential.
pub fn clear_refresh_cookie() -> String {
    format!("{}=; Max-Age=0; Path=/; SameSite=Lax", REFRESH_COOKIE)
}

/// Read the refresh credential from a request's `Cookie` header, if present.
pub fn refresh_token_from_headers(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == REFRESH_COOKIE && !value.is_empty()).then(|| value.to_string())
    })
}
