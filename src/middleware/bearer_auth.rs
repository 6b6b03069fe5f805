/*
 * Responsibility
 * - pull the bearer credential out of the Authorization header (extract only, no verification)
 * - scheme match is case-insensitive; surrounding whitespace is tolerated
 */
use axum::http::{HeaderMap, header};

pub const BEARER_SCHEME: &str = "Bearer";

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;

    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
