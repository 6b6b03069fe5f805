/*
 * Responsibility
 * - public surface of the middleware layer
 */
pub mod auth;
pub mod bearer_auth;
pub mod cors;
pub mod http;
pub mod security_headers;
