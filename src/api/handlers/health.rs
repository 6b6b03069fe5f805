/*
 * Responsibility
 * - GET / (liveness marker, no credential required)
 */
use axum::{http::StatusCode, response::IntoResponse};

pub const HEALTH_MARKER: &str = "posts-manager is up";

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, HEALTH_MARKER)
}
