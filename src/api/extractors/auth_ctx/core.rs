use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::auth::Caller;

/// Extractor for the caller verified by `middleware::auth::access`.
///
/// Missing context means the route was mounted without the middleware;
/// answer 401 rather than serve an unauthenticated request.
#[derive(Debug, Clone)]
pub struct AuthCtx(pub Caller);

impl<S> FromRequestParts<S> for AuthCtx
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Caller>()
            .cloned()
            .map(AuthCtx)
            .ok_or(AppError::Unauthorized)
    }
}
