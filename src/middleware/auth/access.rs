//! Bearer credential verification in front of the post store.
//!
//! Extracts `Authorization: Bearer <token>`, asks the configured
//! [`TokenVerifier`](crate::services::auth::TokenVerifier) for a decision and,
//! on success, stores the [`Caller`](crate::services::auth::Caller) in request
//! extensions for the `AuthCtx` extractor. A rejection answers 401 before any
//! handler (and therefore the store) runs.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::middleware::bearer_auth::bearer_token;
use crate::state::AppState;

/// Guard every route of `router` with bearer verification.
///
/// Uses `route_layer`, so requests that match none of these routes fall
/// through to the outer router's fallback instead of getting a 401.
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8's from_fn cannot take a State extractor; pass the state explicitly.
    router.route_layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = bearer_token(req.headers()) else {
        tracing::warn!(method = %req.method(), uri = %req.uri(), "missing bearer credential");
        return Err(AppError::Unauthorized);
    };

    let caller = match state.verifier.verify(token) {
        Ok(caller) => caller,
        Err(err) => {
            tracing::warn!(
                error = %err,
                method = %req.method(),
                uri = %req.uri(),
                "access token verification failed"
            );
            return Err(AppError::Unauthorized);
        }
    };

    // middleware -> extractor hand-off
    req.extensions_mut().insert(caller);

    Ok(next.run(req).await)
}
