use axum::extract::{FromRequest, Request};
use axum::response::{IntoResponse, Response};
use serde::{Serialize, de::DeserializeOwned};

use crate::error::AppError;

/// JSON body extractor whose every rejection is a 400 with the error envelope.
///
/// Plain `axum::Json` answers 415 / 422 for some malformed bodies.
pub struct Json<T>(pub T);

impl<T, S> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

impl<T> IntoResponse for Json<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}
