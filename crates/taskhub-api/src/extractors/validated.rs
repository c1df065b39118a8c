//! JSON bodies and query strings checked with `validator`.

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

use taskhub_core::error::AppError;

use crate::error::ApiError;

/// Run `validator` rules, mapping failures to a validation error.
pub fn validated<T: Validate>(value: T) -> Result<T, AppError> {
    value
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    Ok(value)
}

/// `Json<T>` that also runs `T`'s validation rules.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                AppError::validation(format!("Invalid request body: {}", rejection.body_text()))
            })?;
        Ok(Self(validated(value)?))
    }
}
