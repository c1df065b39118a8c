//! Query strings with errors in the API envelope.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use taskhub_core::error::AppError;

use crate::error::ApiError;

/// `Query<T>` whose rejection is a JSON validation error instead of plain text.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryParams<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                AppError::validation(format!("Invalid query string: {}", rejection.body_text()))
            })?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};
    use axum::response::IntoResponse;
    use taskhub_entity::task::TaskFilter;

    async fn extract(uri: &str) -> Result<QueryParams<TaskFilter>, ApiError> {
        let (mut parts, _) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        QueryParams::<TaskFilter>::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_parses_known_values() {
        let QueryParams(filter) = extract("/api/tasks?status=pending").await.unwrap();
        assert!(filter.status.is_some());
        assert!(filter.priority.is_none());
    }

    #[tokio::test]
    async fn test_bad_value_is_validation_error() {
        let err = extract("/api/tasks?status=bogus").await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
