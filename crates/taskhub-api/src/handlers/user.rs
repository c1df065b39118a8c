//! User management handlers.

use axum::Json;
use axum::extract::{Path, State};

use taskhub_core::types::PageResponse;
use taskhub_entity::user::{User, UserFilter};
use taskhub_service::UserSummary;

use crate::dto::request::{CreateUserRequest, UpdateUserRequest};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::{PaginationParams, QueryParams, ValidatedJson, parse_id, validated};
use crate::state::AppState;

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let user = state.user_service.create(req.into()).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    QueryParams(page): QueryParams<PaginationParams>,
    QueryParams(filter): QueryParams<UserFilter>,
) -> Result<Json<ApiResponse<PageResponse<User>>>, ApiError> {
    let page = validated(page)?.into_page_request();
    let users = state.user_service.list(&filter, page).await?;
    Ok(Json(ApiResponse::ok(users)))
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let user = state.user_service.get(parse_id(&id)?).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// PUT /api/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let user = state
        .user_service
        .update(parse_id(&id)?, req.into())
        .await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// DELETE /api/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.user_service.delete(parse_id(&id)?).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "User deleted successfully",
    ))))
}

/// GET /api/users/stats/summary
pub async fn user_stats(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<UserSummary>>, ApiError> {
    let summary = state.stats.user_summary().await?;
    Ok(Json(ApiResponse::ok(summary)))
}
