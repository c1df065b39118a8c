//! Job polling handler.

use axum::Json;
use axum::extract::{Path, State};

use taskhub_worker::JobStatusView;

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::parse_id;
use crate::state::AppState;

/// GET /api/jobs/{job_id}
pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<ApiResponse<JobStatusView>>, ApiError> {
    let view = state.dispatcher.query_status(parse_id(&job_id)?).await?;
    Ok(Json(ApiResponse::ok(view)))
}
