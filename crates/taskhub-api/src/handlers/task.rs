//! Task handlers: CRUD, dispatch, polling, and maintenance triggers.

use axum::Json;
use axum::extract::{Path, State};

use taskhub_core::types::{PageResponse, TaskId};
use taskhub_entity::task::{Task, TaskFilter};
use taskhub_service::{TaskSummary, TaskWithLogs};
use taskhub_worker::jobs::report::capitalize;
use taskhub_worker::{DispatchReceipt, JobStatusView};

use crate::dto::request::{
    CleanupParams, CreateTaskRequest, ProcessParams, ReportParams, UpdateTaskRequest,
};
use crate::dto::response::{ApiResponse, MessageResponse, ScheduledJobResponse};
use crate::error::ApiError;
use crate::extractors::{PaginationParams, QueryParams, ValidatedJson, parse_id, validated};
use crate::state::AppState;

/// POST /api/tasks
pub async fn create_task(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateTaskRequest>,
) -> Result<Json<ApiResponse<Task>>, ApiError> {
    let task = state.task_service.create(req.into()).await?;
    Ok(Json(ApiResponse::ok(task)))
}

/// GET /api/tasks
pub async fn list_tasks(
    State(state): State<AppState>,
    QueryParams(page): QueryParams<PaginationParams>,
    QueryParams(filter): QueryParams<TaskFilter>,
) -> Result<Json<ApiResponse<PageResponse<Task>>>, ApiError> {
    let page = validated(page)?.into_page_request();
    let tasks = state.task_service.list(&filter, page).await?;
    Ok(Json(ApiResponse::ok(tasks)))
}

/// GET /api/tasks/{id}
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Task>>, ApiError> {
    let task = state.task_service.get(parse_id(&id)?).await?;
    Ok(Json(ApiResponse::ok(task)))
}

/// GET /api/tasks/{id}/with-logs
pub async fn get_task_with_logs(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<TaskWithLogs>>, ApiError> {
    let task = state.task_service.get_with_logs(parse_id(&id)?).await?;
    Ok(Json(ApiResponse::ok(task)))
}

/// PUT /api/tasks/{id}
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateTaskRequest>,
) -> Result<Json<ApiResponse<Task>>, ApiError> {
    let task = state
        .task_service
        .update(parse_id(&id)?, req.into())
        .await?;
    Ok(Json(ApiResponse::ok(task)))
}

/// DELETE /api/tasks/{id}
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.task_service.delete(parse_id(&id)?).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Task deleted successfully",
    ))))
}

/// POST /api/tasks/{id}/process
pub async fn process_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    QueryParams(params): QueryParams<ProcessParams>,
) -> Result<Json<ApiResponse<DispatchReceipt>>, ApiError> {
    let task_id: TaskId = parse_id(&id)?;
    let receipt = state
        .dispatcher
        .dispatch(task_id, &params.operation)
        .await?;
    Ok(Json(ApiResponse::ok(receipt)))
}

/// GET /api/tasks/{id}/job-status
pub async fn task_job_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<JobStatusView>>, ApiError> {
    let view = state.dispatcher.query_task_status(parse_id(&id)?).await?;
    Ok(Json(ApiResponse::ok(view)))
}

/// POST /api/tasks/cleanup
pub async fn cleanup_tasks(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<CleanupParams>,
) -> Result<Json<ApiResponse<ScheduledJobResponse>>, ApiError> {
    let params = validated(params)?;
    let job = state.dispatcher.schedule_cleanup(params.days_old).await?;
    Ok(Json(ApiResponse::ok(ScheduledJobResponse {
        message: "Cleanup task started".to_string(),
        job_id: job.id,
    })))
}

/// POST /api/tasks/generate-report
pub async fn generate_report(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ReportParams>,
) -> Result<Json<ApiResponse<ScheduledJobResponse>>, ApiError> {
    let params = validated(params)?;
    let job = state.dispatcher.schedule_report(&params.report_type).await?;
    Ok(Json(ApiResponse::ok(ScheduledJobResponse {
        message: format!("{} report generation started", capitalize(&params.report_type)),
        job_id: job.id,
    })))
}

/// GET /api/tasks/stats/summary
pub async fn task_stats(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<TaskSummary>>, ApiError> {
    let summary = state.stats.task_summary().await?;
    Ok(Json(ApiResponse::ok(summary)))
}
