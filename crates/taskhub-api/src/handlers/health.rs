//! Health and info handlers.

use axum::Json;
use axum::extract::State;
use chrono::Utc;
use serde_json::json;

use crate::dto::response::{ApiResponse, HealthResponse, InfoResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let status = match state.db.health_check().await {
        Ok(true) => "healthy",
        Ok(false) => "degraded",
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            "degraded"
        }
    };

    Json(ApiResponse::ok(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: state.db.provider().to_string(),
        timestamp: Utc::now(),
    }))
}

/// GET /api/info
pub async fn info(State(state): State<AppState>) -> Json<ApiResponse<InfoResponse>> {
    let features = [
        "Task management with status tracking",
        "Background job execution with a polling worker pool",
        "Task execution logs",
        "Scheduled cleanup and report generation",
        "User management",
        "Statistics",
    ];

    Json(ApiResponse::ok(InfoResponse {
        name: "TaskHub".to_string(),
        description: "Task management with asynchronous background processing".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        features: features.iter().map(|f| f.to_string()).collect(),
        endpoints: json!({
            "tasks": "/api/tasks",
            "jobs": "/api/jobs/{job_id}",
            "users": "/api/users",
            "health": "/api/health",
            "uptime_seconds": state.started_at.elapsed().as_secs(),
        }),
    }))
}
