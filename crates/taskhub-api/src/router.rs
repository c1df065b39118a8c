//! Route definitions for the TaskHub HTTP API.
//!
//! All routes are organized by resource and mounted under `/api`.

use axum::Router;
use axum::routing::{get, post};

use crate::handlers;
use crate::state::AppState;

/// Build the API router. Middleware is applied by [`crate::app::build_app`].
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(task_routes())
        .merge(job_routes())
        .merge(user_routes())
        .merge(health_routes());

    Router::new().nest("/api", api_routes).with_state(state)
}

/// Task CRUD, dispatch, polling, maintenance, stats
fn task_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/tasks",
            post(handlers::task::create_task).get(handlers::task::list_tasks),
        )
        .route("/tasks/stats/summary", get(handlers::task::task_stats))
        .route("/tasks/cleanup", post(handlers::task::cleanup_tasks))
        .route("/tasks/generate-report", post(handlers::task::generate_report))
        .route(
            "/tasks/{id}",
            get(handlers::task::get_task)
                .put(handlers::task::update_task)
                .delete(handlers::task::delete_task),
        )
        .route("/tasks/{id}/with-logs", get(handlers::task::get_task_with_logs))
        .route("/tasks/{id}/process", post(handlers::task::process_task))
        .route("/tasks/{id}/job-status", get(handlers::task::task_job_status))
}

/// Job polling
fn job_routes() -> Router<AppState> {
    Router::new().route("/jobs/{job_id}", get(handlers::job::get_job))
}

/// User CRUD and stats
fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users",
            post(handlers::user::create_user).get(handlers::user::list_users),
        )
        .route("/users/stats/summary", get(handlers::user::user_stats))
        .route(
            "/users/{id}",
            get(handlers::user::get_user)
                .put(handlers::user::update_user)
                .delete(handlers::user::delete_user),
        )
}

/// Health and info
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/info", get(handlers::health::info))
}
