//! Application builder: wires state, router, and middleware into an Axum
//! app, and runs the server together with the background worker.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Router;
use axum::middleware as axum_middleware;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;

use taskhub_core::config::AppConfig;
use taskhub_core::error::AppError;
use taskhub_database::Database;
use taskhub_service::{StatsAggregator, TaskService, UserService};
use taskhub_worker::WorkerRuntime;

use crate::middleware::cors::build_cors_layer;
use crate::middleware::logging::request_logging;
use crate::router::build_router;
use crate::state::AppState;

/// Builds handler state from the store bundle and the worker runtime.
pub fn build_state(config: AppConfig, db: Database, runtime: &WorkerRuntime) -> AppState {
    AppState {
        task_service: Arc::new(TaskService::new(db.tasks.clone(), db.logs.clone())),
        user_service: Arc::new(UserService::new(db.users.clone())),
        stats: Arc::new(StatsAggregator::new(db.tasks.clone(), db.users.clone())),
        dispatcher: runtime.dispatcher().clone(),
        config: Arc::new(config),
        db,
        started_at: Instant::now(),
    }
}

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);
    build_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(request_logging))
}

/// Runs the TaskHub server until Ctrl+C.
///
/// When `worker.enabled`, a worker runner polls for jobs in the same
/// process and, when `worker.schedule.enabled`, the maintenance cron
/// schedules are started too.
pub async fn run_server(config: AppConfig, db: Database) -> Result<(), AppError> {
    tracing::info!(provider = db.provider(), "Starting TaskHub server");

    let runtime = WorkerRuntime::new(&db, &config.worker);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let worker_handle = if config.worker.enabled {
        let worker_id = format!("worker-{}", &uuid::Uuid::new_v4().to_string()[..8]);
        let runner = runtime.runner(worker_id);
        Some(tokio::spawn(async move {
            runner.run(shutdown_rx).await;
        }))
    } else {
        tracing::info!("Worker disabled; jobs will wait for an external worker");
        None
    };

    let scheduler = if config.worker.schedule.enabled {
        let scheduler = runtime.scheduler().await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        None
    };

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let app = build_app(build_state(config, db.clone(), &runtime));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("TaskHub server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = shutdown_tx.send(true);
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    if let Some(scheduler) = scheduler {
        if let Err(e) = scheduler.shutdown().await {
            tracing::warn!(error = %e, "Scheduler shutdown failed");
        }
    }

    if let Some(handle) = worker_handle {
        if tokio::time::timeout(grace, handle).await.is_err() {
            tracing::warn!("Worker did not stop within the shutdown grace period");
        }
    }

    db.close().await;
    tracing::info!("TaskHub server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
