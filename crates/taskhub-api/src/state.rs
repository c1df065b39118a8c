//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use taskhub_core::config::AppConfig;
use taskhub_database::Database;
use taskhub_service::{StatsAggregator, TaskService, UserService};
use taskhub_worker::JobDispatcher;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are cheap to clone across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Store bundle
    pub db: Database,
    /// Task CRUD
    pub task_service: Arc<TaskService>,
    /// User CRUD
    pub user_service: Arc<UserService>,
    /// Read-only counts
    pub stats: Arc<StatsAggregator>,
    /// Hands tasks and maintenance work to the worker
    pub dispatcher: JobDispatcher,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}
