//! PostgreSQL-backed stores.
//!
//! Queries are built at runtime with `sqlx::query_as`, so the crate builds
//! without a live database.

pub mod job;
pub mod log;
pub mod task;
pub mod user;

pub use job::PgJobStore;
pub use log::PgTaskLogStore;
pub use task::PgTaskStore;
pub use user::PgUserStore;

use taskhub_core::error::{AppError, ErrorKind};

/// Wrap a sqlx error as a database error with context.
pub(crate) fn db_err(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, context, e)
}

/// Clamp a row count from `COUNT(*)` into `u64`.
pub(crate) fn count_to_u64(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}
