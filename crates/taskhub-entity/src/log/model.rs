//! Task log entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskhub_core::types::TaskLogId;

/// Well-known log levels. The column itself accepts any string.
pub mod level {
    /// Informational entry.
    pub const INFO: &str = "info";
    /// Warning entry.
    pub const WARNING: &str = "warning";
    /// Error entry.
    pub const ERROR: &str = "error";
}

/// Sentinel `task_id` for log entries written by report generation.
pub const REPORT_GENERATION_TASK_ID: &str = "report_generation";

/// An immutable execution event attached to a task.
///
/// `task_id` is a soft reference: it is not enforced against the task
/// table and may hold a sentinel such as [`REPORT_GENERATION_TASK_ID`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct TaskLog {
    /// Unique log identifier.
    pub id: TaskLogId,
    /// Referenced task id.
    pub task_id: String,
    /// Log message.
    pub message: String,
    /// Log level.
    pub level: String,
    /// When the entry was written.
    pub timestamp: DateTime<Utc>,
}

impl TaskLog {
    /// Build a new entry stamped with the current time.
    pub fn new(
        task_id: impl Into<String>,
        message: impl Into<String>,
        level: impl Into<String>,
    ) -> Self {
        Self {
            id: TaskLogId::new(),
            task_id: task_id.into(),
            message: message.into(),
            level: level.into(),
            timestamp: Utc::now(),
        }
    }

    /// Whether the entry was written at error level.
    pub fn is_error(&self) -> bool {
        self.level == level::ERROR
    }
}
