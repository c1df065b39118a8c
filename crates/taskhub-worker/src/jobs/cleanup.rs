//! Age-based cleanup of completed tasks.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::Value;

use taskhub_core::error::AppError;
use taskhub_core::result::AppResult;
use taskhub_database::{TaskLogStore, TaskStore};
use taskhub_entity::job::{Job, JobPayload, job_types};

use crate::executor::{JobExecutionError, JobHandler};

/// Largest accepted `days_old`, roughly a century.
pub const MAX_DAYS_OLD: i64 = 36_500;

/// Handles `cleanup_old_tasks` jobs
#[derive(Debug)]
pub struct CleanupJobHandler {
    tasks: Arc<dyn TaskStore>,
    logs: Arc<dyn TaskLogStore>,
}

impl CleanupJobHandler {
    /// Create a new cleanup job handler
    pub fn new(tasks: Arc<dyn TaskStore>, logs: Arc<dyn TaskLogStore>) -> Self {
        Self { tasks, logs }
    }

    /// Delete completed tasks whose `completed_at` is more than `days_old`
    /// days in the past, logs first. Not transactional: an interruption
    /// between the two deletes leaves the task without logs.
    pub async fn cleanup_old_tasks(&self, days_old: i64) -> AppResult<String> {
        if days_old < 1 {
            return Err(AppError::validation("days_old must be at least 1"));
        }
        let cutoff = Duration::try_days(days_old)
            .and_then(|age| Utc::now().checked_sub_signed(age))
            .ok_or_else(|| {
                AppError::validation(format!("days_old {days_old} is out of range"))
            })?;
        tracing::info!(days_old, cutoff = %cutoff, "Running old task cleanup");

        let old_tasks = self.tasks.find_completed_before(cutoff).await?;

        let mut deleted = 0u64;
        for task in &old_tasks {
            let logs_removed = self.logs.delete_by_task(&task.id.to_string()).await?;
            if self.tasks.delete(task.id).await? {
                deleted += 1;
            }
            tracing::debug!(task_id = %task.id, logs_removed, "Removed old task");
        }

        tracing::info!("Cleaned up {} old tasks", deleted);
        Ok(format!("Cleaned up {deleted} old tasks"))
    }
}

#[async_trait]
impl JobHandler for CleanupJobHandler {
    fn job_type(&self) -> &str {
        job_types::CLEANUP_OLD_TASKS
    }

    async fn execute(&self, job: &Job) -> Result<Option<Value>, JobExecutionError> {
        let days_old = match job.typed_payload() {
            Ok(JobPayload::CleanupOldTasks { days_old }) => days_old,
            Ok(_) | Err(_) => {
                return Err(JobExecutionError::Permanent(format!(
                    "Invalid payload for job type '{}'",
                    job.job_type
                )));
            }
        };

        let message = self.cleanup_old_tasks(days_old).await.map_err(|e| {
            tracing::error!(error = %e, "Error cleaning up old tasks");
            JobExecutionError::from(e)
        })?;
        Ok(Some(Value::String(message)))
    }
}
