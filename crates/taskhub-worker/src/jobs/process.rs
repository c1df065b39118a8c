//! Drives one dispatched task through its state machine.
//!
//! `pending -> processing -> completed | failed`. The handler re-reads the
//! task, runs the matching operation, writes logs throughout, and records
//! the terminal status before reporting the outcome to the runner.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use taskhub_core::types::{JobId, TaskId};
use taskhub_database::{TaskLogStore, TaskStore};
use taskhub_entity::job::{Job, JobPayload, job_types};
use taskhub_entity::log::level;
use taskhub_entity::task::TaskStatus;

use crate::executor::{JobExecutionError, JobHandler};
use crate::operations::{OperationContext, OperationError, OperationRegistry};
use crate::simulation::Simulation;

/// Handles `process_task` jobs.
#[derive(Debug)]
pub struct TaskProcessingHandler {
    tasks: Arc<dyn TaskStore>,
    logs: Arc<dyn TaskLogStore>,
    registry: Arc<OperationRegistry>,
    simulation: Simulation,
}

impl TaskProcessingHandler {
    /// Create a new task processing handler
    pub fn new(
        tasks: Arc<dyn TaskStore>,
        logs: Arc<dyn TaskLogStore>,
        registry: Arc<OperationRegistry>,
        simulation: Simulation,
    ) -> Self {
        Self {
            tasks,
            logs,
            registry,
            simulation,
        }
    }

    /// Run `task_id` with `operation` as job `job_id`.
    ///
    /// Returns the result summary on success. On failure the task is left
    /// `failed` with the error recorded, and the same message is returned
    /// as a permanent error.
    pub async fn process(
        &self,
        job_id: JobId,
        task_id: TaskId,
        operation: &str,
    ) -> Result<String, JobExecutionError> {
        let task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| JobExecutionError::Permanent(format!("Task {task_id} not found")))?;

        match task.status {
            TaskStatus::Completed | TaskStatus::Failed => {
                return Err(JobExecutionError::Permanent(format!(
                    "Task {task_id} is already {}",
                    task.status
                )));
            }
            TaskStatus::Pending => {
                // Enqueued without going through dispatch.
                if self.tasks.mark_processing(task_id, job_id).await?.is_none() {
                    return Err(JobExecutionError::Permanent(format!(
                        "Task {task_id} changed state before execution"
                    )));
                }
            }
            TaskStatus::Processing => {}
        }

        match self.run_operation(task_id, operation).await {
            Ok(summary) => {
                tracing::info!(task_id = %task_id, job_id = %job_id, "Task completed");
                Ok(summary)
            }
            Err(err) => {
                let message = err.to_string();
                tracing::error!(task_id = %task_id, job_id = %job_id, error = %message, "Error processing task");
                self.record_failure(task_id, &message).await;
                Err(JobExecutionError::Permanent(message))
            }
        }
    }

    /// Everything after the entry checks. Any error here, store errors
    /// included, ends with the task marked failed.
    async fn run_operation(&self, task_id: TaskId, operation: &str) -> Result<String, OperationError> {
        let task_key = task_id.to_string();
        self.logs
            .append(
                &task_key,
                &format!("Started processing task with operation: {operation}"),
                level::INFO,
            )
            .await?;

        let ctx = OperationContext {
            task_id,
            logs: Arc::clone(&self.logs),
            simulation: self.simulation,
        };
        let handler = self
            .registry
            .resolve(operation)
            .map_err(|e| OperationError::Failed(e.message))?;
        let summary = handler.run(&ctx).await?;

        // Must precede mark_completed: a completed task can no longer be failed.
        self.logs
            .append(
                &task_key,
                &format!("Task completed successfully with result: {summary}"),
                level::INFO,
            )
            .await?;
        if self.tasks.mark_completed(task_id, &summary).await?.is_none() {
            return Err(OperationError::Failed(format!(
                "Task {task_id} left processing during execution"
            )));
        }
        Ok(summary)
    }

    /// Best effort: the original error is what gets reported.
    async fn record_failure(&self, task_id: TaskId, message: &str) {
        match self.tasks.mark_failed(task_id, message).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                tracing::warn!(task_id = %task_id, "Task was no longer processing when marking it failed");
            }
            Err(e) => {
                tracing::error!(task_id = %task_id, error = %e, "Failed to mark task as failed");
            }
        }
        if let Err(e) = self
            .logs
            .append(
                &task_id.to_string(),
                &format!("Task failed with error: {message}"),
                level::ERROR,
            )
            .await
        {
            tracing::error!(task_id = %task_id, error = %e, "Failed to write failure log");
        }
    }
}

#[async_trait]
impl JobHandler for TaskProcessingHandler {
    fn job_type(&self) -> &str {
        job_types::PROCESS_TASK
    }

    async fn execute(&self, job: &Job) -> Result<Option<Value>, JobExecutionError> {
        let payload = job
            .typed_payload()
            .map_err(|e| JobExecutionError::Permanent(format!("Invalid job payload: {e}")))?;

        let JobPayload::ProcessTask { task_id, operation } = payload else {
            return Err(JobExecutionError::Permanent(format!(
                "Unexpected payload for job type '{}'",
                job.job_type
            )));
        };

        let summary = self.process(job.id, task_id, &operation).await?;
        Ok(Some(Value::String(summary)))
    }
}
