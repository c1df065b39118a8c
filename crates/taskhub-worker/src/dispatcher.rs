//! Submission-side entry points into the execution engine.
//!
//! The dispatcher never waits for a handler: it records the hand-off, writes
//! a job row, and returns. Callers learn the outcome by polling.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use taskhub_core::error::AppError;
use taskhub_core::result::AppResult;
use taskhub_core::types::{JobId, TaskId};
use taskhub_database::TaskStore;
use taskhub_entity::job::{Job, JobPayload, JobPriority, JobStatus};
use taskhub_entity::task::TaskStatus;

use crate::jobs::MAX_DAYS_OLD;
use crate::operations::OperationRegistry;
use crate::queue::{JobCreateParams, JobQueue};

/// Returned by [`JobDispatcher::dispatch`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchReceipt {
    /// Job that will run the task.
    pub job_id: JobId,
    /// Always `pending` at dispatch time.
    pub status: JobStatus,
    /// Always `None` at dispatch time.
    pub result: Option<String>,
}

/// Polling view of one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatusView {
    /// Job identifier.
    pub job_id: JobId,
    /// Current job status.
    pub status: JobStatus,
    /// Handler result, present once the job completed.
    pub result: Option<Value>,
    /// Failure message, present once the job failed.
    pub error: Option<String>,
}

impl From<&Job> for JobStatusView {
    fn from(job: &Job) -> Self {
        Self {
            job_id: job.id,
            status: job.status,
            result: match job.status {
                JobStatus::Completed => job.result.clone(),
                _ => None,
            },
            error: match job.status {
                JobStatus::Failed => job.error_message.clone(),
                _ => None,
            },
        }
    }
}

/// Hands tasks and maintenance work to the job queue
#[derive(Debug, Clone)]
pub struct JobDispatcher {
    tasks: Arc<dyn TaskStore>,
    queue: Arc<JobQueue>,
    registry: Arc<OperationRegistry>,
}

impl JobDispatcher {
    /// Create a new dispatcher
    pub fn new(
        tasks: Arc<dyn TaskStore>,
        queue: Arc<JobQueue>,
        registry: Arc<OperationRegistry>,
    ) -> Self {
        Self {
            tasks,
            queue,
            registry,
        }
    }

    /// Move a pending task to `processing` and enqueue its job.
    ///
    /// The status write is conditional on `pending`, so of two concurrent
    /// dispatches of one task at most one is accepted. If the enqueue fails
    /// afterwards the task stays `processing`.
    pub async fn dispatch(&self, task_id: TaskId, operation: &str) -> AppResult<DispatchReceipt> {
        let task = self.tasks.get(task_id).await?;
        if task.status != TaskStatus::Pending {
            return Err(AppError::conflict("Task is not in pending status"));
        }

        // Fails only in strict mode; lenient mode warns and falls back.
        self.registry.validate(operation)?;

        let job_id = JobId::new();
        if self.tasks.mark_processing(task_id, job_id).await?.is_none() {
            return Err(AppError::conflict("Task is not in pending status"));
        }

        let payload = JobPayload::ProcessTask {
            task_id,
            operation: operation.to_string(),
        };
        let params = JobCreateParams::with_id(job_id, payload, JobPriority::from(task.priority));
        let job = self.queue.enqueue(params).await.map_err(|e| {
            tracing::error!(
                task_id = %task_id,
                job_id = %job_id,
                error = %e,
                "Task marked processing but its job could not be enqueued"
            );
            e
        })?;

        tracing::info!(task_id = %task_id, job_id = %job.id, operation, "Task dispatched");

        Ok(DispatchReceipt {
            job_id: job.id,
            status: job.status,
            result: None,
        })
    }

    /// Current state of a job.
    pub async fn query_status(&self, job_id: JobId) -> AppResult<JobStatusView> {
        let job = self
            .queue
            .find(job_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Job {job_id} not found")))?;
        Ok(JobStatusView::from(&job))
    }

    /// Current state of the job a task was dispatched with.
    pub async fn query_task_status(&self, task_id: TaskId) -> AppResult<JobStatusView> {
        let task = self.tasks.get(task_id).await?;
        let job_id = task
            .job_id
            .ok_or_else(|| AppError::validation("Task has no associated job"))?;
        self.query_status(job_id).await
    }

    /// Enqueue a cleanup of tasks completed more than `days_old` days ago.
    pub async fn schedule_cleanup(&self, days_old: i64) -> AppResult<Job> {
        if !(1..=MAX_DAYS_OLD).contains(&days_old) {
            return Err(AppError::validation(format!(
                "days_old must be between 1 and {MAX_DAYS_OLD}"
            )));
        }
        let job = self
            .queue
            .enqueue(JobCreateParams::new(
                JobPayload::CleanupOldTasks { days_old },
                JobPriority::Low,
            ))
            .await?;
        tracing::info!(job_id = %job.id, days_old, "Cleanup scheduled");
        Ok(job)
    }

    /// Enqueue report generation.
    pub async fn schedule_report(&self, report_type: &str) -> AppResult<Job> {
        let job = self
            .queue
            .enqueue(JobCreateParams::new(
                JobPayload::GenerateReport {
                    report_type: report_type.to_string(),
                },
                JobPriority::Normal,
            ))
            .await?;
        tracing::info!(job_id = %job.id, report_type, "Report generation scheduled");
        Ok(job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskhub_core::error::ErrorKind;
    use taskhub_database::JobStore;
    use taskhub_database::memory::{MemoryJobStore, MemoryTaskStore};
    use taskhub_entity::job::{job_types, queues};
    use taskhub_entity::task::{CreateTask, TaskPriority};

    struct Fixture {
        tasks: Arc<MemoryTaskStore>,
        jobs: Arc<MemoryJobStore>,
        dispatcher: JobDispatcher,
    }

    fn fixture(strict: bool) -> Fixture {
        let tasks = Arc::new(MemoryTaskStore::new());
        let jobs = Arc::new(MemoryJobStore::new());
        let queue = Arc::new(JobQueue::new(jobs.clone(), "worker-test"));
        let dispatcher = JobDispatcher::new(
            tasks.clone(),
            queue,
            Arc::new(OperationRegistry::with_builtin(strict)),
        );
        Fixture {
            tasks,
            jobs,
            dispatcher,
        }
    }

    async fn pending(fx: &Fixture, priority: TaskPriority) -> TaskId {
        fx.tasks
            .create(CreateTask {
                title: "T1".to_string(),
                description: None,
                priority,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_dispatch_marks_processing_and_enqueues() {
        let fx = fixture(false);
        let task_id = pending(&fx, TaskPriority::High).await;

        let receipt = fx.dispatcher.dispatch(task_id, "default").await.unwrap();
        assert_eq!(receipt.status, JobStatus::Pending);
        assert!(receipt.result.is_none());

        let task = fx.tasks.get(task_id).await.unwrap();
        assert_eq!(task.status, TaskStatus::Processing);
        assert_eq!(task.job_id, Some(receipt.job_id));

        let job = fx.jobs.find_by_id(receipt.job_id).await.unwrap().unwrap();
        assert_eq!(job.job_type, job_types::PROCESS_TASK);
        assert_eq!(job.queue, queues::TASKS);
        assert_eq!(job.priority, JobPriority::High);
    }

    #[tokio::test]
    async fn test_second_dispatch_conflicts() {
        let fx = fixture(false);
        let task_id = pending(&fx, TaskPriority::Medium).await;

        let first = fx.dispatcher.dispatch(task_id, "default").await.unwrap();
        let err = fx.dispatcher.dispatch(task_id, "default").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);

        let task = fx.tasks.get(task_id).await.unwrap();
        assert_eq!(task.job_id, Some(first.job_id));
        assert_eq!(fx.jobs.count_by_status(JobStatus::Pending).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_dispatch_accepts_one() {
        let fx = fixture(false);
        let task_id = pending(&fx, TaskPriority::Medium).await;

        let (a, b) = tokio::join!(
            fx.dispatcher.dispatch(task_id, "default"),
            fx.dispatcher.dispatch(task_id, "email_sending"),
        );
        assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);
        assert_eq!(fx.jobs.count_by_status(JobStatus::Pending).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_dispatch_missing_task() {
        let fx = fixture(false);
        let err = fx.dispatcher.dispatch(TaskId::new(), "default").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_strict_mode_rejects_unknown_operation() {
        let fx = fixture(true);
        let task_id = pending(&fx, TaskPriority::Low).await;

        let err = fx.dispatcher.dispatch(task_id, "teleport").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(fx.tasks.get(task_id).await.unwrap().status, TaskStatus::Pending);
    }

    #[tokio::test]
    async fn test_lenient_mode_accepts_unknown_operation() {
        let fx = fixture(false);
        let task_id = pending(&fx, TaskPriority::Low).await;
        assert!(fx.dispatcher.dispatch(task_id, "teleport").await.is_ok());
    }

    #[tokio::test]
    async fn test_query_status_views() {
        let fx = fixture(false);
        let task_id = pending(&fx, TaskPriority::Medium).await;

        let err = fx.dispatcher.query_task_status(task_id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let receipt = fx.dispatcher.dispatch(task_id, "default").await.unwrap();
        let view = fx.dispatcher.query_task_status(task_id).await.unwrap();
        assert_eq!(view.job_id, receipt.job_id);
        assert_eq!(view.status, JobStatus::Pending);
        assert!(view.result.is_none());

        fx.jobs
            .mark_failed(receipt.job_id, "boom")
            .await
            .unwrap();
        let view = fx.dispatcher.query_status(receipt.job_id).await.unwrap();
        assert_eq!(view.status, JobStatus::Failed);
        assert_eq!(view.error.as_deref(), Some("boom"));
        assert!(view.result.is_none());

        let err = fx.dispatcher.query_status(JobId::new()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_schedule_maintenance_jobs() {
        let fx = fixture(false);

        let cleanup = fx.dispatcher.schedule_cleanup(30).await.unwrap();
        assert_eq!(cleanup.job_type, job_types::CLEANUP_OLD_TASKS);
        assert_eq!(cleanup.queue, queues::MAINTENANCE);

        let report = fx.dispatcher.schedule_report("weekly").await.unwrap();
        assert_eq!(report.job_type, job_types::GENERATE_REPORT);

        let err = fx
            .dispatcher
            .schedule_cleanup(1_000_000_000)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let err = fx.dispatcher.schedule_cleanup(0).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}
