//! Job queue facade over the job store.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use taskhub_core::error::AppError;
use taskhub_core::types::JobId;
use taskhub_database::JobStore;
use taskhub_entity::job::{CreateJob, Job, JobPayload, JobPriority, JobStatus};

/// Parameters for creating a new job
#[derive(Debug, Clone)]
pub struct JobCreateParams {
    /// Job id; callers that need it before enqueueing mint it themselves
    pub id: JobId,
    /// Typed payload, which also determines job type and queue
    pub payload: JobPayload,
    /// Priority level
    pub priority: JobPriority,
}

impl JobCreateParams {
    /// Parameters with a freshly minted id
    pub fn new(payload: JobPayload, priority: JobPriority) -> Self {
        Self::with_id(JobId::new(), payload, priority)
    }

    /// Parameters with a caller-chosen id
    pub fn with_id(id: JobId, payload: JobPayload, priority: JobPriority) -> Self {
        Self {
            id,
            payload,
            priority,
        }
    }
}

/// Job queue for enqueuing and claiming work
#[derive(Debug, Clone)]
pub struct JobQueue {
    jobs: Arc<dyn JobStore>,
    worker_id: String,
}

impl JobQueue {
    /// Create a queue that claims jobs as `worker_id`
    pub fn new(jobs: Arc<dyn JobStore>, worker_id: impl Into<String>) -> Self {
        Self {
            jobs,
            worker_id: worker_id.into(),
        }
    }

    /// Identifier recorded on claimed jobs
    pub fn worker_id(&self) -> &str {
        &self.worker_id
    }

    /// Enqueue a new job
    pub async fn enqueue(&self, params: JobCreateParams) -> Result<Job, AppError> {
        let data = CreateJob::from_payload(params.id, &params.payload, params.priority);
        let job = self.jobs.create(data).await?;

        tracing::debug!(
            job_id = %job.id,
            job_type = %job.job_type,
            queue = %job.queue,
            priority = %job.priority,
            "Enqueued job"
        );

        Ok(job)
    }

    /// Claim the next available job, trying `queues` in order
    pub async fn dequeue(&self, queues: &[&str]) -> Result<Option<Job>, AppError> {
        for queue in queues {
            if let Some(job) = self.jobs.claim_next(queue, &self.worker_id).await? {
                tracing::debug!(
                    job_id = %job.id,
                    job_type = %job.job_type,
                    queue = %job.queue,
                    "Dequeued job"
                );
                return Ok(Some(job));
            }
        }

        Ok(None)
    }

    /// Mark a job as completed successfully
    pub async fn complete(
        &self,
        job_id: JobId,
        result: Option<serde_json::Value>,
    ) -> Result<(), AppError> {
        self.jobs.mark_completed(job_id, result.as_ref()).await?;
        tracing::debug!(job_id = %job_id, "Job completed");
        Ok(())
    }

    /// Mark a job as failed
    pub async fn fail(&self, job_id: JobId, error: &str) -> Result<(), AppError> {
        self.jobs.mark_failed(job_id, error).await?;
        tracing::debug!(job_id = %job_id, error = %error, "Job failed");
        Ok(())
    }

    /// Look up a job
    pub async fn find(&self, job_id: JobId) -> Result<Option<Job>, AppError> {
        self.jobs.find_by_id(job_id).await
    }

    /// Get queue statistics
    pub async fn stats(&self) -> Result<QueueStats, AppError> {
        Ok(QueueStats {
            pending: self.jobs.count_by_status(JobStatus::Pending).await?,
            running: self.jobs.count_by_status(JobStatus::Running).await?,
            completed: self.jobs.count_by_status(JobStatus::Completed).await?,
            failed: self.jobs.count_by_status(JobStatus::Failed).await?,
            worker_id: self.worker_id.clone(),
        })
    }
}

/// Queue statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueStats {
    /// Number of pending jobs
    pub pending: u64,
    /// Number of running jobs
    pub running: u64,
    /// Number of completed jobs
    pub completed: u64,
    /// Number of failed jobs
    pub failed: u64,
    /// Identifier of the reporting queue handle
    pub worker_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskhub_database::memory::MemoryJobStore;
    use taskhub_entity::job::queues;

    #[tokio::test]
    async fn test_dequeue_walks_queues_in_order() {
        let queue = JobQueue::new(Arc::new(MemoryJobStore::new()), "w1");
        let cleanup = queue
            .enqueue(JobCreateParams::new(
                JobPayload::CleanupOldTasks { days_old: 30 },
                JobPriority::High,
            ))
            .await
            .unwrap();
        assert_eq!(cleanup.queue, queues::MAINTENANCE);

        let claimed = queue.dequeue(&queues::ALL).await.unwrap().unwrap();
        assert_eq!(claimed.id, cleanup.id);
        assert_eq!(claimed.worker_id.as_deref(), Some("w1"));
        assert!(queue.dequeue(&queues::ALL).await.unwrap().is_none());

        queue.complete(claimed.id, None).await.unwrap();
        let stats = queue.stats().await.unwrap();
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.pending, 0);
    }

    #[tokio::test]
    async fn test_enqueue_keeps_caller_id() {
        let queue = JobQueue::new(Arc::new(MemoryJobStore::new()), "w1");
        let id = JobId::new();
        let job = queue
            .enqueue(JobCreateParams::with_id(
                id,
                JobPayload::GenerateReport {
                    report_type: "weekly".to_string(),
                },
                JobPriority::Normal,
            ))
            .await
            .unwrap();
        assert_eq!(job.id, id);
        assert_eq!(queue.find(id).await.unwrap().unwrap().status, JobStatus::Pending);
    }
}
