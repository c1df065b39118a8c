//! Cron scheduler for periodic maintenance jobs.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};

use taskhub_core::config::ScheduleConfig;
use taskhub_core::error::AppError;
use taskhub_entity::job::{JobPayload, JobPriority};

use crate::queue::{JobCreateParams, JobQueue};

/// Cron-based scheduler that enqueues maintenance jobs
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    /// Job queue for enqueuing scheduled work
    queue: Arc<JobQueue>,
    /// Cron expressions and job arguments
    config: ScheduleConfig,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler")
            .field("config", &self.config)
            .finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler
    pub async fn new(queue: Arc<JobQueue>, config: ScheduleConfig) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self {
            scheduler,
            queue,
            config,
        })
    }

    /// Register the cleanup and report schedules
    pub async fn register_default_tasks(&self) -> Result<(), AppError> {
        let cleanup = JobPayload::CleanupOldTasks {
            days_old: self.config.cleanup_days_old,
        };
        self.register(&self.config.cleanup_cron, cleanup, JobPriority::Low)
            .await?;

        let report = JobPayload::GenerateReport {
            report_type: self.config.report_type.clone(),
        };
        self.register(&self.config.report_cron, report, JobPriority::Normal)
            .await?;

        tracing::info!("All scheduled tasks registered");
        Ok(())
    }

    /// Enqueue `payload` every time `cron` fires
    pub async fn register(
        &self,
        cron: &str,
        payload: JobPayload,
        priority: JobPriority,
    ) -> Result<(), AppError> {
        let job_type = payload.job_type();
        let queue = Arc::clone(&self.queue);
        let job = CronJob::new_async(cron, move |_uuid, _lock| {
            let queue = Arc::clone(&queue);
            let payload = payload.clone();
            Box::pin(async move {
                tracing::debug!(job_type = payload.job_type(), "Scheduling job");
                if let Err(e) = queue.enqueue(JobCreateParams::new(payload, priority)).await {
                    tracing::error!(error = %e, "Failed to enqueue scheduled job");
                }
            })
        })
        .map_err(|e| {
            AppError::internal(format!("Failed to create {job_type} schedule '{cron}': {e}"))
        })?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add {job_type} schedule: {e}")))?;

        tracing::info!(job_type, cron, "Registered schedule");
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&self) -> Result<(), AppError> {
        let mut scheduler = self.scheduler.clone();
        scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskhub_database::memory::MemoryJobStore;

    fn queue() -> Arc<JobQueue> {
        Arc::new(JobQueue::new(Arc::new(MemoryJobStore::new()), "scheduler-test"))
    }

    #[tokio::test]
    async fn test_registers_default_schedules() {
        let scheduler = CronScheduler::new(queue(), ScheduleConfig::default())
            .await
            .unwrap();
        scheduler.register_default_tasks().await.unwrap();
    }

    #[tokio::test]
    async fn test_rejects_bad_cron_expression() {
        let config = ScheduleConfig {
            cleanup_cron: "whenever".to_string(),
            ..Default::default()
        };
        let scheduler = CronScheduler::new(queue(), config).await.unwrap();
        assert!(scheduler.register_default_tasks().await.is_err());
    }
}
