//! Worker runner: main loop that polls for jobs and executes them.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, watch};
use tokio::time;

use taskhub_core::config::WorkerConfig;
use taskhub_entity::job::queues;

use crate::executor::JobExecutor;
use crate::queue::JobQueue;

/// How long shutdown waits for in-flight jobs.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

/// Polls queues and runs claimed jobs on a bounded pool of tokio tasks
#[derive(Debug)]
pub struct WorkerRunner {
    /// Job queue for polling
    queue: Arc<JobQueue>,
    /// Job executor for dispatching
    executor: Arc<JobExecutor>,
    /// Worker configuration
    config: WorkerConfig,
    /// Queues to poll (in priority order)
    queues: Vec<String>,
}

impl WorkerRunner {
    /// Create a new worker runner polling every known queue
    pub fn new(queue: Arc<JobQueue>, executor: Arc<JobExecutor>, config: WorkerConfig) -> Self {
        Self {
            queue,
            executor,
            config,
            queues: queues::ALL.iter().map(|q| q.to_string()).collect(),
        }
    }

    /// Set the queues to poll
    pub fn with_queues(mut self, queues: Vec<String>) -> Self {
        self.queues = queues;
        self
    }

    /// Identifier recorded on claimed jobs
    pub fn worker_id(&self) -> &str {
        self.queue.worker_id()
    }

    /// Run until the cancel signal flips to `true`
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        let concurrency = self.config.concurrency.max(1);
        tracing::info!(
            worker_id = %self.worker_id(),
            concurrency,
            poll_interval_ms = self.config.poll_interval_ms,
            queues = ?self.queues,
            "Worker started"
        );

        let semaphore = Arc::new(Semaphore::new(concurrency));
        let poll_interval = Duration::from_millis(self.config.poll_interval_ms);

        loop {
            if *cancel.borrow() {
                break;
            }

            // Not raced against cancellation so a claimed job is never dropped.
            if self.poll_and_execute(&semaphore).await {
                continue;
            }

            tokio::select! {
                changed = cancel.changed() => {
                    if changed.is_err() {
                        tracing::warn!(worker_id = %self.worker_id(), "Shutdown sender dropped");
                        break;
                    }
                }
                _ = time::sleep(poll_interval) => {}
            }
        }

        tracing::info!(
            worker_id = %self.worker_id(),
            "Worker waiting for in-flight jobs to complete"
        );

        // `concurrency` is at least 1 and bounded by config, far below u32::MAX.
        let permits = u32::try_from(concurrency).unwrap_or(u32::MAX);
        if time::timeout(SHUTDOWN_GRACE, semaphore.acquire_many(permits))
            .await
            .is_err()
        {
            tracing::warn!(worker_id = %self.worker_id(), "In-flight jobs still running after grace period");
        }

        tracing::info!(worker_id = %self.worker_id(), "Worker shut down complete");
    }

    /// Claim one job if a slot is free and run it in the background.
    /// Returns whether a job was claimed.
    async fn poll_and_execute(&self, semaphore: &Arc<Semaphore>) -> bool {
        let Ok(permit) = Arc::clone(semaphore).try_acquire_owned() else {
            tracing::trace!("All worker slots occupied, waiting");
            return false;
        };

        let queue_refs: Vec<&str> = self.queues.iter().map(String::as_str).collect();

        match self.queue.dequeue(&queue_refs).await {
            Ok(Some(job)) => {
                let queue = Arc::clone(&self.queue);
                let executor = Arc::clone(&self.executor);

                tokio::spawn(async move {
                    let _permit = permit;
                    let job_id = job.id;

                    tracing::info!(job_id = %job_id, job_type = %job.job_type, "Processing job");

                    match executor.execute(&job).await {
                        Ok(result) => {
                            if let Err(e) = queue.complete(job_id, result).await {
                                tracing::error!(job_id = %job_id, error = %e, "Failed to mark job as completed");
                            } else {
                                tracing::info!(job_id = %job_id, "Job completed successfully");
                            }
                        }
                        Err(err) => {
                            let msg = err.to_string();
                            tracing::error!(job_id = %job_id, error = %msg, "Job failed");
                            if let Err(e) = queue.fail(job_id, &msg).await {
                                tracing::error!(job_id = %job_id, error = %e, "Failed to mark job as failed");
                            }
                        }
                    }
                });
                true
            }
            Ok(None) => {
                tracing::trace!("No jobs available in queues");
                false
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to dequeue job");
                false
            }
        }
    }
}
