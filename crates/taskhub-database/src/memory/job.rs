//! In-memory job store.

use std::cmp::Reverse;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use taskhub_core::error::AppError;
use taskhub_core::result::AppResult;
use taskhub_core::types::JobId;
use taskhub_entity::job::{CreateJob, Job, JobStatus};

use crate::store::JobStore;

/// Job store keyed by job id.
#[derive(Debug, Default)]
pub struct MemoryJobStore {
    jobs: DashMap<JobId, Job>,
}

impl MemoryJobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn finish(&self, id: JobId, write: impl FnOnce(&mut Job)) -> AppResult<()> {
        let mut entry = self
            .jobs
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Job {id} not found")))?;
        write(entry.value_mut());
        let now = Utc::now();
        entry.completed_at = Some(now);
        entry.updated_at = now;
        Ok(())
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn create(&self, data: CreateJob) -> AppResult<Job> {
        let job = Job::new(data);
        if self.jobs.contains_key(&job.id) {
            return Err(AppError::conflict(format!("Job {} already exists", job.id)));
        }
        self.jobs.insert(job.id, job.clone());
        Ok(job)
    }

    async fn find_by_id(&self, id: JobId) -> AppResult<Option<Job>> {
        Ok(self.jobs.get(&id).map(|j| j.clone()))
    }

    async fn claim_next(&self, queue: &str, worker_id: &str) -> AppResult<Option<Job>> {
        // Snapshot candidates first: holding an iterator guard while taking
        // `get_mut` on the same shard would deadlock.
        let mut candidates: Vec<(Reverse<u8>, chrono::DateTime<Utc>, JobId)> = self
            .jobs
            .iter()
            .filter(|j| j.queue == queue && j.status == JobStatus::Pending)
            .map(|j| (Reverse(j.priority.numeric_priority()), j.created_at, j.id))
            .collect();
        candidates.sort();

        for (_, _, id) in candidates {
            let Some(mut entry) = self.jobs.get_mut(&id) else {
                continue;
            };
            if entry.status != JobStatus::Pending {
                continue;
            }
            let now = Utc::now();
            entry.status = JobStatus::Running;
            entry.worker_id = Some(worker_id.to_string());
            entry.started_at = Some(now);
            entry.updated_at = now;
            return Ok(Some(entry.clone()));
        }
        Ok(None)
    }

    async fn mark_completed(
        &self,
        id: JobId,
        result: Option<&serde_json::Value>,
    ) -> AppResult<()> {
        self.finish(id, |job| {
            job.status = JobStatus::Completed;
            job.result = result.cloned();
        })
    }

    async fn mark_failed(&self, id: JobId, error: &str) -> AppResult<()> {
        self.finish(id, |job| {
            job.status = JobStatus::Failed;
            job.error_message = Some(error.to_string());
        })
    }

    async fn count_by_status(&self, status: JobStatus) -> AppResult<u64> {
        Ok(self.jobs.iter().filter(|j| j.status == status).count() as u64)
    }
}
