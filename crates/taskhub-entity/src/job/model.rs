//! Job entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskhub_core::types::JobId;

use super::payload::JobPayload;
use super::status::{JobPriority, JobStatus};

/// Known job type identifiers.
pub mod job_types {
    /// Execute a dispatched task.
    pub const PROCESS_TASK: &str = "process_task";
    /// Age-based task cleanup.
    pub const CLEANUP_OLD_TASKS: &str = "cleanup_old_tasks";
    /// Synthetic report generation.
    pub const GENERATE_REPORT: &str = "generate_report";
}

/// Queue names, in the order workers poll them.
pub mod queues {
    /// Task execution queue.
    pub const TASKS: &str = "tasks";
    /// Maintenance queue.
    pub const MAINTENANCE: &str = "maintenance";
    /// Default polling order.
    pub const ALL: [&str; 2] = [TASKS, MAINTENANCE];
}

/// A background job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Job {
    /// Unique job identifier.
    pub id: JobId,
    /// Job type identifier (e.g., `"process_task"`).
    pub job_type: String,
    /// Queue name.
    pub queue: String,
    /// Job priority.
    pub priority: JobPriority,
    /// Job-specific payload (JSON).
    pub payload: serde_json::Value,
    /// Result data on completion (JSON).
    pub result: Option<serde_json::Value>,
    /// Error message on failure.
    pub error_message: Option<String>,
    /// Current job status.
    pub status: JobStatus,
    /// Worker ID that picked up the job.
    pub worker_id: Option<String>,
    /// When the job started executing.
    pub started_at: Option<DateTime<Utc>>,
    /// When the job finished.
    pub completed_at: Option<DateTime<Utc>>,
    /// When the job was created.
    pub created_at: DateTime<Utc>,
    /// When the job was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Build a pending job from creation data.
    pub fn new(data: CreateJob) -> Self {
        let now = Utc::now();
        Self {
            id: data.id,
            job_type: data.job_type,
            queue: data.queue,
            priority: data.priority,
            payload: data.payload,
            result: None,
            error_message: None,
            status: JobStatus::Pending,
            worker_id: None,
            started_at: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Decode the typed payload.
    pub fn typed_payload(&self) -> Result<JobPayload, serde_json::Error> {
        JobPayload::from_value(&self.payload)
    }
}

/// Data required to create a new job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateJob {
    /// Job id, minted by the caller so it can be recorded before enqueue.
    pub id: JobId,
    /// Job type identifier.
    pub job_type: String,
    /// Queue name.
    pub queue: String,
    /// Priority.
    pub priority: JobPriority,
    /// Job-specific payload.
    pub payload: serde_json::Value,
}

impl CreateJob {
    /// Build creation data from a typed payload.
    pub fn from_payload(id: JobId, payload: &JobPayload, priority: JobPriority) -> Self {
        Self {
            id,
            job_type: payload.job_type().to_string(),
            queue: payload.queue().to_string(),
            priority,
            payload: payload.to_value(),
        }
    }
}
