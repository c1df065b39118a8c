//! Typed job payload definitions.

use serde::{Deserialize, Serialize};
use taskhub_core::types::TaskId;

use super::model::{job_types, queues};

/// Typed payloads for known job types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "job_type")]
pub enum JobPayload {
    /// Run one task through its operation handler.
    #[serde(rename = "process_task")]
    ProcessTask {
        /// Task to execute.
        task_id: TaskId,
        /// Operation name as submitted.
        operation: String,
    },
    /// Delete completed tasks older than a threshold.
    #[serde(rename = "cleanup_old_tasks")]
    CleanupOldTasks {
        /// Age threshold in days.
        days_old: i64,
    },
    /// Produce a synthetic report.
    #[serde(rename = "generate_report")]
    GenerateReport {
        /// Report profile (`daily`, `weekly`, anything else).
        report_type: String,
    },
}

impl JobPayload {
    /// The job type string matching this payload.
    pub fn job_type(&self) -> &'static str {
        match self {
            Self::ProcessTask { .. } => job_types::PROCESS_TASK,
            Self::CleanupOldTasks { .. } => job_types::CLEANUP_OLD_TASKS,
            Self::GenerateReport { .. } => job_types::GENERATE_REPORT,
        }
    }

    /// The queue this payload is routed to.
    pub fn queue(&self) -> &'static str {
        match self {
            Self::ProcessTask { .. } => queues::TASKS,
            Self::CleanupOldTasks { .. } | Self::GenerateReport { .. } => queues::MAINTENANCE,
        }
    }

    /// Serialize into the JSON stored in `jobs.payload`.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Parse a stored JSON payload.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }
}
