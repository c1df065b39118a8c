//! Task entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskhub_core::types::{JobId, TaskId};

use super::status::{TaskPriority, TaskStatus};

/// A submitted unit of work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Unique task identifier.
    pub id: TaskId,
    /// Short title.
    pub title: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Lifecycle status.
    pub status: TaskStatus,
    /// Priority.
    pub priority: TaskPriority,
    /// Id of the job executing this task, set once on dispatch.
    pub job_id: Option<JobId>,
    /// Human-readable result summary (completed tasks only).
    pub result: Option<String>,
    /// Error message (failed tasks only).
    pub error_message: Option<String>,
    /// When the task was created.
    pub created_at: DateTime<Utc>,
    /// When the task was last updated.
    pub updated_at: DateTime<Utc>,
    /// When the task completed successfully.
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Build a fresh pending task from creation data.
    pub fn new(data: CreateTask) -> Self {
        let now = Utc::now();
        Self {
            id: TaskId::new(),
            title: data.title,
            description: data.description,
            status: TaskStatus::Pending,
            priority: data.priority,
            job_id: None,
            result: None,
            error_message: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    /// Check whether the task has been handed to a worker.
    pub fn is_dispatched(&self) -> bool {
        self.job_id.is_some()
    }

    /// Merge the present fields of `changes`, bumping `updated_at`.
    pub fn apply_update(&mut self, changes: &UpdateTask) {
        if let Some(title) = &changes.title {
            self.title = title.clone();
        }
        if let Some(description) = &changes.description {
            self.description = Some(description.clone());
        }
        if let Some(priority) = changes.priority {
            self.priority = priority;
        }
        self.updated_at = Utc::now();
    }
}

/// Data required to create a new task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTask {
    /// Title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Priority.
    #[serde(default)]
    pub priority: TaskPriority,
}

/// Partial update for a task.
///
/// Lifecycle fields (`status`, `job_id`, `result`, `error_message`,
/// `completed_at`) are deliberately absent; they change only through the
/// conditional lifecycle writes of the task store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New priority.
    pub priority: Option<TaskPriority>,
}

impl UpdateTask {
    /// Whether no field is present.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.priority.is_none()
    }
}

/// Exact-match filter for task listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFilter {
    /// Only tasks with this status.
    pub status: Option<TaskStatus>,
    /// Only tasks with this priority.
    pub priority: Option<TaskPriority>,
}

impl TaskFilter {
    /// Filter by status only.
    pub fn with_status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            priority: None,
        }
    }

    /// Filter by priority only.
    pub fn with_priority(priority: TaskPriority) -> Self {
        Self {
            status: None,
            priority: Some(priority),
        }
    }

    /// Check whether `task` satisfies the filter.
    pub fn matches(&self, task: &Task) -> bool {
        self.status.is_none_or(|s| s == task.status)
            && self.priority.is_none_or(|p| p == task.priority)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Task {
        Task::new(CreateTask {
            title: "T1".to_string(),
            description: None,
            priority: TaskPriority::Medium,
        })
    }

    #[test]
    fn test_new_task_is_pending_and_bare() {
        let task = sample();
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.job_id.is_none());
        assert!(task.result.is_none());
        assert!(task.error_message.is_none());
        assert!(task.completed_at.is_none());
        assert_eq!(task.created_at, task.updated_at);
    }

    #[test]
    fn test_apply_update_merges_present_fields() {
        let mut task = sample();
        task.apply_update(&UpdateTask {
            title: None,
            description: Some("details".to_string()),
            priority: Some(TaskPriority::High),
        });
        assert_eq!(task.title, "T1");
        assert_eq!(task.description.as_deref(), Some("details"));
        assert_eq!(task.priority, TaskPriority::High);
        assert!(task.updated_at >= task.created_at);
    }

    #[test]
    fn test_filter_matches() {
        let task = sample();
        assert!(TaskFilter::default().matches(&task));
        assert!(TaskFilter::with_status(TaskStatus::Pending).matches(&task));
        assert!(!TaskFilter::with_priority(TaskPriority::Low).matches(&task));
    }

    #[test]
    fn test_create_task_priority_defaults_to_medium() {
        let data: CreateTask = serde_json::from_str(r#"{"title": "x"}"#).expect("parse");
        assert_eq!(data.priority, TaskPriority::Medium);
    }
}
