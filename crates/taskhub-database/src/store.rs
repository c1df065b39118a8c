//! Store traits implemented by every persistence provider.
//!
//! Lifecycle writes on [`TaskStore`] are conditional: each one names the
//! status it expects and returns `None` when the row is not in it, so two
//! racing writers can never both win.

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use taskhub_core::error::AppError;
use taskhub_core::result::AppResult;
use taskhub_core::types::{JobId, PageRequest, TaskId, UserId};
use taskhub_entity::job::{CreateJob, Job, JobStatus};
use taskhub_entity::log::TaskLog;
use taskhub_entity::task::{CreateTask, Task, TaskFilter, UpdateTask};
use taskhub_entity::user::{CreateUser, UpdateUser, User, UserFilter};

/// Persisted task records.
#[async_trait]
pub trait TaskStore: Send + Sync + Debug + 'static {
    /// Insert a new task. Status is always `pending`.
    async fn create(&self, data: CreateTask) -> AppResult<Task>;

    /// Find a task by ID.
    async fn find_by_id(&self, id: TaskId) -> AppResult<Option<Task>>;

    /// Fetch a task, failing with `NotFound` if it does not exist.
    async fn get(&self, id: TaskId) -> AppResult<Task> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Task not found"))
    }

    /// Merge the present fields of `changes`.
    async fn update(&self, id: TaskId, changes: &UpdateTask) -> AppResult<Task>;

    /// Remove the task row only. Returns whether a row was removed.
    async fn delete(&self, id: TaskId) -> AppResult<bool>;

    /// Matching tasks, newest first.
    async fn find(&self, filter: &TaskFilter, page: &PageRequest) -> AppResult<Vec<Task>>;

    /// Number of matching tasks.
    async fn count(&self, filter: &TaskFilter) -> AppResult<u64>;

    /// `pending -> processing`, recording the job id.
    async fn mark_processing(&self, id: TaskId, job_id: JobId) -> AppResult<Option<Task>>;

    /// `processing -> completed`, recording the result and completion time.
    async fn mark_completed(&self, id: TaskId, result: &str) -> AppResult<Option<Task>>;

    /// `processing -> failed`, recording the error message.
    async fn mark_failed(&self, id: TaskId, error: &str) -> AppResult<Option<Task>>;

    /// Completed tasks whose `completed_at` is older than `cutoff`.
    async fn find_completed_before(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<Task>>;
}

/// Append-only execution log.
#[async_trait]
pub trait TaskLogStore: Send + Sync + Debug + 'static {
    /// Insert one entry.
    async fn append(&self, task_id: &str, message: &str, level: &str) -> AppResult<TaskLog>;

    /// All entries for `task_id`, oldest first.
    async fn find_by_task(&self, task_id: &str) -> AppResult<Vec<TaskLog>>;

    /// Delete all entries for `task_id`, returning how many were removed.
    async fn delete_by_task(&self, task_id: &str) -> AppResult<u64>;
}

/// Background job rows.
#[async_trait]
pub trait JobStore: Send + Sync + Debug + 'static {
    /// Insert a pending job.
    async fn create(&self, data: CreateJob) -> AppResult<Job>;

    /// Find a job by ID.
    async fn find_by_id(&self, id: JobId) -> AppResult<Option<Job>>;

    /// Atomically claim the most urgent pending job in `queue`.
    ///
    /// Ordered by priority (high first) then age (oldest first). The
    /// returned job is already `running` and owned by `worker_id`.
    async fn claim_next(&self, queue: &str, worker_id: &str) -> AppResult<Option<Job>>;

    /// Record a successful outcome.
    async fn mark_completed(&self, id: JobId, result: Option<&serde_json::Value>)
    -> AppResult<()>;

    /// Record a failed outcome.
    async fn mark_failed(&self, id: JobId, error: &str) -> AppResult<()>;

    /// Number of jobs with `status`.
    async fn count_by_status(&self, status: JobStatus) -> AppResult<u64>;
}

/// User accounts with unique username and email.
#[async_trait]
pub trait UserStore: Send + Sync + Debug + 'static {
    /// Insert a new user. Fails with `Conflict` on a duplicate username or email.
    async fn create(&self, data: CreateUser) -> AppResult<User>;

    /// Find a user by ID.
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>>;

    /// Find a user by username.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Find a user by email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Matching users, newest first.
    async fn find(&self, filter: &UserFilter, page: &PageRequest) -> AppResult<Vec<User>>;

    /// Number of matching users.
    async fn count(&self, filter: &UserFilter) -> AppResult<u64>;

    /// Merge the present fields of `changes`.
    async fn update(&self, id: UserId, changes: &UpdateUser) -> AppResult<User>;

    /// Remove a user. Returns whether a row was removed.
    async fn delete(&self, id: UserId) -> AppResult<bool>;
}
