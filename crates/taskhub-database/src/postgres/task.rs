//! Task store backed by the `tasks` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use taskhub_core::error::AppError;
use taskhub_core::result::AppResult;
use taskhub_core::types::{JobId, PageRequest, TaskId};
use taskhub_entity::task::{CreateTask, Task, TaskFilter, TaskStatus, UpdateTask};

use super::{count_to_u64, db_err};
use crate::store::TaskStore;

const FILTER_CLAUSE: &str = "($1::task_status IS NULL OR status = $1) \
     AND ($2::task_priority IS NULL OR priority = $2)";

/// PostgreSQL task store.
#[derive(Debug, Clone)]
pub struct PgTaskStore {
    pool: PgPool,
}

impl PgTaskStore {
    /// Create a new task store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn create(&self, data: CreateTask) -> AppResult<Task> {
        let task = Task::new(data);
        sqlx::query_as::<_, Task>(
            "INSERT INTO tasks (id, title, description, status, priority, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status)
        .bind(task.priority)
        .bind(task.created_at)
        .bind(task.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to create task"))
    }

    async fn find_by_id(&self, id: TaskId) -> AppResult<Option<Task>> {
        sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find task"))
    }

    async fn update(&self, id: TaskId, changes: &UpdateTask) -> AppResult<Task> {
        sqlx::query_as::<_, Task>(
            "UPDATE tasks SET \
                title = COALESCE($2, title), \
                description = COALESCE($3, description), \
                priority = COALESCE($4, priority), \
                updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(changes.priority)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to update task"))?
        .ok_or_else(|| AppError::not_found("Task not found"))
    }

    async fn delete(&self, id: TaskId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err("Failed to delete task"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn find(&self, filter: &TaskFilter, page: &PageRequest) -> AppResult<Vec<Task>> {
        let sql = format!(
            "SELECT * FROM tasks WHERE {FILTER_CLAUSE} \
             ORDER BY created_at DESC LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Task>(&sql)
            .bind(filter.status)
            .bind(filter.priority)
            .bind(page.sql_limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(db_err("Failed to list tasks"))
    }

    async fn count(&self, filter: &TaskFilter) -> AppResult<u64> {
        let sql = format!("SELECT COUNT(*) FROM tasks WHERE {FILTER_CLAUSE}");
        let count: i64 = sqlx::query_scalar(&sql)
            .bind(filter.status)
            .bind(filter.priority)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err("Failed to count tasks"))?;
        Ok(count_to_u64(count))
    }

    async fn mark_processing(&self, id: TaskId, job_id: JobId) -> AppResult<Option<Task>> {
        sqlx::query_as::<_, Task>(
            "UPDATE tasks SET status = $3, job_id = $2, updated_at = NOW() \
             WHERE id = $1 AND status = $4 RETURNING *",
        )
        .bind(id)
        .bind(job_id)
        .bind(TaskStatus::Processing)
        .bind(TaskStatus::Pending)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to mark task processing"))
    }

    async fn mark_completed(&self, id: TaskId, result: &str) -> AppResult<Option<Task>> {
        sqlx::query_as::<_, Task>(
            "UPDATE tasks SET status = $3, result = $2, completed_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND status = $4 RETURNING *",
        )
        .bind(id)
        .bind(result)
        .bind(TaskStatus::Completed)
        .bind(TaskStatus::Processing)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to mark task completed"))
    }

    async fn mark_failed(&self, id: TaskId, error: &str) -> AppResult<Option<Task>> {
        sqlx::query_as::<_, Task>(
            "UPDATE tasks SET status = $3, error_message = $2, updated_at = NOW() \
             WHERE id = $1 AND status = $4 RETURNING *",
        )
        .bind(id)
        .bind(error)
        .bind(TaskStatus::Failed)
        .bind(TaskStatus::Processing)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to mark task failed"))
    }

    async fn find_completed_before(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<Task>> {
        sqlx::query_as::<_, Task>(
            "SELECT * FROM tasks WHERE status = $1 AND completed_at < $2 ORDER BY completed_at",
        )
        .bind(TaskStatus::Completed)
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to find old completed tasks"))
    }
}
