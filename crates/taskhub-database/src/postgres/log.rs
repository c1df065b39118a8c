//! Task log store backed by the `task_logs` table.

use async_trait::async_trait;
use sqlx::PgPool;

use taskhub_core::result::AppResult;
use taskhub_entity::log::TaskLog;

use super::db_err;
use crate::store::TaskLogStore;

/// PostgreSQL task log store.
#[derive(Debug, Clone)]
pub struct PgTaskLogStore {
    pool: PgPool,
}

impl PgTaskLogStore {
    /// Create a new log store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskLogStore for PgTaskLogStore {
    async fn append(&self, task_id: &str, message: &str, level: &str) -> AppResult<TaskLog> {
        let entry = TaskLog::new(task_id, message, level);
        sqlx::query_as::<_, TaskLog>(
            "INSERT INTO task_logs (id, task_id, message, level, timestamp) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(entry.id)
        .bind(&entry.task_id)
        .bind(&entry.message)
        .bind(&entry.level)
        .bind(entry.timestamp)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to append task log"))
    }

    async fn find_by_task(&self, task_id: &str) -> AppResult<Vec<TaskLog>> {
        sqlx::query_as::<_, TaskLog>(
            "SELECT * FROM task_logs WHERE task_id = $1 ORDER BY timestamp ASC",
        )
        .bind(task_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to find task logs"))
    }

    async fn delete_by_task(&self, task_id: &str) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM task_logs WHERE task_id = $1")
            .bind(task_id)
            .execute(&self.pool)
            .await
            .map_err(db_err("Failed to delete task logs"))?;
        Ok(result.rows_affected())
    }
}
