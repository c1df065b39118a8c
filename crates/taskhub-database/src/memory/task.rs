//! In-memory task store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use taskhub_core::error::AppError;
use taskhub_core::result::AppResult;
use taskhub_core::types::{JobId, PageRequest, TaskId};
use taskhub_entity::task::{CreateTask, Task, TaskFilter, TaskStatus, UpdateTask};

use crate::store::TaskStore;

/// Task store keyed by task id.
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    tasks: DashMap<TaskId, Task>,
}

impl MemoryTaskStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a fully formed task, bypassing lifecycle checks.
    pub fn insert(&self, task: Task) {
        self.tasks.insert(task.id, task);
    }

    /// Number of stored tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Apply `write` only if the task is currently in `expected`.
    fn transition(
        &self,
        id: TaskId,
        expected: TaskStatus,
        write: impl FnOnce(&mut Task),
    ) -> Option<Task> {
        let mut entry = self.tasks.get_mut(&id)?;
        if entry.status != expected {
            return None;
        }
        write(entry.value_mut());
        entry.updated_at = Utc::now();
        Some(entry.clone())
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn create(&self, data: CreateTask) -> AppResult<Task> {
        let task = Task::new(data);
        self.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn find_by_id(&self, id: TaskId) -> AppResult<Option<Task>> {
        Ok(self.tasks.get(&id).map(|t| t.clone()))
    }

    async fn update(&self, id: TaskId, changes: &UpdateTask) -> AppResult<Task> {
        let mut entry = self
            .tasks
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("Task not found"))?;
        entry.apply_update(changes);
        Ok(entry.clone())
    }

    async fn delete(&self, id: TaskId) -> AppResult<bool> {
        Ok(self.tasks.remove(&id).is_some())
    }

    async fn find(&self, filter: &TaskFilter, page: &PageRequest) -> AppResult<Vec<Task>> {
        let mut matching: Vec<Task> = self
            .tasks
            .iter()
            .filter(|t| filter.matches(t.value()))
            .map(|t| t.value().clone())
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page.apply(matching))
    }

    async fn count(&self, filter: &TaskFilter) -> AppResult<u64> {
        Ok(self.tasks.iter().filter(|t| filter.matches(t.value())).count() as u64)
    }

    async fn mark_processing(&self, id: TaskId, job_id: JobId) -> AppResult<Option<Task>> {
        Ok(self.transition(id, TaskStatus::Pending, |task| {
            task.status = TaskStatus::Processing;
            task.job_id = Some(job_id);
        }))
    }

    async fn mark_completed(&self, id: TaskId, result: &str) -> AppResult<Option<Task>> {
        Ok(self.transition(id, TaskStatus::Processing, |task| {
            task.status = TaskStatus::Completed;
            task.result = Some(result.to_string());
            task.completed_at = Some(Utc::now());
        }))
    }

    async fn mark_failed(&self, id: TaskId, error: &str) -> AppResult<Option<Task>> {
        Ok(self.transition(id, TaskStatus::Processing, |task| {
            task.status = TaskStatus::Failed;
            task.error_message = Some(error.to_string());
        }))
    }

    async fn find_completed_before(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<Task>> {
        let mut old: Vec<Task> = self
            .tasks
            .iter()
            .filter(|t| {
                t.status == TaskStatus::Completed && t.completed_at.is_some_and(|at| at < cutoff)
            })
            .map(|t| t.value().clone())
            .collect();
        old.sort_by_key(|t| t.completed_at);
        Ok(old)
    }
}
