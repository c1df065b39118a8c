//! Task CRUD and log retrieval.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use taskhub_core::error::AppError;
use taskhub_core::types::{PageRequest, PageResponse, TaskId};
use taskhub_database::{TaskLogStore, TaskStore};
use taskhub_entity::log::TaskLog;
use taskhub_entity::task::{CreateTask, Task, TaskFilter, UpdateTask};

/// A task together with its execution log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskWithLogs {
    /// The task itself.
    #[serde(flatten)]
    pub task: Task,
    /// Log entries, oldest first.
    pub logs: Vec<TaskLog>,
}

/// Handles task management operations.
#[derive(Debug, Clone)]
pub struct TaskService {
    /// Task store.
    tasks: Arc<dyn TaskStore>,
    /// Task log store.
    logs: Arc<dyn TaskLogStore>,
}

impl TaskService {
    /// Creates a new task service.
    pub fn new(tasks: Arc<dyn TaskStore>, logs: Arc<dyn TaskLogStore>) -> Self {
        Self { tasks, logs }
    }

    /// Creates a pending task.
    pub async fn create(&self, data: CreateTask) -> Result<Task, AppError> {
        if data.title.trim().is_empty() {
            return Err(AppError::validation("Task title must not be empty"));
        }
        let task = self.tasks.create(data).await?;
        info!(task_id = %task.id, priority = %task.priority, "Task created");
        Ok(task)
    }

    /// Gets a single task by ID.
    pub async fn get(&self, id: TaskId) -> Result<Task, AppError> {
        self.tasks.get(id).await
    }

    /// Gets a task and its execution log.
    pub async fn get_with_logs(&self, id: TaskId) -> Result<TaskWithLogs, AppError> {
        let task = self.tasks.get(id).await?;
        let logs = self.logs.find_by_task(&id.to_string()).await?;
        Ok(TaskWithLogs { task, logs })
    }

    /// Lists tasks matching `filter`, newest first.
    pub async fn list(
        &self,
        filter: &TaskFilter,
        page: PageRequest,
    ) -> Result<PageResponse<Task>, AppError> {
        let items = self.tasks.find(filter, &page).await?;
        let total = self.tasks.count(filter).await?;
        Ok(PageResponse::new(items, &page, total))
    }

    /// Updates title, description, or priority.
    pub async fn update(&self, id: TaskId, changes: UpdateTask) -> Result<Task, AppError> {
        if changes.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(AppError::validation("Task title must not be empty"));
        }
        let task = self.tasks.update(id, &changes).await?;
        info!(task_id = %id, "Task updated");
        Ok(task)
    }

    /// Deletes a task and its logs.
    ///
    /// Logs go first; if the task delete then fails the task survives
    /// without its log trail.
    pub async fn delete(&self, id: TaskId) -> Result<(), AppError> {
        self.tasks.get(id).await?;

        let removed_logs = self.logs.delete_by_task(&id.to_string()).await?;
        if !self.tasks.delete(id).await? {
            return Err(AppError::not_found("Task not found"));
        }

        info!(task_id = %id, removed_logs, "Task deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskhub_core::error::ErrorKind;
    use taskhub_database::memory::MemoryStores;
    use taskhub_entity::log::level;
    use taskhub_entity::task::{TaskPriority, TaskStatus};

    fn service() -> (MemoryStores, TaskService) {
        let stores = MemoryStores::new();
        let service = TaskService::new(stores.tasks.clone(), stores.logs.clone());
        (stores, service)
    }

    fn create(title: &str, priority: TaskPriority) -> CreateTask {
        CreateTask {
            title: title.to_string(),
            description: Some("desc".to_string()),
            priority,
        }
    }

    #[tokio::test]
    async fn test_created_task_is_pending_and_bare() {
        let (_, service) = service();
        let task = service.create(create("T1", TaskPriority::Medium)).await.unwrap();

        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.job_id.is_none());
        assert!(task.result.is_none());
        assert!(task.error_message.is_none());
        assert!(task.completed_at.is_none());
    }

    #[tokio::test]
    async fn test_blank_title_rejected() {
        let (_, service) = service();
        let err = service.create(create("   ", TaskPriority::Low)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_list_filters_and_pages() {
        let (_, service) = service();
        for i in 0..5 {
            service
                .create(create(&format!("low-{i}"), TaskPriority::Low))
                .await
                .unwrap();
        }
        service.create(create("high", TaskPriority::High)).await.unwrap();

        let filter = TaskFilter::with_priority(TaskPriority::Low);
        let page = service.list(&filter, PageRequest::new(1, 2)).await.unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, 5);
        assert!(page.has_more);
        assert!(page.items.iter().all(|t| t.priority == TaskPriority::Low));
    }

    #[tokio::test]
    async fn test_update_merges_present_fields() {
        let (_, service) = service();
        let task = service.create(create("before", TaskPriority::Low)).await.unwrap();

        let updated = service
            .update(
                task.id,
                UpdateTask {
                    priority: Some(TaskPriority::High),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "before");
        assert_eq!(updated.priority, TaskPriority::High);
        assert!(updated.updated_at >= task.updated_at);
    }

    #[tokio::test]
    async fn test_delete_removes_task_and_logs() {
        let (stores, service) = service();
        let task = service.create(create("doomed", TaskPriority::Low)).await.unwrap();
        stores
            .logs
            .append(&task.id.to_string(), "hello", level::INFO)
            .await
            .unwrap();

        service.delete(task.id).await.unwrap();

        let err = service.get(task.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(stores.logs.total(), 0);

        let err = service.delete(task.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_get_with_logs() {
        let (stores, service) = service();
        let task = service.create(create("logged", TaskPriority::Medium)).await.unwrap();
        let key = task.id.to_string();
        stores.logs.append(&key, "one", level::INFO).await.unwrap();
        stores.logs.append(&key, "two", level::ERROR).await.unwrap();

        let with_logs = service.get_with_logs(task.id).await.unwrap();
        assert_eq!(with_logs.task.id, task.id);
        let messages: Vec<_> = with_logs.logs.iter().map(|l| l.message.as_str()).collect();
        assert_eq!(messages, ["one", "two"]);
    }
}
