//! Task and user counts.
//!
//! Every count is an independent query with no snapshot across them; a
//! concurrent write between two counts can make the figures disagree.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use taskhub_core::error::AppError;
use taskhub_database::{TaskStore, UserStore};
use taskhub_entity::task::{TaskFilter, TaskPriority, TaskStatus};
use taskhub_entity::user::UserFilter;

/// Task counts per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub pending: u64,
    pub processing: u64,
    pub completed: u64,
    pub failed: u64,
}

/// Task counts per priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityCounts {
    pub low: u64,
    pub medium: u64,
    pub high: u64,
}

/// Aggregate task statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSummary {
    /// Sum of the status counts.
    pub total_tasks: u64,
    pub by_status: StatusCounts,
    pub by_priority: PriorityCounts,
}

/// Aggregate user statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub total_users: u64,
    pub active_users: u64,
    pub inactive_users: u64,
}

/// Computes read-only statistics over the stores.
#[derive(Debug, Clone)]
pub struct StatsAggregator {
    tasks: Arc<dyn TaskStore>,
    users: Arc<dyn UserStore>,
}

impl StatsAggregator {
    /// Creates a new stats aggregator.
    pub fn new(tasks: Arc<dyn TaskStore>, users: Arc<dyn UserStore>) -> Self {
        Self { tasks, users }
    }

    /// Counts tasks by status and by priority.
    pub async fn task_summary(&self) -> Result<TaskSummary, AppError> {
        let by_status = StatusCounts {
            pending: self.count_status(TaskStatus::Pending).await?,
            processing: self.count_status(TaskStatus::Processing).await?,
            completed: self.count_status(TaskStatus::Completed).await?,
            failed: self.count_status(TaskStatus::Failed).await?,
        };
        let by_priority = PriorityCounts {
            low: self.count_priority(TaskPriority::Low).await?,
            medium: self.count_priority(TaskPriority::Medium).await?,
            high: self.count_priority(TaskPriority::High).await?,
        };

        Ok(TaskSummary {
            total_tasks: by_status.pending
                + by_status.processing
                + by_status.completed
                + by_status.failed,
            by_status,
            by_priority,
        })
    }

    /// Counts users, split by the active flag.
    pub async fn user_summary(&self) -> Result<UserSummary, AppError> {
        let total_users = self.users.count(&UserFilter::default()).await?;
        let active_users = self.users.count(&UserFilter { is_active: Some(true) }).await?;
        let inactive_users = self
            .users
            .count(&UserFilter {
                is_active: Some(false),
            })
            .await?;

        Ok(UserSummary {
            total_users,
            active_users,
            inactive_users,
        })
    }

    async fn count_status(&self, status: TaskStatus) -> Result<u64, AppError> {
        self.tasks
            .count(&TaskFilter::with_status(status))
            .await
    }

    async fn count_priority(&self, priority: TaskPriority) -> Result<u64, AppError> {
        self.tasks
            .count(&TaskFilter::with_priority(priority))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskhub_core::types::JobId;
    use taskhub_database::memory::MemoryStores;
    use taskhub_entity::task::CreateTask;
    use taskhub_entity::user::{CreateUser, UpdateUser};

    #[tokio::test]
    async fn test_task_summary() {
        let stores = MemoryStores::new();
        let stats = StatsAggregator::new(stores.tasks.clone(), stores.users.clone());

        for priority in [TaskPriority::Low, TaskPriority::High, TaskPriority::High] {
            stores
                .tasks
                .create(CreateTask {
                    title: "t".to_string(),
                    description: None,
                    priority,
                })
                .await
                .unwrap();
        }
        let first = stores
            .tasks
            .find(&TaskFilter::default(), &Default::default())
            .await
            .unwrap()[0]
            .id;
        stores.tasks.mark_processing(first, JobId::new()).await.unwrap();

        let summary = stats.task_summary().await.unwrap();
        assert_eq!(summary.total_tasks, 3);
        assert_eq!(summary.by_status.pending, 2);
        assert_eq!(summary.by_status.processing, 1);
        assert_eq!(summary.by_priority.high, 2);
        assert_eq!(summary.by_priority.medium, 0);
    }

    #[tokio::test]
    async fn test_user_summary() {
        let stores = MemoryStores::new();
        let stats = StatsAggregator::new(stores.tasks.clone(), stores.users.clone());

        for name in ["a", "b", "c"] {
            stores
                .users
                .create(CreateUser {
                    username: name.to_string(),
                    email: format!("{name}@example.com"),
                    full_name: name.to_uppercase(),
                })
                .await
                .unwrap();
        }
        let someone = stores
            .users
            .find_by_username("b")
            .await
            .unwrap()
            .unwrap();
        stores
            .users
            .update(
                someone.id,
                &UpdateUser {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let summary = stats.user_summary().await.unwrap();
        assert_eq!(
            summary,
            UserSummary {
                total_users: 3,
                active_users: 2,
                inactive_users: 1,
            }
        );
    }
}
