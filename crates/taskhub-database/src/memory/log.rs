//! In-memory task log store.

use async_trait::async_trait;
use dashmap::DashMap;

use taskhub_core::result::AppResult;
use taskhub_entity::log::TaskLog;

use crate::store::TaskLogStore;

/// Log entries grouped by `task_id` in append order.
#[derive(Debug, Default)]
pub struct MemoryTaskLogStore {
    logs: DashMap<String, Vec<TaskLog>>,
}

impl MemoryTaskLogStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of entries across all tasks.
    pub fn total(&self) -> usize {
        self.logs.iter().map(|e| e.len()).sum()
    }
}

#[async_trait]
impl TaskLogStore for MemoryTaskLogStore {
    async fn append(&self, task_id: &str, message: &str, level: &str) -> AppResult<TaskLog> {
        let entry = TaskLog::new(task_id, message, level);
        self.logs
            .entry(task_id.to_string())
            .or_default()
            .push(entry.clone());
        Ok(entry)
    }

    async fn find_by_task(&self, task_id: &str) -> AppResult<Vec<TaskLog>> {
        let mut entries = self
            .logs
            .get(task_id)
            .map(|e| e.value().clone())
            .unwrap_or_default();
        entries.sort_by_key(|e| e.timestamp);
        Ok(entries)
    }

    async fn delete_by_task(&self, task_id: &str) -> AppResult<u64> {
        Ok(self
            .logs
            .remove(task_id)
            .map(|(_, entries)| entries.len() as u64)
            .unwrap_or(0))
    }
}
