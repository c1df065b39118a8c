//! In-memory stores backed by `DashMap`.
//!
//! Suitable for single-process runs and tests. Conditional writes take the
//! per-entry lock via `get_mut`, so compare-and-set semantics match the
//! PostgreSQL stores.

pub mod job;
pub mod log;
pub mod task;
pub mod user;

use std::sync::Arc;

pub use job::MemoryJobStore;
pub use log::MemoryTaskLogStore;
pub use task::MemoryTaskStore;
pub use user::MemoryUserStore;

/// One in-memory instance of every store, kept concretely typed so tests
/// can reach provider-specific helpers such as [`MemoryTaskStore::insert`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStores {
    /// Tasks.
    pub tasks: Arc<MemoryTaskStore>,
    /// Task logs.
    pub logs: Arc<MemoryTaskLogStore>,
    /// Jobs.
    pub jobs: Arc<MemoryJobStore>,
    /// Users.
    pub users: Arc<MemoryUserStore>,
}

impl MemoryStores {
    /// Create empty stores.
    pub fn new() -> Self {
        Self::default()
    }
}
