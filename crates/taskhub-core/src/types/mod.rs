//! Shared value types.

pub mod id;
pub mod pagination;

pub use id::{JobId, TaskId, TaskLogId, UserId};
pub use pagination::{PageRequest, PageResponse};
