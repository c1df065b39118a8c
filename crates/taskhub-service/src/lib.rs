//! # taskhub-service
//!
//! Business logic service layer for TaskHub. Each service orchestrates the
//! stores to implement application-level use cases shared by the HTTP API
//! and the CLI.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod stats;
pub mod task;
pub mod user;

pub use stats::{StatsAggregator, TaskSummary, UserSummary};
pub use task::{TaskService, TaskWithLogs};
pub use user::UserService;
