//! Task lifecycle service.

pub mod service;

pub use service::{TaskService, TaskWithLogs};
