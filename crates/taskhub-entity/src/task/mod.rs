//! Task domain entities.

pub mod model;
pub mod status;

pub use model::{CreateTask, Task, TaskFilter, UpdateTask};
pub use status::{TaskPriority, TaskStatus};
