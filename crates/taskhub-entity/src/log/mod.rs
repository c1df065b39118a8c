//! Task execution log entries.

pub mod model;

pub use model::{REPORT_GENERATION_TASK_ID, TaskLog, level};
