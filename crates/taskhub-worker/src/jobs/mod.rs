//! Built-in job handler implementations.

pub mod cleanup;
pub mod process;
pub mod report;

pub use cleanup::{CleanupJobHandler, MAX_DAYS_OLD};
pub use process::TaskProcessingHandler;
pub use report::ReportJobHandler;
