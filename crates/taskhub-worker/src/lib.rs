//! Task execution engine for TaskHub.
//!
//! This crate provides:
//! - A dispatcher that hands tasks to asynchronous execution and reports
//!   job status
//! - A worker runner that polls for and executes queued jobs
//! - A job executor that routes jobs to the correct handler
//! - The operation registry and the simulated operation handlers
//! - Maintenance jobs (cleanup, reports) and a cron scheduler for them

pub mod dispatcher;
pub mod executor;
pub mod jobs;
pub mod operations;
pub mod queue;
pub mod runner;
pub mod runtime;
pub mod scheduler;
pub mod simulation;

pub use dispatcher::{DispatchReceipt, JobDispatcher, JobStatusView};
pub use operations::{Operation, OperationRegistry};
pub use runner::WorkerRunner;
pub use runtime::WorkerRuntime;
pub use scheduler::CronScheduler;
