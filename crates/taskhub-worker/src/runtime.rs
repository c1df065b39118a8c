//! Wiring of the execution engine from a store bundle and configuration.

use std::sync::Arc;

use taskhub_core::config::WorkerConfig;
use taskhub_core::error::AppError;
use taskhub_database::{Database, JobStore};

use crate::dispatcher::JobDispatcher;
use crate::executor::JobExecutor;
use crate::jobs::{CleanupJobHandler, ReportJobHandler, TaskProcessingHandler};
use crate::operations::OperationRegistry;
use crate::queue::JobQueue;
use crate::runner::WorkerRunner;
use crate::scheduler::CronScheduler;
use crate::simulation::Simulation;

/// Worker id recorded by the submission-side queue, which never claims.
const SUBMITTER_ID: &str = "submitter";

/// Everything needed to submit and execute jobs against one [`Database`].
#[derive(Debug, Clone)]
pub struct WorkerRuntime {
    jobs: Arc<dyn JobStore>,
    queue: Arc<JobQueue>,
    registry: Arc<OperationRegistry>,
    executor: Arc<JobExecutor>,
    dispatcher: JobDispatcher,
    config: WorkerConfig,
}

impl WorkerRuntime {
    /// Build a runtime with the built-in operations.
    pub fn new(db: &Database, config: &WorkerConfig) -> Self {
        let registry = OperationRegistry::with_builtin(config.strict_operations);
        Self::with_registry(db, config, registry)
    }

    /// Build a runtime around a caller-supplied operation registry.
    pub fn with_registry(db: &Database, config: &WorkerConfig, registry: OperationRegistry) -> Self {
        let registry = Arc::new(registry);
        let simulation = Simulation::new(config.simulation.time_scale);
        let queue = Arc::new(JobQueue::new(db.jobs.clone(), SUBMITTER_ID));

        let mut executor = JobExecutor::new();
        executor.register(Arc::new(TaskProcessingHandler::new(
            db.tasks.clone(),
            db.logs.clone(),
            Arc::clone(&registry),
            simulation,
        )));
        executor.register(Arc::new(CleanupJobHandler::new(
            db.tasks.clone(),
            db.logs.clone(),
        )));
        executor.register(Arc::new(ReportJobHandler::new(db.logs.clone(), simulation)));

        let dispatcher =
            JobDispatcher::new(db.tasks.clone(), Arc::clone(&queue), Arc::clone(&registry));

        Self {
            jobs: db.jobs.clone(),
            queue,
            registry,
            executor: Arc::new(executor),
            dispatcher,
            config: config.clone(),
        }
    }

    /// Submission-side entry point.
    pub fn dispatcher(&self) -> &JobDispatcher {
        &self.dispatcher
    }

    /// Operation registry shared by dispatch and execution.
    pub fn registry(&self) -> &Arc<OperationRegistry> {
        &self.registry
    }

    /// Job type router.
    pub fn executor(&self) -> &Arc<JobExecutor> {
        &self.executor
    }

    /// Submission-side queue.
    pub fn queue(&self) -> &Arc<JobQueue> {
        &self.queue
    }

    /// A runner that claims jobs as `worker_id`.
    pub fn runner(&self, worker_id: impl Into<String>) -> WorkerRunner {
        let queue = Arc::new(JobQueue::new(self.jobs.clone(), worker_id));
        WorkerRunner::new(queue, Arc::clone(&self.executor), self.config.clone())
    }

    /// A scheduler with the maintenance schedules registered, not yet started.
    pub async fn scheduler(&self) -> Result<CronScheduler, AppError> {
        let scheduler =
            CronScheduler::new(Arc::clone(&self.queue), self.config.schedule.clone()).await?;
        scheduler.register_default_tasks().await?;
        Ok(scheduler)
    }
}
