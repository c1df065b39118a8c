//! Operation kinds, their simulated handlers, and the registry mapping one
//! to the other.
//!
//! Every handler follows the same shape: a start log, a simulated delay,
//! some fabricated metrics, a completion log, and a human-readable summary
//! returned to the caller.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use taskhub_core::error::AppError;
use taskhub_core::result::AppResult;
use taskhub_core::types::TaskId;
use taskhub_database::TaskLogStore;
use taskhub_entity::log::level;

use crate::simulation::{Simulation, int_between, round_to, uniform};

/// The closed set of operations a task can be dispatched with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Generic processing.
    Default,
    /// Record transformation.
    DataProcessing,
    /// Multi-step file pipeline.
    FileProcessing,
    /// Email campaign delivery.
    EmailSending,
}

impl Operation {
    /// All operations.
    pub const ALL: [Operation; 4] = [
        Self::Default,
        Self::DataProcessing,
        Self::FileProcessing,
        Self::EmailSending,
    ];

    /// Wire name of the operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::DataProcessing => "data_processing",
            Self::FileProcessing => "file_processing",
            Self::EmailSending => "email_sending",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| AppError::validation(format!("Unknown operation: '{s}'")))
    }
}

/// Failure raised by an operation handler.
#[derive(Debug, thiserror::Error)]
pub enum OperationError {
    /// The operation itself failed.
    #[error("{0}")]
    Failed(String),

    /// A store call made by the handler failed.
    #[error("{0}")]
    Store(#[from] AppError),
}

/// What a handler gets to work with.
#[derive(Debug, Clone)]
pub struct OperationContext {
    /// Task being processed.
    pub task_id: TaskId,
    /// Log trail for progress entries.
    pub logs: Arc<dyn TaskLogStore>,
    /// Delay scaling.
    pub simulation: Simulation,
}

impl OperationContext {
    /// Append an info-level entry for this task.
    pub async fn log(&self, message: impl AsRef<str> + Send) -> AppResult<()> {
        self.logs
            .append(&self.task_id.to_string(), message.as_ref(), level::INFO)
            .await?;
        Ok(())
    }
}

/// Executes one kind of operation.
#[async_trait]
pub trait OperationHandler: Send + Sync + fmt::Debug {
    /// The operation this handler serves.
    fn operation(&self) -> Operation;

    /// Run the operation, returning a summary for the task's `result`.
    async fn run(&self, ctx: &OperationContext) -> Result<String, OperationError>;
}

/// Generic processing: 1-4 s.
#[derive(Debug, Default)]
pub struct DefaultOperation;

#[async_trait]
impl OperationHandler for DefaultOperation {
    fn operation(&self) -> Operation {
        Operation::Default
    }

    async fn run(&self, ctx: &OperationContext) -> Result<String, OperationError> {
        ctx.log("Starting default processing operation").await?;
        ctx.simulation.pause(1.0..=4.0).await;
        ctx.log("Default processing completed").await?;
        Ok("Default processing completed successfully.".to_string())
    }
}

#[derive(Debug, Serialize)]
struct DataProcessingMetrics {
    records_processed: u64,
    data_size_mb: f64,
    processing_time_seconds: f64,
}

impl DataProcessingMetrics {
    fn sample() -> Self {
        Self {
            records_processed: int_between(100..=1000),
            data_size_mb: round_to(uniform(1.5..=10.2), 2),
            processing_time_seconds: round_to(uniform(2.0..=8.0), 2),
        }
    }
}

/// Record transformation: 2-5 s.
#[derive(Debug, Default)]
pub struct DataProcessingOperation;

#[async_trait]
impl OperationHandler for DataProcessingOperation {
    fn operation(&self) -> Operation {
        Operation::DataProcessing
    }

    async fn run(&self, ctx: &OperationContext) -> Result<String, OperationError> {
        ctx.log("Starting data processing operation").await?;
        ctx.simulation.pause(2.0..=5.0).await;

        let metrics = DataProcessingMetrics::sample();
        ctx.log(format!(
            "Data processing completed: {}",
            serde_json::to_string(&metrics).map_err(AppError::from)?
        ))
        .await?;

        Ok(format!(
            "Data processing completed successfully. Processed {} records.",
            metrics.records_processed
        ))
    }
}

/// Steps logged by the file pipeline, in order.
pub const FILE_PROCESSING_STEPS: [&str; 5] = [
    "File validation completed",
    "File format conversion in progress",
    "Metadata extraction completed",
    "File compression applied",
    "Quality checks passed",
];

/// Multi-step file pipeline: 3-7 s, then five steps of 0.5-1.5 s each.
#[derive(Debug, Default)]
pub struct FileProcessingOperation;

#[async_trait]
impl OperationHandler for FileProcessingOperation {
    fn operation(&self) -> Operation {
        Operation::FileProcessing
    }

    async fn run(&self, ctx: &OperationContext) -> Result<String, OperationError> {
        ctx.log("Starting file processing operation").await?;
        ctx.simulation.pause(3.0..=7.0).await;

        for step in FILE_PROCESSING_STEPS {
            ctx.log(step).await?;
            ctx.simulation.pause(0.5..=1.5).await;
        }

        Ok("File processing completed successfully. All operations passed quality checks."
            .to_string())
    }
}

#[derive(Debug, Serialize)]
struct EmailCampaignMetrics {
    recipients: u64,
    templates_used: u64,
    delivery_rate: f64,
}

impl EmailCampaignMetrics {
    fn sample() -> Self {
        Self {
            recipients: int_between(10..=100),
            templates_used: int_between(1..=5),
            delivery_rate: round_to(uniform(95.0..=99.9), 1),
        }
    }
}

/// Email campaign delivery: 1-3 s.
#[derive(Debug, Default)]
pub struct EmailSendingOperation;

#[async_trait]
impl OperationHandler for EmailSendingOperation {
    fn operation(&self) -> Operation {
        Operation::EmailSending
    }

    async fn run(&self, ctx: &OperationContext) -> Result<String, OperationError> {
        ctx.log("Starting email sending operation").await?;
        ctx.simulation.pause(1.0..=3.0).await;

        let metrics = EmailCampaignMetrics::sample();
        ctx.log(format!(
            "Email campaign completed: {}",
            serde_json::to_string(&metrics).map_err(AppError::from)?
        ))
        .await?;

        Ok(format!(
            "Email campaign completed. Sent to {} recipients with {}% delivery rate.",
            metrics.recipients, metrics.delivery_rate
        ))
    }
}

/// Maps each [`Operation`] to its handler.
///
/// In lenient mode (the default) an unknown operation name falls back to
/// [`Operation::Default`] with a warning; in strict mode it is rejected
/// with a validation error.
#[derive(Debug, Clone)]
pub struct OperationRegistry {
    handlers: HashMap<Operation, Arc<dyn OperationHandler>>,
    strict: bool,
}

impl OperationRegistry {
    /// An empty registry.
    pub fn new(strict: bool) -> Self {
        Self {
            handlers: HashMap::new(),
            strict,
        }
    }

    /// A registry with the four simulated handlers.
    pub fn with_builtin(strict: bool) -> Self {
        let mut registry = Self::new(strict);
        registry.register(Arc::new(DefaultOperation));
        registry.register(Arc::new(DataProcessingOperation));
        registry.register(Arc::new(FileProcessingOperation));
        registry.register(Arc::new(EmailSendingOperation));
        registry
    }

    /// Register a handler, replacing any previous one for its operation.
    pub fn register(&mut self, handler: Arc<dyn OperationHandler>) {
        self.handlers.insert(handler.operation(), handler);
    }

    /// Whether unknown names are rejected.
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Map an operation name to the operation that will run.
    pub fn validate(&self, name: &str) -> AppResult<Operation> {
        match name.parse::<Operation>() {
            Ok(op) => Ok(op),
            Err(err) if self.strict => Err(err),
            Err(_) => {
                tracing::warn!(
                    operation = %name,
                    "Unknown operation, falling back to default"
                );
                Ok(Operation::Default)
            }
        }
    }

    /// Find the handler that will run `name`.
    pub fn resolve(&self, name: &str) -> AppResult<Arc<dyn OperationHandler>> {
        let operation = self.validate(name)?;
        self.handlers.get(&operation).cloned().ok_or_else(|| {
            AppError::internal(format!("No handler registered for operation '{operation}'"))
        })
    }
}

impl Default for OperationRegistry {
    fn default() -> Self {
        Self::with_builtin(false)
    }
}
