//! CLI command definitions and dispatch.

pub mod job;
pub mod maintenance;
pub mod stats;
pub mod task;
pub mod worker;

use clap::{Parser, Subcommand};

use taskhub_core::config::AppConfig;
use taskhub_core::error::AppError;
use taskhub_database::Database;
use taskhub_worker::WorkerRuntime;

use crate::output::OutputFormat;

/// TaskHub: task management with background processing
#[derive(Debug, Parser)]
#[command(name = "taskhub", version, about, long_about = None)]
pub struct Cli {
    /// Configuration environment (selects `config/{env}.toml`)
    #[arg(short, long, env = "TASKHUB_ENV", default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Task management
    Task(task::TaskArgs),
    /// Job inspection
    Job(job::JobArgs),
    /// Cleanup and report triggers
    Maintenance(maintenance::MaintenanceArgs),
    /// Task and user statistics
    Stats(stats::StatsArgs),
    /// Run or inspect the background worker
    Worker(worker::WorkerArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = load_config(&self.env)?;
        let ctx = Context::connect(config).await?;

        let result = match &self.command {
            Commands::Task(args) => task::execute(args, &ctx, self.format).await,
            Commands::Job(args) => job::execute(args, &ctx, self.format).await,
            Commands::Maintenance(args) => maintenance::execute(args, &ctx).await,
            Commands::Stats(args) => stats::execute(args, &ctx, self.format).await,
            Commands::Worker(args) => worker::execute(args, &ctx, self.format).await,
        };

        ctx.db.close().await;
        result
    }
}

/// Everything a command needs, built once per invocation.
#[derive(Debug)]
pub struct Context {
    /// Loaded configuration
    pub config: AppConfig,
    /// Store bundle
    pub db: Database,
    /// Dispatcher, executor, and runner factory
    pub runtime: WorkerRuntime,
}

impl Context {
    async fn connect(config: AppConfig) -> Result<Self, AppError> {
        let db = Database::connect(&config.database).await?;
        if db.provider() == "memory" {
            tracing::warn!("Using the in-memory provider; state will not outlive this command");
        }
        let runtime = WorkerRuntime::new(&db, &config.worker);
        Ok(Self {
            config,
            db,
            runtime,
        })
    }
}

/// Helper: load and validate configuration for `env`
pub fn load_config(env: &str) -> Result<AppConfig, AppError> {
    let config = AppConfig::load(env)?;
    config.validate()?;
    Ok(config)
}
