//! Worker CLI commands.

use clap::{Args, Subcommand};
use tokio::sync::watch;

use taskhub_core::error::AppError;

use super::Context;
use crate::output::{self, OutputFormat};

/// Arguments for worker commands
#[derive(Debug, Args)]
pub struct WorkerArgs {
    /// Worker subcommand
    #[command(subcommand)]
    pub command: WorkerCommand,
}

/// Worker subcommands
#[derive(Debug, Subcommand)]
pub enum WorkerCommand {
    /// Run a worker in the foreground until Ctrl+C
    Run {
        /// Override `worker.concurrency`
        #[arg(short, long)]
        concurrency: Option<usize>,
    },
    /// Show queue status
    Status,
}

/// Execute worker commands
pub async fn execute(args: &WorkerArgs, ctx: &Context, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        WorkerCommand::Run { concurrency } => run(ctx, *concurrency).await,
        WorkerCommand::Status => {
            let stats = ctx.runtime.queue().stats().await?;
            match format {
                OutputFormat::Table => {
                    println!("Worker Queue Status:");
                    output::print_kv("Pending", &stats.pending.to_string());
                    output::print_kv("Running", &stats.running.to_string());
                    output::print_kv("Completed", &stats.completed.to_string());
                    output::print_kv("Failed", &stats.failed.to_string());
                    output::print_kv("Concurrency", &ctx.config.worker.concurrency.to_string());
                    output::print_kv(
                        "Strict Operations",
                        &ctx.config.worker.strict_operations.to_string(),
                    );
                }
                OutputFormat::Json => output::print_json(&stats),
            }
            Ok(())
        }
    }
}

async fn run(ctx: &Context, concurrency: Option<usize>) -> Result<(), AppError> {
    let mut worker_config = ctx.config.worker.clone();
    if let Some(concurrency) = concurrency {
        worker_config.concurrency = concurrency.max(1);
    }

    let runtime = taskhub_worker::WorkerRuntime::new(&ctx.db, &worker_config);
    let worker_id = format!("worker-{}", &uuid::Uuid::new_v4().to_string()[..8]);
    let runner = runtime.runner(worker_id.clone());

    let scheduler = if worker_config.schedule.enabled {
        let scheduler = runtime.scheduler().await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        None
    };

    let (tx, rx) = watch::channel(false);
    let handle = tokio::spawn(async move { runner.run(rx).await });
    output::print_success(&format!("Worker '{worker_id}' running; press Ctrl+C to stop"));

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| AppError::internal(format!("Failed to listen for Ctrl+C: {e}")))?;

    let _ = tx.send(true);
    if let Some(scheduler) = scheduler {
        scheduler.shutdown().await?;
    }
    handle
        .await
        .map_err(|e| AppError::internal(format!("Worker task failed: {e}")))?;

    output::print_success(&format!("Worker '{worker_id}' stopped"));
    Ok(())
}
