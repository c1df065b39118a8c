//! Statistics CLI commands.

use clap::{Args, Subcommand};

use taskhub_core::error::AppError;
use taskhub_service::StatsAggregator;

use super::Context;
use crate::output::{self, OutputFormat};

/// Arguments for stats commands
#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Stats subcommand
    #[command(subcommand)]
    pub command: StatsCommand,
}

/// Stats subcommands
#[derive(Debug, Subcommand)]
pub enum StatsCommand {
    /// Task counts by status and priority
    Tasks,
    /// User counts by active flag
    Users,
}

/// Execute stats commands
pub async fn execute(args: &StatsArgs, ctx: &Context, format: OutputFormat) -> Result<(), AppError> {
    let stats = StatsAggregator::new(ctx.db.tasks.clone(), ctx.db.users.clone());

    match &args.command {
        StatsCommand::Tasks => {
            let summary = stats.task_summary().await?;
            if format == OutputFormat::Json {
                output::print_json(&summary);
                return Ok(());
            }
            println!("Tasks:");
            output::print_kv("Total", &summary.total_tasks.to_string());
            output::print_kv("Pending", &summary.by_status.pending.to_string());
            output::print_kv("Processing", &summary.by_status.processing.to_string());
            output::print_kv("Completed", &summary.by_status.completed.to_string());
            output::print_kv("Failed", &summary.by_status.failed.to_string());
            output::print_kv("Low priority", &summary.by_priority.low.to_string());
            output::print_kv("Medium priority", &summary.by_priority.medium.to_string());
            output::print_kv("High priority", &summary.by_priority.high.to_string());
        }
        StatsCommand::Users => {
            let summary = stats.user_summary().await?;
            if format == OutputFormat::Json {
                output::print_json(&summary);
                return Ok(());
            }
            println!("Users:");
            output::print_kv("Total", &summary.total_users.to_string());
            output::print_kv("Active", &summary.active_users.to_string());
            output::print_kv("Inactive", &summary.inactive_users.to_string());
        }
    }
    Ok(())
}
