//! Maintenance trigger CLI commands.

use clap::{Args, Subcommand};

use taskhub_core::error::AppError;

use super::Context;
use crate::output;

/// Arguments for maintenance commands
#[derive(Debug, Args)]
pub struct MaintenanceArgs {
    /// Maintenance subcommand
    #[command(subcommand)]
    pub command: MaintenanceCommand,
}

/// Maintenance subcommands
#[derive(Debug, Subcommand)]
pub enum MaintenanceCommand {
    /// Enqueue cleanup of old completed tasks
    Cleanup {
        /// Delete tasks completed more than this many days ago
        #[arg(short, long, default_value_t = 30)]
        days_old: i64,
    },
    /// Enqueue report generation
    Report {
        /// Report profile: daily, weekly, or anything else
        #[arg(short, long, default_value = "daily")]
        report_type: String,
    },
}

/// Execute maintenance commands
pub async fn execute(args: &MaintenanceArgs, ctx: &Context) -> Result<(), AppError> {
    let dispatcher = ctx.runtime.dispatcher();
    match &args.command {
        MaintenanceCommand::Cleanup { days_old } => {
            let job = dispatcher.schedule_cleanup(*days_old).await?;
            output::print_success(&format!("Cleanup enqueued (job id: {})", job.id));
        }
        MaintenanceCommand::Report { report_type } => {
            let job = dispatcher.schedule_report(report_type).await?;
            output::print_success(&format!(
                "Report '{report_type}' enqueued (job id: {})",
                job.id
            ));
        }
    }
    Ok(())
}
