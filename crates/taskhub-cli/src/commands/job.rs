//! Job inspection CLI commands.

use clap::{Args, Subcommand};

use taskhub_core::error::AppError;
use taskhub_core::types::JobId;
use taskhub_worker::JobStatusView;

use super::Context;
use crate::output::{self, OutputFormat};

/// Arguments for job commands
#[derive(Debug, Args)]
pub struct JobArgs {
    /// Job subcommand
    #[command(subcommand)]
    pub command: JobCommand,
}

/// Job subcommands
#[derive(Debug, Subcommand)]
pub enum JobCommand {
    /// Show a job's status, result, and error
    Status {
        /// Job ID
        id: JobId,
    },
}

/// Execute job commands
pub async fn execute(args: &JobArgs, ctx: &Context, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        JobCommand::Status { id } => {
            let view = ctx.runtime.dispatcher().query_status(*id).await?;
            print_status(&view, format);
        }
    }
    Ok(())
}

/// Print a job status view
pub fn print_status(view: &JobStatusView, format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            println!("Job {}:", view.job_id);
            output::print_kv("Status", view.status.as_str());
            if let Some(result) = &view.result {
                let rendered = match result {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                output::print_kv("Result", &rendered);
            }
            if let Some(error) = &view.error {
                output::print_kv("Error", error);
            }
        }
        OutputFormat::Json => output::print_json(view),
    }
}
