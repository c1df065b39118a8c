//! Task management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use taskhub_core::error::AppError;
use taskhub_core::types::{PageRequest, TaskId};
use taskhub_entity::task::{CreateTask, Task, TaskFilter, TaskPriority, TaskStatus};
use taskhub_service::TaskService;

use super::Context;
use crate::output::{self, OutputFormat};

/// Arguments for task commands
#[derive(Debug, Args)]
pub struct TaskArgs {
    /// Task subcommand
    #[command(subcommand)]
    pub command: TaskCommand,
}

/// Task subcommands
#[derive(Debug, Subcommand)]
pub enum TaskCommand {
    /// Create a pending task
    Create {
        /// Title
        title: String,
        /// Description
        #[arg(short, long)]
        description: Option<String>,
        /// Priority: low, medium, or high
        #[arg(short, long, default_value = "medium")]
        priority: TaskPriority,
    },
    /// List tasks, newest first
    List {
        /// Filter by status
        #[arg(short, long)]
        status: Option<TaskStatus>,
        /// Filter by priority
        #[arg(short, long)]
        priority: Option<TaskPriority>,
        /// Rows to skip
        #[arg(long, default_value_t = 0)]
        skip: u64,
        /// Rows to return (1-100)
        #[arg(long, default_value_t = 10)]
        limit: u64,
    },
    /// Show a task and its logs
    Show {
        /// Task ID
        id: TaskId,
    },
    /// Delete a task and its logs
    Delete {
        /// Task ID
        id: TaskId,
    },
    /// Dispatch a pending task to the worker
    Process {
        /// Task ID
        id: TaskId,
        /// Operation to run
        #[arg(short, long, default_value = "default")]
        operation: String,
    },
    /// Show the status of the job a task was dispatched with
    Status {
        /// Task ID
        id: TaskId,
    },
}

/// Task display row for table output
#[derive(Debug, Serialize, Tabled)]
struct TaskRow {
    id: String,
    title: String,
    status: String,
    priority: String,
    job_id: String,
    created_at: String,
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.to_string(),
            title: task.title.clone(),
            status: task.status.to_string(),
            priority: task.priority.to_string(),
            job_id: task.job_id.map(|j| j.to_string()).unwrap_or_default(),
            created_at: task.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// Log display row for table output
#[derive(Debug, Serialize, Tabled)]
struct LogRow {
    timestamp: String,
    level: String,
    message: String,
}

/// Execute task commands
pub async fn execute(args: &TaskArgs, ctx: &Context, format: OutputFormat) -> Result<(), AppError> {
    let service = TaskService::new(ctx.db.tasks.clone(), ctx.db.logs.clone());

    match &args.command {
        TaskCommand::Create {
            title,
            description,
            priority,
        } => {
            let task = service
                .create(CreateTask {
                    title: title.clone(),
                    description: description.clone(),
                    priority: *priority,
                })
                .await?;
            match format {
                OutputFormat::Table => output::print_success(&format!("Task created (id: {})", task.id)),
                OutputFormat::Json => output::print_json(&task),
            }
        }
        TaskCommand::List {
            status,
            priority,
            skip,
            limit,
        } => {
            let filter = TaskFilter {
                status: *status,
                priority: *priority,
            };
            let page = service.list(&filter, PageRequest::new(*skip, *limit)).await?;
            match format {
                OutputFormat::Table => {
                    let rows: Vec<TaskRow> = page.items.iter().map(TaskRow::from).collect();
                    output::print_list(&rows, format);
                    println!("{} of {} tasks", rows.len(), page.total);
                }
                OutputFormat::Json => output::print_json(&page),
            }
        }
        TaskCommand::Show { id } => {
            let with_logs = service.get_with_logs(*id).await?;
            match format {
                OutputFormat::Table => {
                    let task = &with_logs.task;
                    output::print_item(&TaskRow::from(task), format);
                    if let Some(description) = &task.description {
                        output::print_kv("Description", description);
                    }
                    if let Some(result) = &task.result {
                        output::print_kv("Result", result);
                    }
                    if let Some(error) = &task.error_message {
                        output::print_kv("Error", error);
                    }
                    let logs: Vec<LogRow> = with_logs
                        .logs
                        .iter()
                        .map(|l| LogRow {
                            timestamp: l.timestamp.format("%H:%M:%S%.3f").to_string(),
                            level: l.level.clone(),
                            message: l.message.clone(),
                        })
                        .collect();
                    output::print_list(&logs, format);
                }
                OutputFormat::Json => output::print_json(&with_logs),
            }
        }
        TaskCommand::Delete { id } => {
            service.delete(*id).await?;
            output::print_success(&format!("Task {id} deleted"));
        }
        TaskCommand::Process { id, operation } => {
            let receipt = ctx.runtime.dispatcher().dispatch(*id, operation).await?;
            match format {
                OutputFormat::Table => output::print_success(&format!(
                    "Task {id} dispatched with '{operation}' (job id: {})",
                    receipt.job_id
                )),
                OutputFormat::Json => output::print_json(&receipt),
            }
        }
        TaskCommand::Status { id } => {
            let view = ctx.runtime.dispatcher().query_task_status(*id).await?;
            super::job::print_status(&view, format);
        }
    }

    Ok(())
}
