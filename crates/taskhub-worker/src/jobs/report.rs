//! Synthetic report generation.
//!
//! Reports are fabricated: the numbers are drawn at random per profile and
//! are not derived from stored tasks.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use taskhub_core::error::AppError;
use taskhub_core::result::AppResult;
use taskhub_database::TaskLogStore;
use taskhub_entity::job::{Job, JobPayload, job_types};
use taskhub_entity::log::{REPORT_GENERATION_TASK_ID, level};

use crate::executor::{JobExecutionError, JobHandler};
use crate::simulation::{Simulation, int_between, round_to, uniform};

/// Busiest windows included in weekly reports.
pub const PEAK_HOURS: [&str; 2] = ["09:00-11:00", "14:00-16:00"];

/// Figures of one generated report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportData {
    /// Total tasks in the period.
    pub total_tasks: u64,
    /// Completed tasks in the period.
    pub completed_tasks: u64,
    /// Failed tasks in the period.
    pub failed_tasks: u64,
    /// Mean processing time in seconds.
    pub avg_processing_time: f64,
    /// Busiest windows (weekly reports only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peak_hours: Option<Vec<String>>,
}

impl ReportData {
    /// Draw figures for `report_type`: `daily`, `weekly`, or anything else.
    pub fn sample(report_type: &str) -> Self {
        let avg_processing_time = round_to(uniform(2.0..=8.0), 2);
        match report_type {
            "daily" => Self {
                total_tasks: int_between(50..=200),
                completed_tasks: int_between(40..=180),
                failed_tasks: int_between(1..=10),
                avg_processing_time,
                peak_hours: None,
            },
            "weekly" => Self {
                total_tasks: int_between(300..=1000),
                completed_tasks: int_between(280..=950),
                failed_tasks: int_between(5..=30),
                avg_processing_time,
                peak_hours: Some(PEAK_HOURS.iter().map(|h| h.to_string()).collect()),
            },
            _ => Self {
                total_tasks: int_between(1000..=5000),
                completed_tasks: int_between(950..=4800),
                failed_tasks: int_between(20..=100),
                avg_processing_time,
                peak_hours: None,
            },
        }
    }
}

/// Handles `generate_report` jobs
#[derive(Debug)]
pub struct ReportJobHandler {
    logs: Arc<dyn TaskLogStore>,
    simulation: Simulation,
}

impl ReportJobHandler {
    /// Create a new report job handler
    pub fn new(logs: Arc<dyn TaskLogStore>, simulation: Simulation) -> Self {
        Self { logs, simulation }
    }

    /// Generate a report, logging under the `report_generation` sentinel id.
    pub async fn generate_report(&self, report_type: &str) -> AppResult<String> {
        self.logs
            .append(
                REPORT_GENERATION_TASK_ID,
                &format!("Starting {report_type} report generation"),
                level::INFO,
            )
            .await?;

        self.simulation.pause(5.0..=15.0).await;

        let data = ReportData::sample(report_type);
        let title = capitalize(report_type);
        let rendered = serde_json::to_string(&data).map_err(AppError::from)?;
        self.logs
            .append(
                REPORT_GENERATION_TASK_ID,
                &format!("{title} report generated: {rendered}"),
                level::INFO,
            )
            .await?;

        tracing::info!(report_type, total_tasks = data.total_tasks, "Report generated");
        Ok(format!(
            "{title} report generated successfully with {} total tasks",
            data.total_tasks
        ))
    }
}

/// Upper-case the first character and lower-case the rest.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[async_trait]
impl JobHandler for ReportJobHandler {
    fn job_type(&self) -> &str {
        job_types::GENERATE_REPORT
    }

    async fn execute(&self, job: &Job) -> Result<Option<Value>, JobExecutionError> {
        let report_type = match job.typed_payload() {
            Ok(JobPayload::GenerateReport { report_type }) => report_type,
            Ok(_) | Err(_) => {
                return Err(JobExecutionError::Permanent(format!(
                    "Invalid payload for job type '{}'",
                    job.job_type
                )));
            }
        };

        let message = self.generate_report(&report_type).await.map_err(|e| {
            tracing::error!(report_type = %report_type, error = %e, "Error generating report");
            JobExecutionError::from(e)
        })?;
        Ok(Some(Value::String(message)))
    }
}
