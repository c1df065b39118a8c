//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Background job worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the in-process worker is started alongside the server.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Number of concurrent job processing tasks.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Interval in milliseconds between job queue polls.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    /// Reject unknown operation names at dispatch instead of running the
    /// default operation.
    #[serde(default)]
    pub strict_operations: bool,
    /// Simulated-work tuning.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Periodic maintenance schedule.
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            concurrency: default_concurrency(),
            poll_interval_ms: default_poll_interval(),
            strict_operations: false,
            simulation: SimulationConfig::default(),
            schedule: ScheduleConfig::default(),
        }
    }
}

/// Controls the simulated delays inside operation handlers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Multiplier applied to every simulated delay; `0` disables sleeping.
    #[serde(default = "default_time_scale")]
    pub time_scale: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_scale: default_time_scale(),
        }
    }
}

/// Cron schedule for maintenance jobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Whether the cron scheduler is started.
    #[serde(default)]
    pub enabled: bool,
    /// Cron expression (with seconds) for the cleanup job.
    #[serde(default = "default_cleanup_cron")]
    pub cleanup_cron: String,
    /// Age threshold in days passed to scheduled cleanups.
    #[serde(default = "default_cleanup_days_old")]
    pub cleanup_days_old: i64,
    /// Cron expression (with seconds) for the report job.
    #[serde(default = "default_report_cron")]
    pub report_cron: String,
    /// Report type generated by the scheduled report job.
    #[serde(default = "default_report_type")]
    pub report_type: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            cleanup_cron: default_cleanup_cron(),
            cleanup_days_old: default_cleanup_days_old(),
            report_cron: default_report_cron(),
            report_type: default_report_type(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_concurrency() -> usize {
    4
}

fn default_poll_interval() -> u64 {
    500
}

fn default_time_scale() -> f64 {
    1.0
}

fn default_cleanup_cron() -> String {
    "0 0 3 * * *".to_string()
}

fn default_cleanup_days_old() -> i64 {
    30
}

fn default_report_cron() -> String {
    "0 0 6 * * *".to_string()
}

fn default_report_type() -> String {
    "daily".to_string()
}
