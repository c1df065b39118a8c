//! Read-only statistics.

pub mod aggregator;

pub use aggregator::{StatsAggregator, TaskSummary, UserSummary};
