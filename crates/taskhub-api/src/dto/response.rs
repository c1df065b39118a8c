//! Response DTOs.

use serde::{Deserialize, Serialize};

use taskhub_core::types::JobId;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

impl MessageResponse {
    /// Creates a message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Returned by the maintenance triggers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledJobResponse {
    /// Message.
    pub message: String,
    /// Job to poll for the outcome.
    pub job_id: JobId,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `healthy` or `degraded`.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Active persistence provider.
    pub database: String,
    /// When the check ran.
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Static service description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoResponse {
    pub name: String,
    pub description: String,
    pub version: String,
    pub features: Vec<String>,
    pub endpoints: serde_json::Value,
}
