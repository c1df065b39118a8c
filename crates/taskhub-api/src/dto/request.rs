//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use taskhub_entity::task::{CreateTask, TaskPriority, UpdateTask};
use taskhub_entity::user::{CreateUser, UpdateUser};

/// Create task request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Title.
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    /// Description.
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    /// Priority, `medium` when omitted.
    #[serde(default)]
    pub priority: TaskPriority,
}

impl From<CreateTaskRequest> for CreateTask {
    fn from(req: CreateTaskRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            priority: req.priority,
        }
    }
}

/// Update task request body. Absent fields are left unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 200, message = "Title must not be empty"))]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
}

impl From<UpdateTaskRequest> for UpdateTask {
    fn from(req: UpdateTaskRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            priority: req.priority,
        }
    }
}

/// `?operation=` for task dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessParams {
    /// Operation name, `default` when omitted.
    #[serde(default = "default_operation")]
    pub operation: String,
}

fn default_operation() -> String {
    "default".to_string()
}

/// `?days_old=` for the cleanup trigger.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CleanupParams {
    /// Age threshold in days.
    #[serde(default = "default_days_old")]
    #[validate(range(min = 1, max = 36500, message = "days_old must be between 1 and 36500"))]
    pub days_old: i64,
}

fn default_days_old() -> i64 {
    30
}

/// `?report_type=` for the report trigger.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReportParams {
    /// Report profile.
    #[serde(default = "default_report_type")]
    #[validate(length(min = 1))]
    pub report_type: String,
}

fn default_report_type() -> String {
    "daily".to_string()
}

/// Create user request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Username.
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    /// Email.
    #[validate(email)]
    pub email: String,
    /// Full name.
    #[validate(length(min = 1, max = 100))]
    pub full_name: String,
}

impl From<CreateUserRequest> for CreateUser {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            username: req.username,
            email: req.email,
            full_name: req.full_name,
        }
    }
}

/// Update user request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub full_name: Option<String>,
    pub is_active: Option<bool>,
}

impl From<UpdateUserRequest> for UpdateUser {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            username: req.username,
            email: req.email,
            full_name: req.full_name,
            is_active: req.is_active,
        }
    }
}
