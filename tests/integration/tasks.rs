//! Task lifecycle through the HTTP API.

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use serde_json::json;

use taskhub_worker::OperationRegistry;
use taskhub_worker::operations::{Operation, OperationContext, OperationError, OperationHandler};

use crate::helpers::TestApp;

#[derive(Debug)]
struct FailingDataProcessing;

#[async_trait]
impl OperationHandler for FailingDataProcessing {
    fn operation(&self) -> Operation {
        Operation::DataProcessing
    }

    async fn run(&self, ctx: &OperationContext) -> Result<String, OperationError> {
        ctx.log("Starting data processing operation").await?;
        Err(OperationError::Failed("upstream source unavailable".to_string()))
    }
}

#[tokio::test]
async fn test_created_task_is_pending() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/tasks",
            Some(json!({ "title": "T1", "description": "first" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    let task = response.data();
    assert_eq!(task["status"], "pending");
    assert_eq!(task["priority"], "medium");
    assert!(task["job_id"].is_null());
    assert!(task["result"].is_null());
    assert!(task["error_message"].is_null());
    assert!(task["completed_at"].is_null());
}

#[tokio::test]
async fn test_create_requires_title() {
    let app = TestApp::new().await;

    let response = app
        .request("POST", "/api/tasks", Some(json!({ "title": "" })))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION");
}

#[tokio::test]
async fn test_dispatch_runs_to_completion() {
    let app = TestApp::new().await;
    let task_id = app.create_task("T1", "medium").await;

    let response = app
        .request(
            "POST",
            &format!("/api/tasks/{task_id}/process?operation=default"),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["status"], "pending");
    assert!(response.data()["result"].is_null());
    let job_id = response.data()["job_id"].as_str().unwrap().to_string();

    let job = app.wait_for_job(&job_id).await;
    assert_eq!(job["status"], "completed");
    assert!(job["error"].is_null());

    let task = app.get_task(&task_id).await;
    let task = task.data();
    assert_eq!(task["status"], "completed");
    assert_eq!(task["job_id"], job_id.as_str());
    assert!(!task["result"].as_str().unwrap().is_empty());
    assert!(task["completed_at"].is_string());
    assert!(task["error_message"].is_null());
    assert_eq!(job["result"], task["result"]);

    let with_logs = app
        .request("GET", &format!("/api/tasks/{task_id}/with-logs"), None)
        .await;
    let logs = with_logs.data()["logs"].as_array().unwrap();
    assert!(logs.len() >= 2);
    assert_eq!(
        logs[0]["message"],
        "Started processing task with operation: default"
    );
    assert!(
        logs.last().unwrap()["message"]
            .as_str()
            .unwrap()
            .starts_with("Task completed successfully with result: ")
    );
    let timestamps: Vec<&str> = logs
        .iter()
        .map(|l| l["timestamp"].as_str().unwrap())
        .collect();
    let parsed: Vec<chrono::DateTime<chrono::Utc>> =
        timestamps.iter().map(|t| t.parse().unwrap()).collect();
    assert!(parsed.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
async fn test_every_operation_completes() {
    let app = TestApp::new().await;

    for operation in ["default", "data_processing", "file_processing", "email_sending"] {
        let task_id = app.create_task(operation, "low").await;
        let job_id = app.dispatch(&task_id, operation).await;
        let job = app.wait_for_job(&job_id).await;
        assert_eq!(job["status"], "completed", "{operation}");
    }
}

#[tokio::test]
async fn test_failing_handler_marks_task_failed() {
    let mut registry = OperationRegistry::with_builtin(false);
    registry.register(Arc::new(FailingDataProcessing));
    let app = TestApp::with_registry(registry).await;

    let task_id = app.create_task("doomed", "high").await;
    let job_id = app.dispatch(&task_id, "data_processing").await;

    let job = app.wait_for_job(&job_id).await;
    assert_eq!(job["status"], "failed");
    assert_eq!(job["error"], "upstream source unavailable");
    assert!(job["result"].is_null());

    let task = app.get_task(&task_id).await;
    let task = task.data();
    assert_eq!(task["status"], "failed");
    assert_eq!(task["error_message"], "upstream source unavailable");
    assert!(task["result"].is_null());

    let with_logs = app
        .request("GET", &format!("/api/tasks/{task_id}/with-logs"), None)
        .await;
    let last = with_logs.data()["logs"]
        .as_array()
        .unwrap()
        .last()
        .unwrap()
        .clone();
    assert_eq!(last["level"], "error");
    assert_eq!(last["message"], "Task failed with error: upstream source unavailable");
}

#[tokio::test]
async fn test_dispatch_non_pending_task_conflicts() {
    let app = TestApp::new().await;
    let task_id = app.create_task("once", "medium").await;
    let job_id = app.dispatch(&task_id, "default").await;
    app.wait_for_job(&job_id).await;

    let before = app.get_task(&task_id).await;

    let response = app
        .request("POST", &format!("/api/tasks/{task_id}/process"), None)
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["message"], "Task is not in pending status");

    let after = app.get_task(&task_id).await;
    assert_eq!(before.body, after.body);
}

#[tokio::test]
async fn test_concurrent_dispatch_accepts_one() {
    let app = TestApp::new().await;
    let task_id = app.create_task("raced", "medium").await;
    let path = format!("/api/tasks/{task_id}/process");

    let (a, b) = tokio::join!(
        app.request("POST", &path, None),
        app.request("POST", &path, None),
    );

    let mut statuses = [a.status, b.status];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::OK, StatusCode::CONFLICT]);
}

#[tokio::test]
async fn test_delete_without_dispatch() {
    let app = TestApp::new().await;
    let task_id = app.create_task("short-lived", "low").await;

    let response = app
        .request("DELETE", &format!("/api/tasks/{task_id}"), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["message"], "Task deleted successfully");

    let response = app.get_task(&task_id).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "NOT_FOUND");
    assert_eq!(app.stores.logs.total(), 0);

    let response = app
        .request("DELETE", &format!("/api/tasks/{task_id}"), None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_changes_only_given_fields() {
    let app = TestApp::new().await;
    let task_id = app.create_task("draft", "low").await;

    let response = app
        .request(
            "PUT",
            &format!("/api/tasks/{task_id}"),
            Some(json!({ "priority": "high" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["title"], "draft");
    assert_eq!(response.data()["priority"], "high");
    assert_eq!(response.data()["status"], "pending");
}

#[tokio::test]
async fn test_list_filters_and_limits() {
    let app = TestApp::new().await;
    for i in 0..3 {
        app.create_task(&format!("high-{i}"), "high").await;
    }
    app.create_task("low", "low").await;

    let response = app
        .request("GET", "/api/tasks?priority=high&limit=2", None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let page = response.data();
    assert_eq!(page["items"].as_array().unwrap().len(), 2);
    assert_eq!(page["total"], 3);
    assert_eq!(page["has_more"], true);

    let response = app.request("GET", "/api/tasks?limit=101", None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app.request("GET", "/api/tasks?limit=0", None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_query_uses_error_envelope() {
    let app = TestApp::new().await;

    for path in ["/api/tasks?status=bogus", "/api/tasks?skip=-1", "/api/users?is_active=maybe"] {
        let response = app.request("GET", path, None).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{path}");
        assert_eq!(response.body["error"], "VALIDATION", "{path}");
        assert!(response.body["message"].is_string(), "{path}");
    }
}

#[tokio::test]
async fn test_job_status_lookups() {
    let app = TestApp::new().await;
    let task_id = app.create_task("polled", "medium").await;

    let response = app
        .request("GET", &format!("/api/tasks/{task_id}/job-status"), None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Task has no associated job");

    let job_id = app.dispatch(&task_id, "email_sending").await;
    app.wait_for_job(&job_id).await;

    let response = app
        .request("GET", &format!("/api/tasks/{task_id}/job-status"), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["job_id"], job_id.as_str());
    assert_eq!(response.data()["status"], "completed");

    let response = app
        .request(
            "GET",
            "/api/jobs/00000000-0000-0000-0000-000000000000",
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_task_and_bad_id() {
    let app = TestApp::new().await;

    let response = app
        .get_task("00000000-0000-0000-0000-000000000000")
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app.get_task("not-a-uuid").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_task_stats() {
    let app = TestApp::new().await;
    app.create_task("a", "low").await;
    app.create_task("b", "high").await;
    let task_id = app.create_task("c", "high").await;
    let job_id = app.dispatch(&task_id, "default").await;
    app.wait_for_job(&job_id).await;

    let response = app.request("GET", "/api/tasks/stats/summary", None).await;
    assert_eq!(response.status, StatusCode::OK);
    let stats = response.data();
    assert_eq!(stats["total_tasks"], 3);
    assert_eq!(stats["by_status"]["pending"], 2);
    assert_eq!(stats["by_status"]["completed"], 1);
    assert_eq!(stats["by_priority"]["high"], 2);
    assert_eq!(stats["by_priority"]["medium"], 0);
}
