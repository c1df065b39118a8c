//! Cleanup, report generation, and service endpoints.

use axum::http::StatusCode;
use chrono::{Duration, Utc};

use taskhub_database::{TaskLogStore, TaskStore};
use taskhub_entity::log::{REPORT_GENERATION_TASK_ID, level};
use taskhub_entity::task::{CreateTask, Task, TaskStatus};

use crate::helpers::TestApp;

fn completed_days_ago(title: &str, days: i64) -> Task {
    let mut task = Task::new(CreateTask {
        title: title.to_string(),
        ..Default::default()
    });
    task.status = TaskStatus::Completed;
    task.result = Some("done".to_string());
    task.completed_at = Some(Utc::now() - Duration::days(days));
    task
}

#[tokio::test]
async fn test_cleanup_removes_old_completed_tasks() {
    let app = TestApp::new().await;

    let old = completed_days_ago("old", 40);
    let recent = completed_days_ago("recent", 2);
    for task in [&old, &recent] {
        app.stores.tasks.insert(task.clone());
        app.stores
            .logs
            .append(&task.id.to_string(), "processed", level::INFO)
            .await
            .unwrap();
    }
    let pending_id = app.create_task("still pending", "low").await;

    let response = app
        .request("POST", "/api/tasks/cleanup?days_old=30", None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["message"], "Cleanup task started");
    let job_id = response.data()["job_id"].as_str().unwrap().to_string();

    let job = app.wait_for_job(&job_id).await;
    assert_eq!(job["status"], "completed");
    assert_eq!(job["result"], "Cleaned up 1 old tasks");

    assert!(app.stores.tasks.find_by_id(old.id).await.unwrap().is_none());
    assert!(
        app.stores
            .logs
            .find_by_task(&old.id.to_string())
            .await
            .unwrap()
            .is_empty()
    );
    assert!(app.stores.tasks.find_by_id(recent.id).await.unwrap().is_some());
    assert_eq!(app.get_task(&pending_id).await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_cleanup_rejects_zero_days() {
    let app = TestApp::new().await;
    let response = app
        .request("POST", "/api/tasks/cleanup?days_old=0", None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cleanup_rejects_unrepresentable_age() {
    let app = TestApp::new().await;
    let response = app
        .request("POST", "/api/tasks/cleanup?days_old=1000000000", None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION");
}

#[tokio::test]
async fn test_report_generation() {
    let app = TestApp::new().await;

    let response = app
        .request("POST", "/api/tasks/generate-report?report_type=weekly", None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["message"], "Weekly report generation started");
    let job_id = response.data()["job_id"].as_str().unwrap().to_string();

    let job = app.wait_for_job(&job_id).await;
    assert_eq!(job["status"], "completed");
    assert!(
        job["result"]
            .as_str()
            .unwrap()
            .starts_with("Weekly report generated successfully with ")
    );

    let logs = app
        .stores
        .logs
        .find_by_task(REPORT_GENERATION_TASK_ID)
        .await
        .unwrap();
    assert_eq!(logs.len(), 2);
}

#[tokio::test]
async fn test_health_and_info() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/health", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["status"], "healthy");
    assert_eq!(response.data()["database"], "memory");

    let response = app.request("GET", "/api/info", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["name"], "TaskHub");
}
