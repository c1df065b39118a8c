//! Shared test helpers for integration tests.

use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tokio::sync::watch;
use tower::ServiceExt;

use taskhub_api::{build_app, build_state};
use taskhub_core::config::{AppConfig, SimulationConfig};
use taskhub_database::Database;
use taskhub_database::memory::MemoryStores;
use taskhub_worker::{OperationRegistry, WorkerRuntime};

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Concrete stores behind the router, for seeding and inspection
    pub stores: MemoryStores,
    /// Stops the worker when dropped
    _shutdown: watch::Sender<bool>,
}

/// Status and parsed JSON body of one response
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestResponse {
    /// The `data` member of a success envelope
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }
}

impl TestApp {
    /// App with the built-in operations and instant simulated work
    pub async fn new() -> Self {
        Self::with_registry(OperationRegistry::with_builtin(false)).await
    }

    /// App whose worker resolves operations through `registry`
    pub async fn with_registry(registry: OperationRegistry) -> Self {
        let mut config = AppConfig::default();
        config.worker.poll_interval_ms = 5;
        config.worker.simulation = SimulationConfig { time_scale: 0.0 };

        let stores = MemoryStores::new();
        let db = Database::from_memory(&stores);
        let runtime = WorkerRuntime::with_registry(&db, &config.worker, registry);

        let (shutdown, rx) = watch::channel(false);
        let runner = runtime.runner("worker-test");
        tokio::spawn(async move { runner.run(rx).await });

        let router = build_app(build_state(config, db, &runtime));

        Self {
            router,
            stores,
            _shutdown: shutdown,
        }
    }

    /// Send one request through the router
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Create a task and return its id
    pub async fn create_task(&self, title: &str, priority: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/tasks",
                Some(json!({ "title": title, "priority": priority })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        response.data()["id"]
            .as_str()
            .expect("task id")
            .to_string()
    }

    /// Dispatch a task and return the job id
    pub async fn dispatch(&self, task_id: &str, operation: &str) -> String {
        let response = self
            .request(
                "POST",
                &format!("/api/tasks/{task_id}/process?operation={operation}"),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        response.data()["job_id"]
            .as_str()
            .expect("job id")
            .to_string()
    }

    /// Poll a job until it is completed or failed
    pub async fn wait_for_job(&self, job_id: &str) -> Value {
        for _ in 0..500 {
            let response = self.request("GET", &format!("/api/jobs/{job_id}"), None).await;
            assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
            let status = response.data()["status"].as_str().unwrap_or_default();
            if status == "completed" || status == "failed" {
                return response.data().clone();
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("job {job_id} did not finish");
    }

    /// Fetch a task's JSON representation
    pub async fn get_task(&self, task_id: &str) -> TestResponse {
        self.request("GET", &format!("/api/tasks/{task_id}"), None)
            .await
    }
}
