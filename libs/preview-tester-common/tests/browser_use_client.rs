// BrowserUseClient against an in-process fake of the task API

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use preview_tester_common::browser_use::{BrowserUseClient, TaskService, API_KEY_HEADER};
use preview_tester_common::config::ServiceConfig;
use preview_tester_common::error::ServiceError;
use preview_tester_common::types::TaskStatus;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

#[derive(Default)]
struct FakeState {
    submitted: Mutex<Vec<String>>,
    seen_keys: Mutex<Vec<String>>,
}

async fn create_task(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> impl IntoResponse {
    record_key(&state, &headers);
    let task = body["task"].as_str().unwrap_or_default().to_string();
    state.submitted.lock().unwrap().push(task);

    (
        StatusCode::ACCEPTED,
        Json(serde_json::json!({
            "id": "task-1",
            "sessionId": "session-1"
        })),
    )
}

async fn get_task(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Path(task_id): Path<String>,
) -> impl IntoResponse {
    record_key(&state, &headers);
    match task_id.as_str() {
        "task-1" => (
            StatusCode::OK,
            Json(serde_json::json!({
                "id": "task-1",
                "sessionId": "session-1",
                "status": "finished",
                "isSuccess": true,
                "output": "Login works",
                "startedAt": "2026-10-19T08:00:00Z",
                "finishedAt": "2026-10-19T08:00:42Z",
                "steps": []
            })),
        )
            .into_response(),
        "garbled" => (StatusCode::OK, "not json").into_response(),
        _ => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"detail": "Task not found"})),
        )
            .into_response(),
    }
}

fn record_key(state: &FakeState, headers: &HeaderMap) {
    if let Some(value) = headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok()) {
        state.seen_keys.lock().unwrap().push(value.to_string());
    }
}

async fn spawn_fake() -> (String, Arc<FakeState>) {
    let state = Arc::new(FakeState::default());
    let app = Router::new()
        .route("/api/v2/tasks", post(create_task))
        .route("/api/v2/tasks/:task_id", get(get_task))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/api/v2", addr), state)
}

fn client_for(base_url: &str) -> BrowserUseClient {
    let mut config = ServiceConfig::new("bu_test_key");
    config.base_url = base_url.to_string();
    BrowserUseClient::new(&config).unwrap()
}

#[tokio::test]
async fn test_create_task_sends_prompt_and_key() {
    let (base_url, state) = spawn_fake().await;
    let client = client_for(&base_url);

    let created = client
        .create_task("Navigate to http://preview and execute this test case: Login. Sign in")
        .await
        .unwrap();

    assert_eq!(created.id, "task-1");
    assert_eq!(created.session_id.as_deref(), Some("session-1"));
    assert_eq!(
        state.submitted.lock().unwrap().as_slice(),
        ["Navigate to http://preview and execute this test case: Login. Sign in"]
    );
    assert_eq!(state.seen_keys.lock().unwrap().as_slice(), ["bu_test_key"]);
}

#[tokio::test]
async fn test_get_task_decodes_view() {
    let (base_url, state) = spawn_fake().await;
    let client = client_for(&base_url);

    let task = client.get_task("task-1").await.unwrap();

    assert_eq!(task.id, "task-1");
    assert_eq!(task.status, TaskStatus::Finished);
    assert_eq!(task.is_success, Some(true));
    assert_eq!(task.output.as_deref(), Some("Login works"));
    assert_eq!(state.seen_keys.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_non_success_status_is_api_error() {
    let (base_url, _state) = spawn_fake().await;
    let client = client_for(&base_url);

    match client.get_task("missing").await {
        Err(ServiceError::Api { status, body }) => {
            assert_eq!(status, 404);
            assert!(body.contains("Task not found"));
        }
        other => panic!("expected api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_garbled_body_is_decode_error() {
    let (base_url, _state) = spawn_fake().await;
    let client = client_for(&base_url);

    let err = client.get_task("garbled").await.unwrap_err();
    assert!(matches!(err, ServiceError::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_service_is_http_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(&format!("http://{}/api/v2", addr));
    let err = client.create_task("anything").await.unwrap_err();
    assert!(matches!(err, ServiceError::Http(_)));
}
