use crate::config::ServiceConfig;
use crate::error::ServiceError;
use crate::types::{CreatedTask, TaskView};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

/// Browser Use task API semantics - paths and auth header shared by the
/// client and the fakes used in tests

pub const API_KEY_HEADER: &str = "X-Browser-Use-API-Key";
pub const TASKS_PATH: &str = "/tasks";

/// Collection endpoint used to create tasks
pub fn tasks_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), TASKS_PATH)
}

/// Endpoint for a single task
pub fn task_url(base_url: &str, task_id: &str) -> String {
    format!("{}/{}", tasks_url(base_url), task_id)
}

/// Remote browser-automation task service.
///
/// The step only ever creates a task and reads it back; everything else about
/// the task's lifecycle is owned by the service.
#[async_trait]
pub trait TaskService: Send + Sync {
    async fn create_task(&self, task: &str) -> Result<CreatedTask, ServiceError>;

    async fn get_task(&self, task_id: &str) -> Result<TaskView, ServiceError>;
}

#[derive(Debug, Serialize)]
struct CreateTaskRequest<'a> {
    task: &'a str,
}

/// HTTP client for the Browser Use cloud API
#[derive(Clone)]
pub struct BrowserUseClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl BrowserUseClient {
    pub fn new(config: &ServiceConfig) -> Result<Self, ServiceError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl TaskService for BrowserUseClient {
    async fn create_task(&self, task: &str) -> Result<CreatedTask, ServiceError> {
        let response = self
            .http
            .post(tasks_url(&self.base_url))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&CreateTaskRequest { task })
            .send()
            .await?;

        let created: CreatedTask = decode(response).await?;
        debug!(task_id = %created.id, "Remote task created");
        Ok(created)
    }

    async fn get_task(&self, task_id: &str) -> Result<TaskView, ServiceError> {
        let response = self
            .http
            .get(task_url(&self.base_url, task_id))
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ServiceError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(ServiceError::Api {
            status: status.as_u16(),
            body,
        });
    }

    Ok(serde_json::from_str(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_urls() {
        assert_eq!(
            tasks_url("https://api.browser-use.com/api/v2"),
            "https://api.browser-use.com/api/v2/tasks"
        );
        assert_eq!(
            task_url("https://api.browser-use.com/api/v2/", "abc-123"),
            "https://api.browser-use.com/api/v2/tasks/abc-123"
        );
    }

    #[test]
    fn test_create_request_body() {
        let body = serde_json::to_value(CreateTaskRequest { task: "Navigate to x" }).unwrap();
        assert_eq!(body, serde_json::json!({"task": "Navigate to x"}));
    }
}
