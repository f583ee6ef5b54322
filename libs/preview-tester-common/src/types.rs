use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single test case produced by the planning step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub title: String,
    pub description: String,
}

/// Result of the upstream test-plan step
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestPlan {
    pub needs_testing: bool,
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
}

/// Output of the preview-environment step
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewEnvironment {
    pub preview_url: String,
}

/// Everything the execute-tests step receives from the workflow runtime.
///
/// `test_plan` is `None` when the planning step never produced a result,
/// which is a wiring error and aborts the step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepInput {
    #[serde(flatten)]
    pub preview: PreviewEnvironment,
    #[serde(default)]
    pub test_plan: Option<TestPlan>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Success,
    Fail,
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestStatus::Success => write!(f, "success"),
            TestStatus::Fail => write!(f, "fail"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestExecutionResult {
    pub title: String,
    pub status: TestStatus,
}

impl TestExecutionResult {
    pub fn fail(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            status: TestStatus::Fail,
        }
    }
}

/// Output handed back to the pipeline orchestrator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestExecutionOutput {
    pub needs_testing: bool,
    pub test_cases: Vec<TestExecutionResult>,
}

impl TestExecutionOutput {
    /// Output for a plan that needs no testing
    pub fn skipped() -> Self {
        Self {
            needs_testing: false,
            test_cases: Vec::new(),
        }
    }
}

/// Lifecycle status reported by the remote task service.
///
/// Anything the service sends that we do not recognize is kept verbatim in
/// `Unknown` so it can be reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    Created,
    Started,
    Paused,
    Finished,
    Stopped,
    Unknown(String),
}

/// Coarse classification of a [`TaskStatus`] for the poll loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskPhase {
    InProgress,
    Terminal,
    Unrecognized,
}

impl TaskStatus {
    pub fn phase(&self) -> TaskPhase {
        match self {
            TaskStatus::Created | TaskStatus::Started | TaskStatus::Paused => TaskPhase::InProgress,
            TaskStatus::Finished | TaskStatus::Stopped => TaskPhase::Terminal,
            TaskStatus::Unknown(_) => TaskPhase::Unrecognized,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Created => "created",
            TaskStatus::Started => "started",
            TaskStatus::Paused => "paused",
            TaskStatus::Finished => "finished",
            TaskStatus::Stopped => "stopped",
            TaskStatus::Unknown(raw) => raw,
        }
    }
}

impl From<String> for TaskStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "created" => TaskStatus::Created,
            "started" => TaskStatus::Started,
            "paused" => TaskStatus::Paused,
            "finished" => TaskStatus::Finished,
            "stopped" => TaskStatus::Stopped,
            _ => TaskStatus::Unknown(raw),
        }
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response to a create-task request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedTask {
    pub id: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Snapshot of a remote task as returned by get-task
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    pub id: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub is_success: Option<bool>,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
}
