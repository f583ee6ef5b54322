/// Remote Execution Engine - Submit and Poll
///
/// **Core Responsibility:**
/// Hand one test case to the remote browser-automation service and wait until
/// the service reports a terminal status.
///
/// **Boundary:**
/// - Engine knows HOW to talk to the task service (submit, poll, deadline)
/// - Engine does NOT decide pass/fail, that is the evaluator's job
/// - Engine returns the terminal task snapshot or an `EngineError`

use preview_tester_common::browser_use::TaskService;
use preview_tester_common::config::ServiceConfig;
use preview_tester_common::error::ServiceError;
use preview_tester_common::types::{TaskPhase, TaskStatus, TaskView, TestCase};
use std::time::Duration;
use thiserror::Error;
use tokio::time::{sleep, Instant};
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to submit task: {0}")]
    Submit(#[source] ServiceError),

    #[error("failed to poll task {task_id}: {source}")]
    Poll {
        task_id: String,
        #[source]
        source: ServiceError,
    },

    #[error("Task {task_id} timed out after {seconds} seconds")]
    TimedOut { task_id: String, seconds: f64 },

    #[error("Task {task_id} reported unrecognized status {status:?}")]
    UnknownStatus { task_id: String, status: String },
}

/// Free-text instruction handed to the browser agent
pub fn task_prompt(preview_url: &str, test_case: &TestCase) -> String {
    format!(
        "Navigate to {} and execute this test case: {}. {}",
        preview_url, test_case.title, test_case.description
    )
}

/// Submit/poll engine over any [`TaskService`].
///
/// The service is borrowed read-only, so one engine (and one client holding
/// the credential) serves every concurrent test case.
pub struct RemoteTaskEngine<S> {
    service: S,
    poll_interval: Duration,
    max_poll_time: Duration,
}

impl<S: TaskService> RemoteTaskEngine<S> {
    pub fn new(service: S, poll_interval: Duration, max_poll_time: Duration) -> Self {
        Self {
            service,
            poll_interval,
            max_poll_time,
        }
    }

    pub fn with_config(service: S, config: &ServiceConfig) -> Self {
        Self::new(service, config.poll_interval, config.max_poll_time)
    }

    #[cfg(test)]
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Submit one test case and wait for its task to reach a terminal status
    #[tracing::instrument(skip(self, test_case), fields(title = %test_case.title))]
    pub async fn run_test_case(
        &self,
        preview_url: &str,
        test_case: &TestCase,
    ) -> Result<TaskView, EngineError> {
        let created = self
            .service
            .create_task(&task_prompt(preview_url, test_case))
            .await
            .map_err(EngineError::Submit)?;

        debug!(task_id = %created.id, "Task submitted");

        self.wait_for_completion(&created.id).await
    }

    /// Poll a task until it is finished or stopped.
    ///
    /// The deadline starts when polling begins, right after submission.
    /// Unrecognized statuses end the wait immediately instead of running out
    /// the clock.
    pub async fn wait_for_completion(&self, task_id: &str) -> Result<TaskView, EngineError> {
        let started = Instant::now();
        let mut polls: u32 = 0;

        loop {
            let task = self
                .service
                .get_task(task_id)
                .await
                .map_err(|source| EngineError::Poll {
                    task_id: task_id.to_string(),
                    source,
                })?;
            polls += 1;

            match task.status.phase() {
                TaskPhase::Terminal => {
                    info!(
                        task_id = %task_id,
                        status = %task.status,
                        polls = polls,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Task completed"
                    );
                    return Ok(task);
                }
                TaskPhase::Unrecognized => {
                    return Err(EngineError::UnknownStatus {
                        task_id: task_id.to_string(),
                        status: task.status.to_string(),
                    });
                }
                TaskPhase::InProgress => {}
            }

            if started.elapsed() > self.max_poll_time {
                return Err(EngineError::TimedOut {
                    task_id: task_id.to_string(),
                    seconds: self.max_poll_time.as_secs_f64(),
                });
            }

            if task.status == TaskStatus::Paused {
                debug!(task_id = %task_id, "Task paused, still waiting");
            }

            sleep(self.poll_interval).await;
        }
    }
}
