/// Test Evaluator - Pass/Fail Rules
///
/// **Core Responsibility:**
/// Turn what the engine observed for each test case into a `TestStatus` and
/// aggregate the step output.
///
/// **Rules:**
/// - success iff the terminal task reports `isSuccess == true`, whether it
///   finished or was stopped
/// - a `null`/`false` success flag, a timeout, an unknown status or any
///   service error is a fail
/// - every test case yields exactly one result, errors included
///
/// Knows nothing about HTTP or polling.

use crate::engine::EngineError;
use preview_tester_common::types::{
    TaskView, TestCase, TestExecutionOutput, TestExecutionResult, TestStatus,
};
use tracing::{error, info};

/// Status for a task that reached a terminal state
pub fn evaluate_task(task: &TaskView) -> TestStatus {
    if task.is_success == Some(true) {
        TestStatus::Success
    } else {
        TestStatus::Fail
    }
}

/// Collapse one test case's engine outcome into its result record
pub fn evaluate_outcome(
    test_case: &TestCase,
    outcome: Result<TaskView, EngineError>,
) -> TestExecutionResult {
    match outcome {
        Ok(task) => {
            let status = evaluate_task(&task);
            if status == TestStatus::Fail {
                info!(
                    title = %test_case.title,
                    task_id = %task.id,
                    task_status = %task.status,
                    is_success = ?task.is_success,
                    "Test case did not pass"
                );
            }
            TestExecutionResult {
                title: test_case.title.clone(),
                status,
            }
        }
        Err(e) => {
            error!(title = %test_case.title, error = %e, "Test case failed");
            TestExecutionResult::fail(test_case.title.clone())
        }
    }
}

/// Build the step output from per-test-case results
pub fn aggregate_results(results: Vec<TestExecutionResult>) -> TestExecutionOutput {
    let passed = results
        .iter()
        .filter(|r| r.status == TestStatus::Success)
        .count();

    info!(
        total = results.len(),
        passed = passed,
        failed = results.len() - passed,
        "Test execution complete"
    );

    TestExecutionOutput {
        needs_testing: true,
        test_cases: results,
    }
}
