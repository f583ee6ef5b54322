/// Step Executor - High-Level Orchestration
///
/// **Responsibility:**
/// Run the execute-tests step: check the upstream plan, fan the test cases
/// out to the remote engine, and aggregate what comes back.
///
/// **Architecture:**
/// 1. RemoteTaskEngine submits and polls one task per test case (engine.rs)
/// 2. Evaluator maps each outcome to success/fail (evaluator.rs)
/// 3. All test cases run concurrently and are joined before returning
///
/// Only a missing test plan escapes as an error. Everything that goes wrong
/// for an individual test case is reported as a `fail` result.

use crate::engine::RemoteTaskEngine;
use crate::evaluator;
use anyhow::{Context, Result};
use futures_util::future::join_all;
use preview_tester_common::browser_use::{BrowserUseClient, TaskService};
use preview_tester_common::config::ServiceConfig;
use preview_tester_common::types::{StepInput, TestCase, TestExecutionOutput};
use thiserror::Error;
use tracing::{info, Instrument};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StepError {
    #[error("Test plan step result not found")]
    MissingTestPlan,
}

/// Execute every test case against the preview environment.
///
/// Returns immediately without touching the service when `needs_testing` is
/// false. Otherwise the output holds exactly one result per test case.
pub async fn execute<S: TaskService>(
    engine: &RemoteTaskEngine<S>,
    preview_url: &str,
    test_cases: &[TestCase],
    needs_testing: bool,
) -> TestExecutionOutput {
    if !needs_testing {
        info!("Test plan does not require testing; skipping execution");
        return TestExecutionOutput::skipped();
    }

    info!(
        preview_url = %preview_url,
        test_count = test_cases.len(),
        "Dispatching test cases"
    );

    let runs = test_cases.iter().map(|test_case| async move {
        let outcome = engine.run_test_case(preview_url, test_case).await;
        evaluator::evaluate_outcome(test_case, outcome)
    });

    let results = join_all(runs).await;

    evaluator::aggregate_results(results)
}

/// Execute the step from the record handed over by the workflow runtime
pub async fn execute_step<S: TaskService>(
    engine: &RemoteTaskEngine<S>,
    input: &StepInput,
) -> Result<TestExecutionOutput, StepError> {
    let plan = input.test_plan.as_ref().ok_or(StepError::MissingTestPlan)?;

    Ok(execute(
        engine,
        &input.preview.preview_url,
        &plan.test_cases,
        plan.needs_testing,
    )
    .await)
}

/// Production path: Browser Use client built from the injected config
pub async fn run_step(config: &ServiceConfig, input: &StepInput) -> Result<TestExecutionOutput> {
    let run_id = Uuid::new_v4();
    let span = tracing::info_span!("execute_tests", run_id = %run_id);

    async {
        let client = BrowserUseClient::new(config).context("Failed to build task service client")?;
        info!(base_url = %client.base_url(), "Task service client ready");

        let engine = RemoteTaskEngine::with_config(client, config);
        let output = execute_step(&engine, input).await?;
        Ok(output)
    }
    .instrument(span)
    .await
}
