mod engine;
mod evaluator;
mod executor;


use anyhow::{Context, Result};
use preview_tester_common::config::ServiceConfig;
use preview_tester_common::types::StepInput;
use tokio::io::AsyncReadExt;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    info!("Preview tester booting...");

    // Credential and timings are read once here and injected from then on
    let config = ServiceConfig::from_env()
        .map_err(|e| {
            error!("Failed to load service configuration: {}", e);
            e
        })?;

    info!(
        base_url = %config.base_url,
        poll_interval_ms = config.poll_interval.as_millis() as u64,
        max_poll_time_ms = config.max_poll_time.as_millis() as u64,
        "Service configuration loaded"
    );

    let input = read_step_input().await?;

    let shutdown = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
        warn!("Received shutdown signal, abandoning step");
    };

    let output = tokio::select! {
        result = executor::run_step(&config, &input) => result?,
        _ = shutdown => anyhow::bail!("Step interrupted before completion"),
    };

    let rendered = serde_json::to_string_pretty(&output).context("Failed to serialize step output")?;
    println!("{}", rendered);

    info!("Step complete");
    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // stdout carries the step output, so logs go to stderr
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_thread_ids(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(true)
            .with_line_number(true)
            .init();
    }
}

/// Step input comes from STEP_INPUT_PATH when set, stdin otherwise
async fn read_step_input() -> Result<StepInput> {
    let raw = match std::env::var("STEP_INPUT_PATH") {
        Ok(path) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read step input from {}", path))?,
        Err(_) => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("Failed to read step input from stdin")?;
            buf
        }
    };

    serde_json::from_str(&raw).context("Failed to parse step input")
}
