use std::process;

use anyhow::{Context as _, Result};
use testnet_harness_core::{
    HarnessConfig, HarnessReport, inspect::ConfigInspection, nodes::StopOutcome,
    readiness::PollOutcome, run_local_testnet,
};
use tracing::{info, warn};

#[tokio::main]
async fn main() {
    testnet_harness_runner::defaults::init_tracing();

    let config = HarnessConfig::from_env();

    info!(
        binary = %config.binary.display(),
        data_dir = %config.data_dir.display(),
        poll_interval_secs = config.poll.interval.as_secs(),
        max_attempts = config.poll.max_attempts,
        "starting local indexer grpc testnet"
    );

    if let Err(err) = run(&config).await {
        warn!("local indexer grpc testnet failed: {err:#}");
        process::exit(1);
    }
}

async fn run(config: &HarnessConfig) -> Result<()> {
    let report = run_local_testnet(config)
        .await
        .context("running local testnet failed")?;

    summarize(&report);
    Ok(())
}

fn summarize(report: &HarnessReport) {
    let readiness = match report.readiness {
        PollOutcome::Ready { .. } => "ready",
        PollOutcome::TimedOut { .. } => "timed out",
    };
    let stop = match report.stop {
        StopOutcome::Terminated(_) => "terminated",
        StopOutcome::Killed(_) => "killed",
        StopOutcome::AlreadyExited(_) => "already exited",
    };
    let config = match &report.inspection {
        ConfigInspection::Missing => "missing",
        ConfigInspection::Unreadable(_) => "unreadable",
        ConfigInspection::Empty => "empty",
        ConfigInspection::Parsed(_) => "parsed",
        ConfigInspection::Malformed(_) => "malformed",
    };

    info!(
        pid = %report.pid,
        pgid = %report.pgid,
        readiness,
        attempts = report.readiness.attempts(),
        stop,
        config,
        "local testnet run complete"
    );
}
