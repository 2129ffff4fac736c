use nix::unistd::Pid;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    config::HarnessConfig,
    inspect::{ConfigInspection, inspect_node_config},
    nodes::{
        SpawnTestnetError, StopOutcome, TestnetProcess,
        common::lifecycle::kill::TerminationError,
    },
    readiness::{ConfigFileReadiness, PollOutcome, ReadinessCheck as _},
};

/// Failures that abort a harness run. Readiness timeouts and config parse
/// errors are reported in [`HarnessReport`] instead.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("failed to start testnet: {source}")]
    Start {
        #[source]
        source: SpawnTestnetError,
    },
    #[error("failed to stop testnet: {source}")]
    Stop {
        #[source]
        source: TerminationError,
    },
}

#[derive(Debug)]
pub struct HarnessReport {
    pub pid: Pid,
    pub pgid: Pid,
    pub readiness: PollOutcome,
    pub stop: StopOutcome,
    pub inspection: ConfigInspection,
}

/// Spawn the testnet, wait for its config, tear the process group down and
/// inspect whatever config it left behind, strictly in that order.
pub async fn run_local_testnet(config: &HarnessConfig) -> Result<HarnessReport, HarnessError> {
    info!(
        binary = %config.binary.display(),
        data_dir = %config.data_dir.display(),
        "starting local testnet"
    );
    let mut testnet =
        TestnetProcess::spawn(config).map_err(|source| HarnessError::Start { source })?;

    let readiness = ConfigFileReadiness::new(testnet.config_path())
        .wait(config.poll)
        .await;
    match readiness {
        PollOutcome::Ready { attempts } => info!(
            attempts,
            rest_api = %config.rest_api_addr,
            "testnet is live"
        ),
        PollOutcome::TimedOut { attempts } => warn!(
            attempts,
            "testnet did not write its config in time, tearing it down anyway"
        ),
    }

    let stop = testnet
        .stop(config.shutdown_grace)
        .await
        .map_err(|source| HarnessError::Stop { source })?;

    let inspection = inspect_node_config(testnet.config_path());

    Ok(HarnessReport {
        pid: testnet.pid(),
        pgid: testnet.pgid(),
        readiness,
        stop,
        inspection,
    })
}
