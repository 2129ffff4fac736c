use std::{
    io,
    path::{Path, PathBuf},
    process::{Child, ExitStatus},
    time::{Duration, Instant},
};

use nix::{sys::signal::Signal, unistd::Pid};
use tracing::{debug, info, warn};

use crate::{
    config::HarnessConfig,
    nodes::common::lifecycle::{
        kill::{GroupSignal, TerminationError, process_group_of, signal_process_group},
        monitor::{is_running, wait_for_exit, wait_for_group_exit},
        spawn::testnet_command,
    },
};

#[derive(Debug, thiserror::Error)]
pub enum SpawnTestnetError {
    #[error("failed to prepare testnet stdout capture: {source}")]
    Stdout {
        #[source]
        source: io::Error,
    },
    #[error("failed to spawn testnet process '{binary}': {source}")]
    Spawn {
        binary: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// How the testnet went away when [`TestnetProcess::stop`] ran.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StopOutcome {
    /// Exited after SIGTERM within the grace period.
    Terminated(ExitStatus),
    /// Needed SIGKILL, for the testnet itself or for a process left in its
    /// group. `None` if the testnet could not be reaped.
    Killed(Option<ExitStatus>),
    /// Nothing was left to signal.
    AlreadyExited(Option<ExitStatus>),
}

/// The single spawned testnet, with the process group captured at spawn
/// time.
pub struct TestnetProcess {
    child: Child,
    pid: Pid,
    pgid: Pid,
    config_path: PathBuf,
    exit: Option<Option<ExitStatus>>,
}

impl Drop for TestnetProcess {
    fn drop(&mut self) {
        if self.exit.is_some() {
            return;
        }

        debug!(pgid = %self.pgid, "stopping testnet process group on drop");
        if let Err(error) = signal_process_group(self.pgid, Signal::SIGKILL) {
            debug!(%error, "failed to kill testnet process group on drop");
            return;
        }
        if let Err(error) = self.child.wait() {
            debug!(%error, "failed to reap testnet process on drop");
        }
    }
}

impl TestnetProcess {
    pub fn spawn(config: &HarnessConfig) -> Result<Self, SpawnTestnetError> {
        let mut command = testnet_command(&config.binary, &config.data_dir, &config.stdout)
            .map_err(|source| SpawnTestnetError::Stdout { source })?;

        debug!(
            binary = %config.binary.display(),
            data_dir = %config.data_dir.display(),
            "spawning testnet process"
        );

        let child = command.spawn().map_err(|source| SpawnTestnetError::Spawn {
            binary: config.binary.clone(),
            source,
        })?;

        let pid = Pid::from_raw(child.id() as i32);
        // The child leads its own group, so its pid is the group id even if
        // the lookup races with an early exit.
        let pgid = match process_group_of(pid) {
            Ok(Some(pgid)) => pgid,
            Ok(None) => pid,
            Err(error) => {
                debug!(%pid, %error, "falling back to pid as process group");
                pid
            }
        };

        info!(%pid, %pgid, "testnet spawned");

        Ok(Self {
            child,
            pid,
            pgid,
            config_path: config.node_config_path(),
            exit: None,
        })
    }

    #[must_use]
    pub const fn pid(&self) -> Pid {
        self.pid
    }

    #[must_use]
    pub const fn pgid(&self) -> Pid {
        self.pgid
    }

    #[must_use]
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Check if the testnet process is still running
    pub fn is_running(&mut self) -> bool {
        self.exit.is_none() && is_running(&mut self.child)
    }

    /// SIGTERM the process group and wait up to `grace` for the testnet and
    /// everything else in its group to exit. Whatever is left gets SIGKILL.
    pub async fn stop(&mut self, grace: Duration) -> Result<StopOutcome, TerminationError> {
        if let Some(status) = self.exit {
            return Ok(StopOutcome::AlreadyExited(status));
        }

        info!(pid = %self.pid, pgid = %self.pgid, "terminating testnet process group");

        if signal_process_group(self.pgid, Signal::SIGTERM)? == GroupSignal::GroupGone {
            let status = self.child.try_wait().ok().flatten();
            self.exit = Some(status);
            info!(?status, "testnet had already exited");
            return Ok(StopOutcome::AlreadyExited(status));
        }

        let started = Instant::now();
        if let Some(status) = wait_for_exit(&mut self.child, grace).await {
            self.exit = Some(Some(status));
            let remaining = grace.saturating_sub(started.elapsed());
            if wait_for_group_exit(self.pgid, remaining).await? {
                info!(%status, "testnet terminated");
                return Ok(StopOutcome::Terminated(status));
            }

            warn!(
                pgid = %self.pgid,
                %status,
                "testnet exited but its process group survived SIGTERM, sending SIGKILL"
            );
            signal_process_group(self.pgid, Signal::SIGKILL)?;
            return Ok(StopOutcome::Killed(Some(status)));
        }

        warn!(
            pgid = %self.pgid,
            grace_secs = grace.as_secs_f32(),
            "testnet ignored SIGTERM, sending SIGKILL"
        );
        signal_process_group(self.pgid, Signal::SIGKILL)?;

        // SIGKILL cannot be ignored, so this returns promptly.
        let status = self.child.wait().ok();
        self.exit = Some(status);
        info!(?status, "testnet killed");
        Ok(StopOutcome::Killed(status))
    }
}
