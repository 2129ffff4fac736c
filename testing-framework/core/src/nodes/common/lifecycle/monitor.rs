use std::{
    process::{Child, ExitStatus},
    time::Duration,
};

use nix::unistd::Pid;
use tokio::time;

use super::kill::{TerminationError, group_alive};

const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// True while the child has not exited. Reaps it once it has.
pub fn is_running(child: &mut Child) -> bool {
    matches!(child.try_wait(), Ok(None))
}

/// Poll (and reap) the child until it exits or `timeout` elapses.
pub async fn wait_for_exit(child: &mut Child, timeout: Duration) -> Option<ExitStatus> {
    time::timeout(timeout, async {
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Some(status),
                Ok(None) => time::sleep(EXIT_POLL_INTERVAL).await,
                Err(_) => return None,
            }
        }
    })
    .await
    .ok()
    .flatten()
}

/// Poll until no process is left in `pgid`. Returns `false` if some member
/// outlived `timeout`.
pub async fn wait_for_group_exit(pgid: Pid, timeout: Duration) -> Result<bool, TerminationError> {
    let deadline = time::Instant::now() + timeout;
    loop {
        if !group_alive(pgid)? {
            return Ok(true);
        }
        if time::Instant::now() >= deadline {
            return Ok(false);
        }
        time::sleep(EXIT_POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use std::{os::unix::process::CommandExt as _, process::Command};

    use super::*;

    #[tokio::test]
    async fn reports_exit_of_short_lived_child() {
        let mut child = Command::new("true").spawn().expect("spawn true");

        let status = wait_for_exit(&mut child, Duration::from_secs(5)).await;

        assert!(status.is_some_and(|s| s.success()));
        assert!(!is_running(&mut child));
    }

    #[tokio::test]
    async fn gives_up_on_long_running_child() {
        let mut child = Command::new("sleep").arg("30").spawn().expect("spawn sleep");

        assert!(is_running(&mut child));
        assert!(
            wait_for_exit(&mut child, Duration::from_millis(200))
                .await
                .is_none()
        );

        child.kill().expect("kill");
        child.wait().expect("wait");
    }

    #[tokio::test]
    async fn group_exit_waits_for_every_member() {
        let mut child = Command::new("sleep")
            .arg("30")
            .process_group(0)
            .spawn()
            .expect("spawn sleep");
        let pgid = Pid::from_raw(child.id() as i32);

        assert!(
            !wait_for_group_exit(pgid, Duration::from_millis(200))
                .await
                .expect("group liveness")
        );

        child.kill().expect("kill");
        child.wait().expect("wait");
        assert!(
            wait_for_group_exit(pgid, Duration::from_millis(200))
                .await
                .expect("group liveness")
        );
    }
}
