use nix::{
    errno::Errno,
    sys::signal::{Signal, killpg},
    unistd::{Pid, getpgid, getpgrp},
};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum TerminationError {
    #[error("refusing to signal process group {pgid}: it is the harness's own group")]
    OwnGroup { pgid: Pid },
    #[error("refusing to signal invalid process group {pgid}")]
    InvalidGroup { pgid: Pid },
    #[error("failed to resolve process group of pid {pid}: {source}")]
    ResolveGroup {
        pid: Pid,
        #[source]
        source: Errno,
    },
    #[error("failed to check liveness of process group {pgid}: {source}")]
    Liveness {
        pgid: Pid,
        #[source]
        source: Errno,
    },
    #[error("failed to send {signal:?} to process group {pgid}: {source}")]
    Signal {
        pgid: Pid,
        signal: Signal,
        #[source]
        source: Errno,
    },
}

/// Result of delivering a signal to a process group.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GroupSignal {
    Delivered,
    /// No process is left in the group.
    GroupGone,
}

/// Send `signal` to every process in `pgid`. A group that no longer exists
/// is reported as [`GroupSignal::GroupGone`], not as an error.
pub fn signal_process_group(pgid: Pid, signal: Signal) -> Result<GroupSignal, TerminationError> {
    ensure_foreign_group(pgid)?;

    match killpg(pgid, signal) {
        Ok(()) => {
            debug!(%pgid, ?signal, "signalled process group");
            Ok(GroupSignal::Delivered)
        }
        Err(Errno::ESRCH) => {
            debug!(%pgid, ?signal, "process group already gone");
            Ok(GroupSignal::GroupGone)
        }
        Err(source) => Err(TerminationError::Signal {
            pgid,
            signal,
            source,
        }),
    }
}

/// Whether any process, zombies included, still belongs to `pgid`.
pub fn group_alive(pgid: Pid) -> Result<bool, TerminationError> {
    ensure_foreign_group(pgid)?;

    match killpg(pgid, None::<Signal>) {
        Ok(()) => Ok(true),
        Err(Errno::ESRCH) => Ok(false),
        Err(source) => Err(TerminationError::Liveness { pgid, source }),
    }
}

fn ensure_foreign_group(pgid: Pid) -> Result<(), TerminationError> {
    // killpg(0) and killpg(1) would hit the caller's group / init.
    if pgid.as_raw() <= 1 {
        return Err(TerminationError::InvalidGroup { pgid });
    }
    if pgid == getpgrp() {
        return Err(TerminationError::OwnGroup { pgid });
    }
    Ok(())
}

/// Process group of `pid`, or `None` when the pid no longer exists.
pub fn process_group_of(pid: Pid) -> Result<Option<Pid>, TerminationError> {
    match getpgid(Some(pid)) {
        Ok(pgid) => Ok(Some(pgid)),
        Err(Errno::ESRCH) => Ok(None),
        Err(source) => Err(TerminationError::ResolveGroup { pid, source }),
    }
}

/// Resolve the process group of `pid` and SIGTERM the whole group.
pub fn terminate_process_group(pid: Pid) -> Result<GroupSignal, TerminationError> {
    match process_group_of(pid)? {
        Some(pgid) => signal_process_group(pgid, Signal::SIGTERM),
        None => {
            debug!(%pid, "process already exited before termination");
            Ok(GroupSignal::GroupGone)
        }
    }
}
