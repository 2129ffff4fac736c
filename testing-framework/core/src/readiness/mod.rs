mod config_file;

use std::time::Duration;

pub use config_file::{ConfigFileReadiness, ConfigObservation};
use tokio::time::sleep;
use tracing::{debug, info};

use crate::constants::{DEFAULT_POLL_ATTEMPTS, DEFAULT_POLL_INTERVAL};

/// Fixed-budget polling: one sleep of `interval` before each of at most
/// `max_attempts` observations. No backoff.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ReadinessPoll {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for ReadinessPoll {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL, DEFAULT_POLL_ATTEMPTS)
    }
}

impl ReadinessPoll {
    #[must_use]
    pub const fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    /// Longest the poll can block for.
    #[must_use]
    pub fn budget(&self) -> Duration {
        self.interval.saturating_mul(self.max_attempts)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PollState {
    Waiting { attempt: u32 },
    Ready { attempt: u32 },
    TimedOut { attempts: u32 },
}

impl PollState {
    #[must_use]
    pub const fn start(poll: &ReadinessPoll) -> Self {
        if poll.max_attempts == 0 {
            Self::TimedOut { attempts: 0 }
        } else {
            Self::Waiting { attempt: 1 }
        }
    }

    /// Fold the observation made on the current attempt into the next state.
    /// Terminal states are absorbing.
    #[must_use]
    pub const fn advance(self, ready: bool, poll: &ReadinessPoll) -> Self {
        match self {
            Self::Waiting { attempt } if ready => Self::Ready { attempt },
            Self::Waiting { attempt } if attempt >= poll.max_attempts => {
                Self::TimedOut { attempts: attempt }
            }
            Self::Waiting { attempt } => Self::Waiting {
                attempt: attempt + 1,
            },
            terminal => terminal,
        }
    }
}

/// Terminal result of a readiness poll. Timing out is not an error: the
/// caller decides what to do with a testnet that never came up.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PollOutcome {
    Ready { attempts: u32 },
    TimedOut { attempts: u32 },
}

impl PollOutcome {
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    #[must_use]
    pub const fn attempts(&self) -> u32 {
        match self {
            Self::Ready { attempts } | Self::TimedOut { attempts } => *attempts,
        }
    }
}

#[async_trait::async_trait]
pub trait ReadinessCheck: Send + Sync {
    type Data: Send;

    async fn collect(&self) -> Self::Data;

    fn is_ready(&self, data: &Self::Data) -> bool;

    /// Emit the diagnostic for one attempt. Called exactly once per attempt.
    fn report(&self, attempt: u32, data: &Self::Data);

    async fn wait(&self, poll: ReadinessPoll) -> PollOutcome {
        info!(
            interval_secs = poll.interval.as_secs_f32(),
            max_attempts = poll.max_attempts,
            "waiting for readiness"
        );

        let mut state = PollState::start(&poll);
        loop {
            match state {
                PollState::Waiting { attempt } => {
                    sleep(poll.interval).await;
                    let data = self.collect().await;
                    let ready = self.is_ready(&data);
                    self.report(attempt, &data);
                    state = state.advance(ready, &poll);
                }
                PollState::Ready { attempt } => {
                    debug!(attempt, "readiness confirmed");
                    return PollOutcome::Ready { attempts: attempt };
                }
                PollState::TimedOut { attempts } => {
                    info!(
                        attempts,
                        budget_secs = poll.budget().as_secs_f32(),
                        "gave up waiting for readiness"
                    );
                    return PollOutcome::TimedOut { attempts };
                }
            }
        }
    }
}
