use std::{
    io,
    path::{Path, PathBuf},
};

use tokio::fs;
use tracing::{debug, info, warn};

use super::ReadinessCheck;

/// One look at the testnet's config file.
#[derive(Debug)]
pub enum ConfigObservation {
    Missing,
    Unreadable(io::Error),
    Empty,
    Populated(String),
}

impl ConfigObservation {
    pub async fn observe(path: &Path) -> Self {
        match fs::read_to_string(path).await {
            Ok(contents) if contents.is_empty() => Self::Empty,
            Ok(contents) => Self::Populated(contents),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Self::Missing,
            Err(err) => Self::Unreadable(err),
        }
    }

    #[must_use]
    pub const fn is_populated(&self) -> bool {
        matches!(self, Self::Populated(_))
    }
}

/// The testnet counts as live once it has written a non-empty config.
pub struct ConfigFileReadiness {
    path: PathBuf,
}

impl ConfigFileReadiness {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl ReadinessCheck for ConfigFileReadiness {
    type Data = ConfigObservation;

    async fn collect(&self) -> ConfigObservation {
        ConfigObservation::observe(&self.path).await
    }

    fn is_ready(&self, data: &ConfigObservation) -> bool {
        data.is_populated()
    }

    fn report(&self, attempt: u32, data: &ConfigObservation) {
        let path = self.path.display();
        match data {
            ConfigObservation::Missing => {
                info!(attempt, %path, "testnet does not have config yet, probably not live");
            }
            ConfigObservation::Unreadable(error) => {
                warn!(attempt, %path, %error, "testnet config unreadable, probably not live");
            }
            ConfigObservation::Empty => {
                info!(attempt, %path, "testnet does not have valid config yet, still booting");
            }
            ConfigObservation::Populated(contents) => {
                info!(attempt, %path, bytes = contents.len(), "testnet has valid config now");
                debug!(config = %contents, "testnet config contents");
            }
        }
    }
}
