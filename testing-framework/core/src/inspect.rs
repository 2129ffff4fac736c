//! Read-only inspection of the testnet config once the testnet is down.

use std::{
    fs::OpenOptions,
    io::{self, Read as _},
    path::Path,
};

use serde::Deserialize;
use serde_yaml::Value;
use tracing::{info, warn};

/// The `indexer_grpc` section, read leniently.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IndexerGrpcView {
    pub enabled: bool,
    pub address: Option<String>,
}

#[derive(Debug)]
pub struct NodeConfigView {
    pub raw: Value,
    pub indexer_grpc: Option<IndexerGrpcView>,
}

impl NodeConfigView {
    fn from_value(raw: Value) -> Self {
        let indexer_grpc = raw
            .get("indexer_grpc")
            .and_then(|section| serde_yaml::from_value(section.clone()).ok());
        Self { raw, indexer_grpc }
    }
}

#[derive(Debug)]
pub enum ConfigInspection {
    Missing,
    Unreadable(io::Error),
    Empty,
    Parsed(NodeConfigView),
    Malformed(serde_yaml::Error),
}

impl ConfigInspection {
    #[must_use]
    pub const fn view(&self) -> Option<&NodeConfigView> {
        match self {
            Self::Parsed(view) => Some(view),
            _ => None,
        }
    }
}

/// Open `path` for reading only, parse it as YAML and log what was found.
/// Every outcome, including a parse error, is returned rather than raised.
pub fn inspect_node_config(path: &Path) -> ConfigInspection {
    let inspection = read_and_parse(path);
    log_inspection(path, &inspection);
    inspection
}

fn read_and_parse(path: &Path) -> ConfigInspection {
    let mut contents = String::new();
    let read = OpenOptions::new()
        .read(true)
        .open(path)
        .and_then(|mut file| file.read_to_string(&mut contents));

    match read {
        Err(err) if err.kind() == io::ErrorKind::NotFound => ConfigInspection::Missing,
        Err(err) => ConfigInspection::Unreadable(err),
        Ok(_) if contents.is_empty() => ConfigInspection::Empty,
        Ok(_) => match serde_yaml::from_str::<Value>(&contents) {
            Ok(value) => ConfigInspection::Parsed(NodeConfigView::from_value(value)),
            Err(err) => ConfigInspection::Malformed(err),
        },
    }
}

fn log_inspection(path: &Path, inspection: &ConfigInspection) {
    let path = path.display();
    match inspection {
        ConfigInspection::Missing => warn!(%path, "testnet config was never written"),
        ConfigInspection::Unreadable(error) => {
            warn!(%path, %error, "failed to read testnet config")
        }
        ConfigInspection::Empty => warn!(%path, "testnet config is empty"),
        ConfigInspection::Parsed(view) => {
            info!(%path, config = ?view.raw, "parsed testnet config");
            if let Some(indexer) = &view.indexer_grpc {
                info!(
                    enabled = indexer.enabled,
                    address = indexer.address.as_deref().unwrap_or("<unset>"),
                    "indexer grpc settings"
                );
            }
        }
        ConfigInspection::Malformed(error) => {
            warn!(%path, %error, "testnet config is not valid YAML")
        }
    }
}
