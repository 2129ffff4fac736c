use std::{env, path::PathBuf};

#[must_use]
pub fn aptos_node_bin() -> Option<PathBuf> {
    env::var_os("APTOS_NODE_BIN").map(PathBuf::from)
}

#[must_use]
pub fn testnet_data_dir() -> Option<PathBuf> {
    env::var_os("TESTNET_DATA_DIR").map(PathBuf::from)
}

#[must_use]
pub fn testnet_rest_api_addr() -> Option<String> {
    env::var("TESTNET_REST_API_ADDR").ok()
}

#[must_use]
pub fn testnet_poll_interval_secs() -> Option<u64> {
    env::var("TESTNET_POLL_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
}

#[must_use]
pub fn testnet_poll_attempts() -> Option<u32> {
    env::var("TESTNET_POLL_ATTEMPTS")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
}

#[must_use]
pub fn testnet_shutdown_grace_secs() -> Option<u64> {
    env::var("TESTNET_SHUTDOWN_GRACE_SECS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
}

/// File that receives the testnet's stdout instead of an unread pipe.
#[must_use]
pub fn testnet_stdout_log() -> Option<PathBuf> {
    env::var_os("TESTNET_STDOUT_LOG").map(PathBuf::from)
}

#[must_use]
pub fn rust_log() -> Option<String> {
    env::var("RUST_LOG").ok()
}
