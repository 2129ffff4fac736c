use std::time::Duration;

/// Data directory handed to the testnet via `--test-dir`.
pub const DEFAULT_TESTNET_DATA_DIR: &str = "./test_indexer_grpc_testnet";

/// Fallback testnet binary when neither the env override nor `PATH` resolve.
pub const DEFAULT_NODE_BIN_PATH: &str = "./target/debug/aptos-node";

/// Binary name looked up on `PATH`.
pub const NODE_BINARY_NAME: &str = "aptos-node";

/// REST API the single-node testnet serves once live.
pub const DEFAULT_REST_API_ADDR: &str = "http://localhost:8080";

/// Node index directory the testnet writes its config under.
pub const NODE_CONFIG_SUBDIR: &str = "0";

pub const NODE_CONFIG_FILENAME: &str = "node.yaml";

pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

pub const DEFAULT_POLL_ATTEMPTS: u32 = 6;

/// Time given to the testnet to exit after SIGTERM before SIGKILL.
pub const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 5;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS);

pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(DEFAULT_SHUTDOWN_GRACE_SECS);
