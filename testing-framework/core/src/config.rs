use std::{path::PathBuf, time::Duration};

use testnet_harness_env as tf_env;

use crate::{
    constants::{
        DEFAULT_NODE_BIN_PATH, DEFAULT_POLL_ATTEMPTS, DEFAULT_POLL_INTERVAL_SECS,
        DEFAULT_REST_API_ADDR, DEFAULT_SHUTDOWN_GRACE, DEFAULT_SHUTDOWN_GRACE_SECS,
        DEFAULT_TESTNET_DATA_DIR, NODE_BINARY_NAME,
    },
    nodes::common::{
        binary::{BinaryConfig, BinaryResolver},
        config::paths::node_config_path,
    },
    readiness::ReadinessPoll,
};

/// Where the testnet's stdout goes. It is never read by the harness.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum StdoutCapture {
    #[default]
    Piped,
    File(PathBuf),
}

/// Everything the harness needs to drive one testnet run.
#[derive(Clone, Debug)]
pub struct HarnessConfig {
    pub binary: PathBuf,
    pub data_dir: PathBuf,
    pub rest_api_addr: String,
    pub poll: ReadinessPoll,
    pub shutdown_grace: Duration,
    pub stdout: StdoutCapture,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self::new(DEFAULT_NODE_BIN_PATH, DEFAULT_TESTNET_DATA_DIR)
    }
}

impl HarnessConfig {
    /// Compiled-in defaults with an explicit binary and data directory.
    #[must_use]
    pub fn new(binary: impl Into<PathBuf>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            data_dir: data_dir.into(),
            rest_api_addr: DEFAULT_REST_API_ADDR.to_owned(),
            poll: ReadinessPoll::default(),
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
            stdout: StdoutCapture::Piped,
        }
    }

    /// Defaults overridden by whatever `TESTNET_*` / `APTOS_NODE_BIN`
    /// variables are set.
    #[must_use]
    pub fn from_env() -> Self {
        let binary = BinaryResolver::resolve_path(&BinaryConfig {
            env_override: tf_env::aptos_node_bin(),
            binary_name: NODE_BINARY_NAME,
            fallback_path: DEFAULT_NODE_BIN_PATH,
        });
        let data_dir =
            tf_env::testnet_data_dir().unwrap_or_else(|| PathBuf::from(DEFAULT_TESTNET_DATA_DIR));

        let poll = ReadinessPoll::new(
            env_secs(
                tf_env::testnet_poll_interval_secs(),
                DEFAULT_POLL_INTERVAL_SECS,
            ),
            tf_env::testnet_poll_attempts().unwrap_or(DEFAULT_POLL_ATTEMPTS),
        );

        let stdout = tf_env::testnet_stdout_log().map_or(StdoutCapture::Piped, StdoutCapture::File);

        Self {
            rest_api_addr: tf_env::testnet_rest_api_addr()
                .unwrap_or_else(|| DEFAULT_REST_API_ADDR.to_owned()),
            poll,
            shutdown_grace: env_secs(
                tf_env::testnet_shutdown_grace_secs(),
                DEFAULT_SHUTDOWN_GRACE_SECS,
            ),
            stdout,
            ..Self::new(binary, data_dir)
        }
    }

    #[must_use]
    pub fn with_poll(mut self, poll: ReadinessPoll) -> Self {
        self.poll = poll;
        self
    }

    #[must_use]
    pub fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = grace;
        self
    }

    #[must_use]
    pub fn with_stdout(mut self, stdout: StdoutCapture) -> Self {
        self.stdout = stdout;
        self
    }

    /// `<data-dir>/0/node.yaml`
    #[must_use]
    pub fn node_config_path(&self) -> PathBuf {
        node_config_path(&self.data_dir)
    }
}

fn env_secs(value: Option<u64>, default: u64) -> Duration {
    Duration::from_secs(value.unwrap_or(default))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[test]
    fn defaults_point_at_the_local_testnet_layout() {
        let config = HarnessConfig::default();

        assert_eq!(config.binary, PathBuf::from("./target/debug/aptos-node"));
        assert_eq!(
            config.node_config_path(),
            PathBuf::from("./test_indexer_grpc_testnet/0/node.yaml")
        );
        assert_eq!(config.rest_api_addr, "http://localhost:8080");
        assert_eq!(config.poll.interval, Duration::from_secs(10));
        assert_eq!(config.poll.max_attempts, 6);
        assert_eq!(config.stdout, StdoutCapture::Piped);
    }

    #[test]
    fn builders_replace_only_their_field() {
        let poll = ReadinessPoll::new(Duration::from_millis(50), 3);
        let config = HarnessConfig::new("bin/node", "data")
            .with_poll(poll)
            .with_shutdown_grace(Duration::from_secs(1))
            .with_stdout(StdoutCapture::File("out.log".into()));

        assert_eq!(config.poll, poll);
        assert_eq!(config.shutdown_grace, Duration::from_secs(1));
        assert_eq!(config.stdout, StdoutCapture::File("out.log".into()));
        assert_eq!(config.data_dir, PathBuf::from("data"));
    }

    /// Every variable `from_env` reads. Tests touching them hold `ENV_LOCK`.
    const HARNESS_VARS: [&str; 7] = [
        "APTOS_NODE_BIN",
        "TESTNET_DATA_DIR",
        "TESTNET_REST_API_ADDR",
        "TESTNET_POLL_INTERVAL_SECS",
        "TESTNET_POLL_ATTEMPTS",
        "TESTNET_SHUTDOWN_GRACE_SECS",
        "TESTNET_STDOUT_LOG",
    ];

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn with_env(vars: &[(&str, &str)], check: impl FnOnce()) {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        // SAFETY: every test that mutates these variables holds ENV_LOCK, and
        // nothing else in this test binary reads them.
        unsafe {
            for key in HARNESS_VARS {
                std::env::remove_var(key);
            }
            for (key, value) in vars {
                std::env::set_var(key, value);
            }
        }

        check();

        // SAFETY: still under ENV_LOCK.
        unsafe {
            for key in HARNESS_VARS {
                std::env::remove_var(key);
            }
        }
    }

    #[test]
    fn from_env_applies_every_override() {
        with_env(
            &[
                ("APTOS_NODE_BIN", "/opt/aptos/bin/aptos-node"),
                ("TESTNET_DATA_DIR", "/var/tmp/testnet"),
                ("TESTNET_REST_API_ADDR", "http://127.0.0.1:9090"),
                ("TESTNET_POLL_INTERVAL_SECS", "3"),
                ("TESTNET_POLL_ATTEMPTS", "12"),
                ("TESTNET_SHUTDOWN_GRACE_SECS", "9"),
                ("TESTNET_STDOUT_LOG", "/var/tmp/testnet.stdout"),
            ],
            || {
                let config = HarnessConfig::from_env();

                assert_eq!(config.binary, PathBuf::from("/opt/aptos/bin/aptos-node"));
                assert_eq!(config.data_dir, PathBuf::from("/var/tmp/testnet"));
                assert_eq!(
                    config.node_config_path(),
                    PathBuf::from("/var/tmp/testnet/0/node.yaml")
                );
                assert_eq!(config.rest_api_addr, "http://127.0.0.1:9090");
                assert_eq!(
                    config.poll,
                    ReadinessPoll::new(Duration::from_secs(3), 12)
                );
                assert_eq!(config.shutdown_grace, Duration::from_secs(9));
                assert_eq!(
                    config.stdout,
                    StdoutCapture::File("/var/tmp/testnet.stdout".into())
                );
            },
        );
    }

    #[test]
    fn from_env_ignores_unparseable_numbers() {
        with_env(
            &[
                ("TESTNET_POLL_ATTEMPTS", "abc"),
                ("TESTNET_POLL_INTERVAL_SECS", "-1"),
                ("TESTNET_SHUTDOWN_GRACE_SECS", "soon"),
            ],
            || {
                let config = HarnessConfig::from_env();

                assert_eq!(config.poll.max_attempts, 6);
                assert_eq!(config.poll.interval, Duration::from_secs(10));
                assert_eq!(config.shutdown_grace, Duration::from_secs(5));
                assert_eq!(
                    config.data_dir,
                    PathBuf::from("./test_indexer_grpc_testnet")
                );
                assert_eq!(config.rest_api_addr, "http://localhost:8080");
                assert_eq!(config.stdout, StdoutCapture::Piped);
            },
        );
    }
}
