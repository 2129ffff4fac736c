use testnet_harness_env as tf_env;
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_LOG_FILTER: &str = "info";

/// `RUST_LOG` when it parses, `info` otherwise.
fn filter_from(raw: Option<String>) -> EnvFilter {
    raw.and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

pub fn init_tracing() {
    let filter = filter_from(tf_env::rust_log());
    let _ = fmt().with_env_filter(filter).with_target(true).try_init();
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::filter::LevelFilter;

    use super::*;

    #[test]
    fn defaults_to_info() {
        assert_eq!(filter_from(None).max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn honours_explicit_level() {
        assert_eq!(
            filter_from(Some("debug".to_owned())).max_level_hint(),
            Some(LevelFilter::DEBUG)
        );
    }
}
