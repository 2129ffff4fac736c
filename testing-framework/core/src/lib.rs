pub mod config;
pub mod constants;
pub mod harness;
pub mod inspect;
pub mod nodes;
pub mod readiness;

pub use config::{HarnessConfig, StdoutCapture};
pub use harness::{HarnessError, HarnessReport, run_local_testnet};
