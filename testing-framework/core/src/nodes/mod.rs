pub mod common;
pub mod testnet;

pub use testnet::{SpawnTestnetError, StopOutcome, TestnetProcess};
