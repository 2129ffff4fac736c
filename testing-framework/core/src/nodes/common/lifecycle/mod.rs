pub mod kill;
pub mod monitor;
pub mod spawn;
