pub mod config;
pub mod scanner;

pub use config::Config;
pub use scanner::{run_scan, ScanOutcome};
