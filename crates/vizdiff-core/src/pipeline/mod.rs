pub mod config;
mod orchestrator;
mod types;

pub use config::CompareConfig;
pub use orchestrator::{compare, compare_reported};
pub use types::{ComparisonResult, ComparisonStage, ProgressReporter};
