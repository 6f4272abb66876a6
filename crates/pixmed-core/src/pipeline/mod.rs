pub mod config;
mod orchestrator;
mod types;

pub use orchestrator::{run_filter, run_filter_reported};
pub use types::{PipelineStage, ProgressReporter, RunSummary};
