mod orchestrator;
mod types;
mod well;

pub use orchestrator::{run_analysis, run_analysis_reported};
pub use types::{PipelineStage, ProgressReporter, RunSummary, SkippedWell};
pub use well::{prepare_well, process_well, PreparedWell};
