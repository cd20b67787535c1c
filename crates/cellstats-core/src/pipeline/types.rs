use std::path::PathBuf;

use crate::aggregate::WellResult;

/// Pipeline processing stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    Indexing,
    AnalysingWells,
    Writing,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Indexing => write!(f, "Indexing images"),
            Self::AnalysingWells => write!(f, "Analysing wells"),
            Self::Writing => write!(f, "Writing reports"),
        }
    }
}

/// Thread-safe progress reporting for the pipeline.
///
/// Implementors can use this to drive progress bars, logging, or any other
/// UI feedback. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// A new pipeline stage has started. `total_items` is the number of
    /// work items in this stage (e.g., well count), if known.
    fn begin_stage(&self, _stage: PipelineStage, _total_items: Option<usize>) {}

    /// `items_done` work items of the current stage have completed.
    fn advance(&self, _items_done: usize) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}
}

/// No-op progress reporter, used when `run_analysis` delegates.
pub(super) struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}

/// A well left out of the run, with the reason.
#[derive(Clone, Debug, PartialEq)]
pub struct SkippedWell {
    pub well: String,
    pub reason: String,
}

/// Outcome of a complete run.
#[derive(Clone, Debug)]
pub struct RunSummary {
    /// Processed wells in sorted order.
    pub processed: Vec<WellResult>,
    pub skipped: Vec<SkippedWell>,
    /// Location of the combined multi-well report.
    pub report_path: PathBuf,
}

impl RunSummary {
    pub fn particle_count(&self) -> usize {
        self.processed.iter().map(WellResult::particle_count).sum()
    }
}
