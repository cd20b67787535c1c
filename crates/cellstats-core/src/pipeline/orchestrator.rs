use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{info, warn};

use crate::aggregate::{self, WellResult};
use crate::config::AnalysisConfig;
use crate::consts::GLOBAL_REPORT_NAME;
use crate::detection::{AutoThresholdDetector, ParticleDetector};
use crate::error::Result;
use crate::index::{index_directory, Well};

use super::types::{NoOpReporter, PipelineStage, ProgressReporter, RunSummary, SkippedWell};
use super::well::{prepare_well, process_well};

enum WellOutcome {
    Processed(WellResult),
    Skipped(SkippedWell),
}

fn analyse_well(
    well: &Well,
    config: &AnalysisConfig,
    detector: &dyn ParticleDetector,
) -> Result<WellOutcome> {
    let result = prepare_well(well, config).and_then(|prepared| process_well(&prepared, detector));
    match result {
        Ok(result) => Ok(WellOutcome::Processed(result)),
        Err(e) if e.is_well_local() => {
            warn!(well = %well.name, error = %e, "Skipping well");
            Ok(WellOutcome::Skipped(SkippedWell {
                well: well.name.clone(),
                reason: e.to_string(),
            }))
        }
        Err(e) => Err(e),
    }
}

/// Run the full analysis with a custom detector and a thread-safe progress
/// reporter.
///
/// Wells run on the rayon pool when `parallel_wells` is set; results are
/// always kept in sorted well order. The combined report is only written
/// once every well has finished, so a fatal error leaves no partial
/// `AllResults.csv` behind. Its header comes from the wells' effective
/// channel sets, which must agree.
pub fn run_analysis_reported(
    config: &AnalysisConfig,
    detector: &dyn ParticleDetector,
    reporter: Arc<dyn ProgressReporter>,
) -> Result<RunSummary> {
    reporter.begin_stage(PipelineStage::Indexing, None);
    let wells = index_directory(config)?;
    reporter.finish_stage();
    info!(
        wells = wells.len(),
        input = %config.input_dir.display(),
        "Indexed input directory"
    );

    std::fs::create_dir_all(&config.output_dir)?;

    reporter.begin_stage(PipelineStage::AnalysingWells, Some(wells.len()));
    let done = AtomicUsize::new(0);
    let run_one = |well: &Well| {
        let outcome = analyse_well(well, config, detector);
        reporter.advance(done.fetch_add(1, Ordering::Relaxed) + 1);
        outcome
    };
    let outcomes: Vec<WellOutcome> = if config.parallel_wells {
        wells.par_iter().map(run_one).collect::<Result<_>>()?
    } else {
        wells.iter().map(run_one).collect::<Result<_>>()?
    };
    reporter.finish_stage();

    let mut processed = Vec::new();
    let mut skipped = Vec::new();
    for outcome in outcomes {
        match outcome {
            WellOutcome::Processed(result) => processed.push(result),
            WellOutcome::Skipped(well) => skipped.push(well),
        }
    }

    reporter.begin_stage(PipelineStage::Writing, None);
    let report_path = config.output_dir.join(GLOBAL_REPORT_NAME);
    let titles = aggregate::global_titles(&processed, aggregate::channel_titles(config))?;
    aggregate::write_report(&report_path, &aggregate::global_report(&processed, &titles))?;
    reporter.finish_stage();

    info!(
        processed = processed.len(),
        skipped = skipped.len(),
        report = %report_path.display(),
        "Analysis complete"
    );

    Ok(RunSummary {
        processed,
        skipped,
        report_path,
    })
}

/// Run the full analysis with the default detector.
pub fn run_analysis(config: &AnalysisConfig) -> Result<RunSummary> {
    run_analysis_reported(config, &AutoThresholdDetector, Arc::new(NoOpReporter))
}
