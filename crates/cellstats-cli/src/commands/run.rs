use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use cellstats_core::detection::AutoThresholdDetector;
use cellstats_core::pipeline::{run_analysis_reported, PipelineStage, ProgressReporter};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use crate::summary::{print_config_summary, print_run_summary};

#[derive(Args)]
pub struct RunArgs {
    /// Analysis config file (TOML)
    pub config: PathBuf,

    /// Input image directory (overrides the config)
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Output directory (overrides the config)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write original, preprocessed and binary images for every frame
    #[arg(long)]
    pub debug: bool,

    /// Comma-separated wells to process, e.g. A1,B2
    #[arg(long, value_delimiter = ',')]
    pub wells: Vec<String>,

    /// Process wells in parallel
    #[arg(long)]
    pub parallel: bool,
}

/// Drives an indicatif bar from pipeline progress events.
struct BarReporter {
    pb: ProgressBar,
}

impl ProgressReporter for BarReporter {
    fn begin_stage(&self, stage: PipelineStage, total_items: Option<usize>) {
        self.pb.set_message(stage.to_string());
        self.pb.set_length(total_items.unwrap_or(1) as u64);
        self.pb.set_position(0);
    }

    fn advance(&self, items_done: usize) {
        self.pb.set_position(items_done as u64);
    }

    fn finish_stage(&self) {
        if let Some(len) = self.pb.length() {
            self.pb.set_position(len);
        }
    }
}

pub fn run(args: &RunArgs) -> Result<()> {
    let mut config = super::load_config(&args.config, args.input.as_ref())?;
    if let Some(ref output) = args.output {
        config.output_dir = output.clone();
    }
    config.debug_output |= args.debug;
    config.parallel_wells |= args.parallel;
    if !args.wells.is_empty() {
        config.well_names = args.wells.clone();
    }

    print_config_summary(&config);

    let pb = ProgressBar::new(1);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:20} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    let reporter = Arc::new(BarReporter { pb: pb.clone() });

    let summary = run_analysis_reported(&config, &AutoThresholdDetector, reporter)
        .with_context(|| format!("Analysis of {} failed", config.input_dir.display()))?;

    pb.finish_with_message("Done");
    print_run_summary(&summary);

    Ok(())
}
