pub mod config;
pub mod index;
pub mod run;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cellstats_core::config::AnalysisConfig;
use tracing::debug;

/// Load a configuration file and apply an optional input directory override.
pub(crate) fn load_config(path: &Path, input: Option<&PathBuf>) -> Result<AnalysisConfig> {
    let mut config = AnalysisConfig::load(path)
        .with_context(|| format!("Failed to load config {}", path.display()))?;
    if let Some(input) = input {
        config.input_dir = input.clone();
    }
    debug!(config = %path.display(), input = %config.input_dir.display(), "Loaded configuration");
    Ok(config)
}
