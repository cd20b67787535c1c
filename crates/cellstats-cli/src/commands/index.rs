use std::path::PathBuf;

use anyhow::{Context, Result};
use cellstats_core::index::index_directory;
use cellstats_core::pipeline::prepare_well;
use clap::Args;

use crate::summary::print_well_index;

#[derive(Args)]
pub struct IndexArgs {
    /// Analysis config file (TOML)
    pub config: PathBuf,

    /// Input image directory (overrides the config)
    #[arg(long)]
    pub input: Option<PathBuf>,
}

/// Index the input directory and print each well's grid without analysing it.
pub fn run(args: &IndexArgs) -> Result<()> {
    let config = super::load_config(&args.config, args.input.as_ref())?;
    let wells = index_directory(&config)
        .with_context(|| format!("Failed to index {}", config.input_dir.display()))?;

    for well in &wells {
        match prepare_well(well, &config) {
            Ok(prepared) => print_well_index(&prepared),
            Err(e) if e.is_well_local() => println!("  {:<10}skipped: {e}", well.name),
            Err(e) => return Err(e.into()),
        }
    }
    println!();
    println!("{} well(s) indexed", wells.len());

    Ok(())
}
