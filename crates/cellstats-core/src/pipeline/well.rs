use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::aggregate::{self, WellAccumulator, WellResult};
use crate::config::AnalysisConfig;
use crate::detection::{DetectionParams, ParticleDetector};
use crate::error::{CellStatsError, Result};
use crate::frame::Slot;
use crate::index::{ImageGrid, Well};
use crate::io::{self, metadata};
use crate::measure::Measurer;
use crate::overlay::{render_overlay, render_segmentation};
use crate::preprocess::detection_surface;

/// A well with its effective configuration and slot grid, ready to process.
#[derive(Clone, Debug)]
pub struct PreparedWell {
    pub well: Well,
    /// Base configuration with this well's instrument metadata applied.
    pub config: AnalysisConfig,
    pub grid: ImageGrid,
    pub output_dir: PathBuf,
}

/// Apply per-well metadata and build the slot grid.
///
/// When the input directory carries a metadata directory, the well's
/// property file is required.
pub fn prepare_well(well: &Well, base: &AnalysisConfig) -> Result<PreparedWell> {
    let metadata_dir = base.metadata_dir();
    let config = if metadata_dir.is_dir() {
        let path = metadata::properties_path(&metadata_dir, &well.descriptor);
        if !path.is_file() {
            return Err(CellStatsError::MissingMetadata {
                well: well.name.clone(),
                path,
            });
        }
        let overrides = metadata::read_properties(&path)?;
        debug!(well = %well.name, ?overrides, "Applying instrument metadata");
        base.with_overrides(&overrides)?
    } else {
        base.clone()
    };

    let grid = well.build_grid(&config)?;
    let output_dir = config.output_dir.join(&well.name);
    Ok(PreparedWell {
        well: well.clone(),
        config,
        grid,
        output_dir,
    })
}

fn slot_file(dir: &Path, prefix: &str, well: &str, slot: Slot, suffix: &str) -> PathBuf {
    dir.join(format!("{prefix}{well}_{}{suffix}", slot.tag()))
}

/// Analyse every slot of a prepared well and write its per-well outputs.
pub fn process_well(prepared: &PreparedWell, detector: &dyn ParticleDetector) -> Result<WellResult> {
    let PreparedWell {
        well,
        config,
        grid,
        output_dir,
    } = prepared;
    let name = well.name.as_str();
    std::fs::create_dir_all(output_dir)?;

    let measurer = Measurer::from_config(config);
    let mut accumulator = WellAccumulator::new(name, config, grid.num_z(), grid.num_timepoints());

    for slot in grid.slots() {
        let role = config.role(slot.channel);
        let Some(policy) = role.policy() else {
            continue;
        };
        let params = DetectionParams::from_policy(policy, config.analysis_roi);
        let Some(path) = grid.get(slot) else {
            return Err(CellStatsError::MissingImage {
                well: name.to_string(),
                slot,
            });
        };

        let frame = io::load_rgb(path)?;
        let Some(surface) = detection_surface(&frame, role) else {
            continue;
        };
        let segmentation = detector.detect(&surface, &params)?;
        if segmentation.is_rejected() {
            warn!(
                well = name,
                channel = slot.channel,
                z = slot.z,
                t = slot.t,
                low = segmentation.threshold.low,
                high = segmentation.threshold.high,
                range = segmentation.threshold.span(),
                "Threshold range too wide, no particles for this frame"
            );
        } else {
            debug!(
                well = name,
                channel = slot.channel,
                z = slot.z,
                t = slot.t,
                low = segmentation.threshold.low,
                high = segmentation.threshold.high,
                particles = segmentation.particles.len(),
                "Frame segmented"
            );
        }

        let records = measurer.measure(slot, &segmentation.particles);
        if !records.is_empty() {
            aggregate::write_report(
                &slot_file(output_dir, "", name, slot, "_particles.csv"),
                &aggregate::particle_table(&records),
            )?;
        }

        let overlay = render_overlay(&surface, &segmentation.labels, policy.overlay_color);
        io::save_rgb_png(&overlay, &slot_file(output_dir, "Overlay_", name, slot, ".png"))?;
        io::save_rgb_png(
            &render_segmentation(&segmentation.labels),
            &slot_file(output_dir, "Segmentation_", name, slot, "_particles.png"),
        )?;

        if config.debug_output {
            io::save_rgb_png(&frame, &slot_file(output_dir, "Orig_", name, slot, ".png"))?;
            io::save_gray_png(&surface, &slot_file(output_dir, "Processing_", name, slot, ".png"))?;
            if let Some(ref mask) = segmentation.mask {
                io::save_mask_png(mask, &slot_file(output_dir, "Binary_", name, slot, ".png"))?;
            }
        }

        accumulator.record(slot, records);
    }

    let result = accumulator.finish();
    aggregate::write_report(
        &output_dir.join(format!("{name}_results.csv")),
        &aggregate::well_report(&result),
    )?;
    aggregate::write_report(
        &output_dir.join(format!("{name}_summary.csv")),
        &aggregate::summary_report(&result),
    )?;

    info!(
        well = name,
        rows = result.rows.len(),
        particles = result.particle_count(),
        "Well processed"
    );
    Ok(result)
}
