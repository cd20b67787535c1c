//! Turns a flat directory of image files into wells and per-well
//! (channel, Z, time) grids.

pub mod grid;
pub mod naming;
pub mod natural;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::AnalysisConfig;
use crate::error::{CellStatsError, Result};
use crate::frame::Slot;

pub use grid::ImageGrid;
pub use naming::{naming_scheme, NamingScheme, ParsedName, PositionalScheme, TokenScheme};
pub use natural::{natural_cmp, sort_nicely};

/// One input file with the coordinates parsed from its name.
#[derive(Clone, Debug, PartialEq)]
pub struct IndexedFile {
    pub path: PathBuf,
    pub parsed: ParsedName,
}

/// A named group of image files sharing a common descriptor.
#[derive(Clone, Debug, PartialEq)]
pub struct Well {
    pub name: String,
    /// Common file-name prefix; also names the well's property file.
    pub descriptor: String,
    /// Files in natural order.
    pub files: Vec<IndexedFile>,
}

impl Well {
    /// Place every file into the grid. Time indices are offsets from the
    /// smallest time token, Z indices are ranks among the distinct Z values.
    pub fn build_grid(&self, config: &AnalysisConfig) -> Result<ImageGrid> {
        let times: BTreeSet<u32> = self.files.iter().filter_map(|f| f.parsed.time).collect();
        let z_values: Vec<u32> = self
            .files
            .iter()
            .filter_map(|f| f.parsed.z)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let (min_t, num_t) = match (times.first(), times.last()) {
            (Some(&lo), Some(&hi)) => (lo, (hi - lo) as usize + 1),
            _ => (0, 1),
        };
        let num_z = z_values.len().max(1);

        if num_z != config.num_z {
            warn!(
                well = %self.name,
                configured = config.num_z,
                found = num_z,
                "Z slice count differs from configuration, using file names"
            );
        }
        if num_t != config.num_timepoints {
            warn!(
                well = %self.name,
                configured = config.num_timepoints,
                found = num_t,
                "Timepoint count differs from configuration, using file names"
            );
        }

        let mut grid = ImageGrid::new(config.num_channels, num_z, num_t);
        for file in &self.files {
            let channel = match file.parsed.channel {
                Some(c) => c,
                None if config.num_channels == 1 => 0,
                None => {
                    return Err(CellStatsError::UnrecognizedFileName {
                        file: file.path.display().to_string(),
                        reason: "no channel token".into(),
                    })
                }
            };
            if channel >= config.num_channels {
                return Err(CellStatsError::UnrecognizedFileName {
                    file: file.path.display().to_string(),
                    reason: format!(
                        "channel {channel} outside the {} configured channels",
                        config.num_channels
                    ),
                });
            }
            let z = file
                .parsed
                .z
                .and_then(|z| z_values.binary_search(&z).ok())
                .unwrap_or(0);
            let t = file.parsed.time.map_or(0, |t| (t - min_t) as usize);
            grid.insert(&self.name, Slot::new(channel, z, t), file.path.clone())?;
        }

        grid.ensure_complete(&self.name, config)?;
        debug!(well = %self.name, dims = ?grid.dims(), "Indexed well");
        Ok(grid)
    }
}

/// Image files of the configured type in the input directory, natural-sorted.
pub fn list_images(config: &AnalysisConfig) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(&config.input_dir)? {
        let path = entry?.path();
        if path.is_file() && config.image_type.matches(&path) {
            files.push(path);
        }
    }

    if files.is_empty() {
        return Err(CellStatsError::NoImages {
            dir: config.input_dir.clone(),
            extension: config.image_type.to_string(),
        });
    }

    files.sort_by(|a, b| natural_cmp(&file_name(a), &file_name(b)));
    Ok(files)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Group sorted files into wells, ordered naturally by well name.
pub fn group_wells(files: &[PathBuf], scheme: &dyn NamingScheme) -> Result<Vec<Well>> {
    let mut wells: Vec<Well> = Vec::new();

    for path in files {
        let parsed = scheme.parse(&file_name(path))?;
        let file = IndexedFile {
            path: path.clone(),
            parsed,
        };
        match wells.iter_mut().find(|w| w.name == file.parsed.well) {
            Some(well) => well.files.push(file),
            None => wells.push(Well {
                name: file.parsed.well.clone(),
                descriptor: file.parsed.descriptor.clone(),
                files: vec![file],
            }),
        }
    }

    wells.sort_by(|a, b| natural_cmp(&a.name, &b.name));
    Ok(wells)
}

/// List, parse and group the input directory, honouring the well allow-list.
pub fn index_directory(config: &AnalysisConfig) -> Result<Vec<Well>> {
    let files = list_images(config)?;
    let scheme = naming_scheme(config)?;
    let wells = group_wells(&files, scheme.as_ref())?;
    Ok(wells
        .into_iter()
        .filter(|w| config.accepts_well(&w.name))
        .collect())
}
