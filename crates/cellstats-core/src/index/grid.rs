use std::path::{Path, PathBuf};

use ndarray::Array3;

use crate::config::AnalysisConfig;
use crate::error::{CellStatsError, Result};
use crate::frame::Slot;

/// `grid[channel][z][t] -> file` for one well.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageGrid {
    cells: Array3<Option<PathBuf>>,
}

impl ImageGrid {
    pub fn new(num_channels: usize, num_z: usize, num_t: usize) -> Self {
        Self {
            cells: Array3::from_elem((num_channels, num_z, num_t), None),
        }
    }

    /// (channels, Z slices, timepoints).
    pub fn dims(&self) -> (usize, usize, usize) {
        self.cells.dim()
    }

    pub fn num_channels(&self) -> usize {
        self.cells.dim().0
    }

    pub fn num_z(&self) -> usize {
        self.cells.dim().1
    }

    pub fn num_timepoints(&self) -> usize {
        self.cells.dim().2
    }

    /// Assign a file to a slot. A second assignment to the same slot is an
    /// indexing conflict and never overwrites the first.
    pub fn insert(&mut self, well: &str, slot: Slot, path: PathBuf) -> Result<()> {
        let dims = self.dims();
        let Some(cell) = self.cells.get_mut([slot.channel, slot.z, slot.t]) else {
            return Err(CellStatsError::UnrecognizedFileName {
                file: path.display().to_string(),
                reason: format!("slot {slot} lies outside the {dims:?} grid"),
            });
        };
        if let Some(first) = cell {
            return Err(CellStatsError::DuplicateSlot {
                well: well.to_string(),
                slot,
                first: first.clone(),
                second: path,
            });
        }
        *cell = Some(path);
        Ok(())
    }

    pub fn get(&self, slot: Slot) -> Option<&Path> {
        self.cells
            .get([slot.channel, slot.z, slot.t])
            .and_then(|c| c.as_deref())
    }

    /// All slots in channel, Z, time order.
    pub fn slots(&self) -> impl Iterator<Item = Slot> {
        let (nc, nz, nt) = self.dims();
        (0..nc).flat_map(move |c| (0..nz).flat_map(move |z| (0..nt).map(move |t| Slot::new(c, z, t))))
    }

    /// Every slot of a non-skipped channel must hold a file.
    pub fn ensure_complete(&self, well: &str, config: &AnalysisConfig) -> Result<()> {
        for slot in self.slots() {
            if config.role(slot.channel).is_skip() {
                continue;
            }
            if self.get(slot).is_none() {
                return Err(CellStatsError::MissingImage {
                    well: well.to_string(),
                    slot,
                });
            }
        }
        Ok(())
    }
}
