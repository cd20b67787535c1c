use std::path::PathBuf;

use thiserror::Error;

use crate::frame::Slot;

#[derive(Error, Debug)]
pub enum CellStatsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("No {extension} images found in input directory {}", dir.display())]
    NoImages { dir: PathBuf, extension: String },

    #[error(
        "Well {well}: slot {slot} assigned more than once ({} and {})",
        first.display(),
        second.display()
    )]
    DuplicateSlot {
        well: String,
        slot: Slot,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Well {well}: no image for slot {slot}")]
    MissingImage { well: String, slot: Slot },

    #[error("Naming scheme requires an explicit {0} token index")]
    MissingTokenIndex(&'static str),

    #[error("Cannot interpret file name {file}: {reason}")]
    UnrecognizedFileName { file: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(
        "Analysis ROI ({x},{y} {width}x{height}) exceeds image dimensions ({image_width}x{image_height})"
    )]
    RoiOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        image_width: usize,
        image_height: usize,
    },

    #[error("Invalid metadata file {}: {reason}", path.display())]
    Metadata { path: PathBuf, reason: String },

    #[error("Well {well}: metadata file {} not found", path.display())]
    MissingMetadata { well: String, path: PathBuf },
}

impl CellStatsError {
    /// True when the failure only invalidates the current well and the run
    /// may continue with the next one.
    pub fn is_well_local(&self) -> bool {
        matches!(self, Self::MissingMetadata { .. })
    }
}

pub type Result<T> = std::result::Result<T, CellStatsError>;
