use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{CellStatsError, Result};

/// A single 8-bit grayscale plane.
#[derive(Clone, Debug, PartialEq)]
pub struct GrayFrame {
    /// Pixel data, row-major, shape = (height, width)
    pub data: Array2<u8>,
}

impl GrayFrame {
    pub fn new(data: Array2<u8>) -> Self {
        Self { data }
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }
}

/// Source frame split into its red, green and blue planes.
#[derive(Clone, Debug, PartialEq)]
pub struct RgbFrame {
    pub red: GrayFrame,
    pub green: GrayFrame,
    pub blue: GrayFrame,
}

impl RgbFrame {
    /// Frame whose three planes all carry the same gray values.
    pub fn from_gray(gray: &GrayFrame) -> Self {
        Self {
            red: gray.clone(),
            green: gray.clone(),
            blue: gray.clone(),
        }
    }

    pub fn width(&self) -> usize {
        self.red.width()
    }

    pub fn height(&self) -> usize {
        self.red.height()
    }

    /// Component planes in R, G, B order.
    pub fn planes(&self) -> [&GrayFrame; 3] {
        [&self.red, &self.green, &self.blue]
    }
}

/// A (channel, Z, time) coordinate identifying one source frame of a well.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot {
    pub channel: usize,
    pub z: usize,
    pub t: usize,
}

impl Slot {
    pub fn new(channel: usize, z: usize, t: usize) -> Self {
        Self { channel, z, t }
    }

    /// File-name fragment, e.g. `ch01_z00_t02`.
    pub fn tag(&self) -> String {
        format!("ch{:02}_z{:02}_t{:02}", self.channel, self.z, self.t)
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(channel {}, z {}, t {})", self.channel, self.z, self.t)
    }
}

/// Rectangular analysis region in pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roi {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Roi {
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// ROI covering a whole image.
    pub fn full(width: usize, height: usize) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Check that the ROI is non-empty and lies inside an image of the given size.
    pub fn validated(&self, image_width: usize, image_height: usize) -> Result<Roi> {
        if self.width == 0
            || self.height == 0
            || self.x + self.width > image_width
            || self.y + self.height > image_height
        {
            return Err(CellStatsError::RoiOutOfBounds {
                x: self.x,
                y: self.y,
                width: self.width,
                height: self.height,
                image_width,
                image_height,
            });
        }
        Ok(*self)
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.y && row < self.y + self.height && col >= self.x && col < self.x + self.width
    }
}

impl std::fmt::Display for Roi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{} {}x{}", self.x, self.y, self.width, self.height)
    }
}
