use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{BRIGHTFIELD_MIN_SIZE, DEFAULT_MIN_CIRCULARITY, FLUORESCENT_MIN_SIZE};
use crate::error::CellStatsError;

/// Semantic role of an acquisition channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelRole {
    /// Not analysed; contributes an empty particle set.
    #[default]
    Skip,
    /// Transmitted light; the largest particle stands in for the cell.
    #[serde(alias = "gray")]
    Brightfield,
    Red,
    Green,
    Blue,
    /// Derived from the mean of the red and green planes.
    Yellow,
}

/// How a source frame is reduced to a single detection plane.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reduction {
    /// Convert the whole frame to 8-bit gray.
    Gray8,
    /// Select one component plane (0 = red, 1 = green, 2 = blue).
    Plane(usize),
    /// Floor of the per-pixel mean of the red and green planes.
    MeanRedGreen,
}

/// Per-role numeric policy used by preprocessing, segmentation and overlays.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChannelPolicy {
    pub reduction: Reduction,
    pub min_size: usize,
    pub min_circularity: f64,
    /// Objects brighter than the background.
    pub dark_background: bool,
    pub overlay_color: [u8; 3],
}

const POLICIES: [(ChannelRole, ChannelPolicy); 5] = [
    (
        ChannelRole::Brightfield,
        ChannelPolicy {
            reduction: Reduction::Gray8,
            min_size: BRIGHTFIELD_MIN_SIZE,
            min_circularity: DEFAULT_MIN_CIRCULARITY,
            dark_background: false,
            overlay_color: [0, 255, 0],
        },
    ),
    (
        ChannelRole::Red,
        ChannelPolicy {
            reduction: Reduction::Plane(0),
            min_size: FLUORESCENT_MIN_SIZE,
            min_circularity: DEFAULT_MIN_CIRCULARITY,
            dark_background: true,
            overlay_color: [255, 0, 0],
        },
    ),
    (
        ChannelRole::Green,
        ChannelPolicy {
            reduction: Reduction::Plane(1),
            min_size: FLUORESCENT_MIN_SIZE,
            min_circularity: DEFAULT_MIN_CIRCULARITY,
            dark_background: true,
            overlay_color: [0, 255, 255],
        },
    ),
    (
        ChannelRole::Blue,
        ChannelPolicy {
            reduction: Reduction::Plane(2),
            min_size: FLUORESCENT_MIN_SIZE,
            min_circularity: DEFAULT_MIN_CIRCULARITY,
            dark_background: true,
            overlay_color: [0, 0, 255],
        },
    ),
    (
        ChannelRole::Yellow,
        ChannelPolicy {
            reduction: Reduction::MeanRedGreen,
            min_size: FLUORESCENT_MIN_SIZE,
            min_circularity: DEFAULT_MIN_CIRCULARITY,
            dark_background: true,
            overlay_color: [0, 0, 255],
        },
    ),
];

impl ChannelRole {
    /// Policy for this role, `None` for [`ChannelRole::Skip`].
    pub fn policy(self) -> Option<&'static ChannelPolicy> {
        POLICIES
            .iter()
            .find(|(role, _)| *role == self)
            .map(|(_, policy)| policy)
    }

    pub fn is_skip(self) -> bool {
        self == Self::Skip
    }

    pub fn is_brightfield(self) -> bool {
        self == Self::Brightfield
    }

    /// Fluorescent roles get their own report columns.
    pub fn is_reported(self) -> bool {
        !self.is_skip() && !self.is_brightfield()
    }
}

impl std::fmt::Display for ChannelRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Skip => write!(f, "Skip"),
            Self::Brightfield => write!(f, "Brightfield"),
            Self::Red => write!(f, "Red"),
            Self::Green => write!(f, "Green"),
            Self::Blue => write!(f, "Blue"),
            Self::Yellow => write!(f, "Yellow"),
        }
    }
}

impl FromStr for ChannelRole {
    type Err = CellStatsError;

    /// Case-insensitive; accepts instrument LUT names such as `Gray`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "brightfield" | "gray" | "grey" => Ok(Self::Brightfield),
            "red" => Ok(Self::Red),
            "green" => Ok(Self::Green),
            "blue" => Ok(Self::Blue),
            "yellow" => Ok(Self::Yellow),
            other => Err(CellStatsError::InvalidConfig(format!(
                "unknown channel label '{other}' (expected skip, brightfield, red, green, blue or yellow)"
            ))),
        }
    }
}
