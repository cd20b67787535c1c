use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::channel::ChannelRole;
use crate::consts::{DEFAULT_ROI, METADATA_DIR};
use crate::error::{CellStatsError, Result};
use crate::frame::Roi;
use crate::io::metadata::MetadataOverrides;

/// Raster format of the input images.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageType {
    #[default]
    Tif,
    Png,
}

impl ImageType {
    /// True if `path` carries an extension of this image type.
    pub fn matches(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        let ext = ext.to_ascii_lowercase();
        match self {
            Self::Tif => ext == "tif" || ext == "tiff",
            Self::Png => ext == "png",
        }
    }
}

impl std::fmt::Display for ImageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tif => write!(f, "tif"),
            Self::Png => write!(f, "png"),
        }
    }
}

/// How well/channel/Z/time are located inside a file name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingConvention {
    /// Infer token positions from their shape (`t01`, `z00`, `ch02`, `A1`).
    #[default]
    Auto,
    /// Read every axis from explicitly configured token indices.
    Positional,
}

impl std::fmt::Display for NamingConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "Auto"),
            Self::Positional => write!(f, "Positional"),
        }
    }
}

/// Explicit token positions within an underscore-delimited file name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenIndices {
    /// One or more tokens forming the well name.
    #[serde(default)]
    pub well: Vec<usize>,
    #[serde(default)]
    pub z: Option<usize>,
    #[serde(default)]
    pub time: Option<usize>,
    #[serde(default)]
    pub channel: Option<usize>,
}

/// Resolved analysis configuration. Build it with [`AnalysisConfig::from_toml_str`]
/// or [`AnalysisConfig::validate`]; treat it as read-only afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    #[serde(default = "default_num_channels")]
    pub num_channels: usize,
    #[serde(default = "default_count")]
    pub num_z: usize,
    #[serde(default = "default_count")]
    pub num_timepoints: usize,
    #[serde(default = "default_channel_labels")]
    pub channel_labels: Vec<ChannelRole>,
    /// Instrument channel names, matched against file name tokens.
    #[serde(default)]
    pub channel_names: Vec<String>,
    /// Instrument channel names that are treated as [`ChannelRole::Skip`].
    #[serde(default)]
    pub chans_to_skip: Vec<String>,
    /// Physical pixel width in micrometres.
    #[serde(default = "default_pixel_size")]
    pub pixel_width: f64,
    /// Physical pixel height in micrometres.
    #[serde(default = "default_pixel_size")]
    pub pixel_height: f64,
    /// Wells to process; empty means all.
    #[serde(default)]
    pub well_names: Vec<String>,
    #[serde(default)]
    pub debug_output: bool,
    #[serde(default)]
    pub image_type: ImageType,
    #[serde(default)]
    pub naming: NamingConvention,
    #[serde(default)]
    pub parallel_wells: bool,
    #[serde(default = "default_roi")]
    pub analysis_roi: Roi,
    #[serde(default)]
    pub token_indices: TokenIndices,
}

fn default_num_channels() -> usize {
    4
}
fn default_count() -> usize {
    1
}
fn default_channel_labels() -> Vec<ChannelRole> {
    vec![
        ChannelRole::Skip,
        ChannelRole::Yellow,
        ChannelRole::Blue,
        ChannelRole::Brightfield,
    ]
}
fn default_roi() -> Roi {
    let (x, y, w, h) = DEFAULT_ROI;
    Roi::new(x, y, w, h)
}
fn default_pixel_size() -> f64 {
    1.0
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("input"),
            output_dir: PathBuf::from("output"),
            num_channels: default_num_channels(),
            num_z: default_count(),
            num_timepoints: default_count(),
            channel_labels: default_channel_labels(),
            channel_names: Vec::new(),
            chans_to_skip: Vec::new(),
            analysis_roi: default_roi(),
            pixel_width: default_pixel_size(),
            pixel_height: default_pixel_size(),
            well_names: Vec::new(),
            debug_output: false,
            image_type: ImageType::default(),
            naming: NamingConvention::default(),
            parallel_wells: false,
            token_indices: TokenIndices::default(),
        }
    }
}

impl AnalysisConfig {
    /// Parse and validate a TOML configuration.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: AnalysisConfig =
            toml::from_str(contents).map_err(|e| CellStatsError::InvalidConfig(e.to_string()))?;
        config.validate()
    }

    /// Read, parse and validate a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Check the structural invariants and return the config unchanged.
    pub fn validate(self) -> Result<Self> {
        if self.num_channels == 0 {
            return Err(CellStatsError::InvalidConfig(
                "num_channels must be at least 1".into(),
            ));
        }
        if self.channel_labels.len() != self.num_channels {
            return Err(CellStatsError::InvalidConfig(format!(
                "expected {} channel labels, found {}",
                self.num_channels,
                self.channel_labels.len()
            )));
        }
        if !self.channel_names.is_empty() && self.channel_names.len() != self.num_channels {
            return Err(CellStatsError::InvalidConfig(format!(
                "expected {} channel names, found {}",
                self.num_channels,
                self.channel_names.len()
            )));
        }
        if self.num_z == 0 || self.num_timepoints == 0 {
            return Err(CellStatsError::InvalidConfig(
                "num_z and num_timepoints must be at least 1".into(),
            ));
        }
        for (name, value) in [("pixel_width", self.pixel_width), ("pixel_height", self.pixel_height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(CellStatsError::InvalidConfig(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        if self.analysis_roi.width == 0 || self.analysis_roi.height == 0 {
            return Err(CellStatsError::InvalidConfig(format!(
                "analysis ROI {} is empty",
                self.analysis_roi
            )));
        }
        Ok(self)
    }

    /// New validated config with instrument metadata applied on top of this one.
    pub fn with_overrides(&self, overrides: &MetadataOverrides) -> Result<Self> {
        let mut config = self.clone();

        if let Some(ref names) = overrides.channel_names {
            config.num_channels = names.len();
            config.channel_labels = names.iter().map(|n| self.role_for_name(n)).collect();
            config.channel_names = names.clone();
        }
        if let Some(w) = overrides.pixel_width {
            config.pixel_width = w;
        }
        if let Some(h) = overrides.pixel_height {
            config.pixel_height = h;
        }
        if let Some(z) = overrides.num_z {
            config.num_z = z;
        }

        config.validate()
    }

    fn role_for_name(&self, name: &str) -> ChannelRole {
        if self
            .chans_to_skip
            .iter()
            .any(|s| s.trim().eq_ignore_ascii_case(name.trim()))
        {
            return ChannelRole::Skip;
        }
        name.parse().unwrap_or_else(|_| {
            warn!(channel = name, "Unrecognised instrument channel, skipping it");
            ChannelRole::Skip
        })
    }

    /// Role of a channel index; out-of-range channels are skipped.
    pub fn role(&self, channel: usize) -> ChannelRole {
        self.channel_labels
            .get(channel)
            .copied()
            .unwrap_or(ChannelRole::Skip)
    }

    /// Channels that get count/area/percent report columns, in channel order.
    pub fn reported_channels(&self) -> Vec<(usize, ChannelRole)> {
        self.channel_labels
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, role)| role.is_reported())
            .collect()
    }

    /// Directory holding per-well instrument property files.
    pub fn metadata_dir(&self) -> PathBuf {
        self.input_dir.join(METADATA_DIR)
    }

    /// True when `well` passes the optional allow-list.
    pub fn accepts_well(&self, well: &str) -> bool {
        self.well_names.is_empty() || self.well_names.iter().any(|w| w == well)
    }
}
