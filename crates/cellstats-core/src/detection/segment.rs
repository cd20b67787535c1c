use ndarray::Array2;
use tracing::debug;

use crate::channel::{ChannelPolicy, ChannelRole};
use crate::error::Result;
use crate::frame::{GrayFrame, Roi};

use super::components::label_components;
use super::morphology::morphological_closing;
use super::particle::Particle;
use super::threshold::{auto_threshold, ThresholdRange};

/// Inputs to particle detection for one surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectionParams {
    pub roi: Roi,
    /// Minimum particle area in pixels.
    pub min_size: usize,
    pub min_circularity: f64,
    /// Objects are brighter than the background.
    pub dark_background: bool,
}

impl DetectionParams {
    /// Parameters from a role's policy; `None` for skipped channels.
    pub fn for_role(role: ChannelRole, roi: Roi) -> Option<Self> {
        role.policy().map(|p| Self::from_policy(p, roi))
    }

    pub fn from_policy(policy: &ChannelPolicy, roi: Roi) -> Self {
        Self {
            roi,
            min_size: policy.min_size,
            min_circularity: policy.min_circularity,
            dark_background: policy.dark_background,
        }
    }
}

/// Outcome of detection on one surface.
#[derive(Clone, Debug, PartialEq)]
pub struct Segmentation {
    pub threshold: ThresholdRange,
    /// Binary mask after closing; `None` when the threshold was rejected.
    pub mask: Option<Array2<bool>>,
    /// Accepted particles numbered 1..=n, 0 elsewhere.
    pub labels: Array2<u32>,
    /// Accepted particles in raster order of their first pixel.
    pub particles: Vec<Particle>,
}

impl Segmentation {
    pub fn is_rejected(&self) -> bool {
        self.mask.is_none()
    }
}

/// Threshold-and-label capability used by the pipeline.
pub trait ParticleDetector: Send + Sync {
    fn detect(&self, surface: &GrayFrame, params: &DetectionParams) -> Result<Segmentation>;
}

/// Automatic histogram threshold, 3x3 closing, 8-connected labelling with
/// border, size and circularity rejection.
#[derive(Clone, Copy, Debug, Default)]
pub struct AutoThresholdDetector;

impl ParticleDetector for AutoThresholdDetector {
    fn detect(&self, surface: &GrayFrame, params: &DetectionParams) -> Result<Segmentation> {
        let roi = params.roi.validated(surface.width(), surface.height())?;
        let threshold = auto_threshold(surface, params.dark_background);
        let mut labels = Array2::<u32>::zeros(surface.data.dim());

        if threshold.is_degenerate() {
            debug!(low = threshold.low, high = threshold.high, "Threshold range rejected");
            return Ok(Segmentation {
                threshold,
                mask: None,
                labels,
                particles: Vec::new(),
            });
        }

        let mask = morphological_closing(&threshold.apply(surface));
        let labeling = label_components(&mask, &roi);

        let mut particles = Vec::new();
        for component in &labeling.components {
            if component.bbox.touches(&roi) || component.area() < params.min_size {
                continue;
            }
            let mut particle = Particle::measure(component, surface);
            if particle.circularity < params.min_circularity {
                continue;
            }
            particle.label = particles.len() as u32 + 1;
            for &(row, col) in &component.pixels {
                labels[[row, col]] = particle.label;
            }
            particles.push(particle);
        }

        debug!(
            low = threshold.low,
            high = threshold.high,
            components = labeling.components.len(),
            accepted = particles.len(),
            "Segmented surface"
        );

        Ok(Segmentation {
            threshold,
            mask: Some(mask),
            labels,
            particles,
        })
    }
}
