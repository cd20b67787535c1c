pub mod components;
pub mod morphology;
pub mod particle;
pub mod segment;
pub mod threshold;

pub use components::{label_components, BoundingBox, Component, Labeling};
pub use particle::{Particle, MEASUREMENT_COLUMNS};
pub use segment::{AutoThresholdDetector, DetectionParams, ParticleDetector, Segmentation};
pub use threshold::{auto_threshold, ThresholdRange};
