use crate::config::AnalysisConfig;
use crate::detection::Particle;
use crate::frame::Slot;

/// A particle keyed by its slot and position within the slot, with the area
/// in physical units.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleRecord {
    pub slot: Slot,
    /// 1-based index within the slot.
    pub index: usize,
    /// Area in square micrometres.
    pub area: f64,
    pub particle: Particle,
}

impl ParticleRecord {
    /// Measured columns with the area converted; everything else as measured.
    pub fn values(&self) -> [f64; 14] {
        let mut values = self.particle.measurements();
        values[0] = self.area;
        values
    }
}

/// Pixel-to-physical conversion for one well.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Measurer {
    pub pixel_width: f64,
    pub pixel_height: f64,
}

impl Measurer {
    pub fn new(pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            pixel_width,
            pixel_height,
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.pixel_width, config.pixel_height)
    }

    /// Area of one pixel in square micrometres.
    pub fn pixel_area(&self) -> f64 {
        self.pixel_width * self.pixel_height
    }

    pub fn area_um2(&self, area_px: usize) -> f64 {
        area_px as f64 * self.pixel_area()
    }

    pub fn measure(&self, slot: Slot, particles: &[Particle]) -> Vec<ParticleRecord> {
        particles
            .iter()
            .enumerate()
            .map(|(i, particle)| ParticleRecord {
                slot,
                index: i + 1,
                area: self.area_um2(particle.area),
                particle: particle.clone(),
            })
            .collect()
    }
}
