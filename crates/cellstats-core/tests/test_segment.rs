#[allow(dead_code)]
mod common;

use approx::assert_relative_eq;
use cellstats_core::channel::ChannelRole;
use cellstats_core::detection::{AutoThresholdDetector, DetectionParams, ParticleDetector};
use cellstats_core::error::CellStatsError;
use cellstats_core::frame::{GrayFrame, Roi};

fn params(roi: Roi, min_size: usize) -> DetectionParams {
    DetectionParams {
        roi,
        min_size,
        min_circularity: 0.02,
        dark_background: true,
    }
}

#[test]
fn test_small_blob_rejected_large_blob_kept() {
    let mut data = common::plane(30, 30, 0);
    // Three-pixel line and a 5x10 block.
    common::fill_rect(&mut data, 3, 3, 1, 3, 255);
    common::fill_rect(&mut data, 12, 8, 5, 10, 255);
    let surface = GrayFrame::new(data);

    let seg = AutoThresholdDetector
        .detect(&surface, &params(Roi::full(30, 30), 5))
        .unwrap();
    assert!(!seg.is_rejected());
    assert_eq!(seg.particles.len(), 1);
    let p = &seg.particles[0];
    assert_eq!(p.area, 50);
    assert!(p.circularity > 0.8 && p.circularity <= 1.0);
    assert_eq!(seg.labels.iter().filter(|&&l| l == 1).count(), 50);
}

#[test]
fn test_uniform_frame_yields_nothing() {
    let surface = GrayFrame::new(common::plane(20, 20, 128));
    let seg = AutoThresholdDetector
        .detect(&surface, &params(Roi::full(20, 20), 1))
        .unwrap();
    assert!(seg.is_rejected());
    assert!(seg.threshold.span() > 230);
    assert!(seg.particles.is_empty());
    assert!(seg.labels.iter().all(|&l| l == 0));
}

#[test]
fn test_particles_touching_roi_border_are_dropped() {
    let mut data = common::plane(40, 40, 5);
    common::fill_rect(&mut data, 2, 10, 6, 6, 250);
    common::fill_rect(&mut data, 20, 20, 6, 6, 250);
    common::fill_rect(&mut data, 10, 30, 6, 6, 250);
    let surface = GrayFrame::new(data);

    let seg = AutoThresholdDetector
        .detect(&surface, &params(Roi::new(2, 2, 34, 34), 5))
        .unwrap();
    assert_eq!(seg.particles.len(), 1);
    assert_eq!(seg.particles[0].bbox.min_row, 20);
}

#[test]
fn test_light_background_finds_dark_object() {
    let data = common::brightfield_frame(40);
    let surface = GrayFrame::new(data);
    let params = DetectionParams::for_role(ChannelRole::Brightfield, Roi::full(40, 40)).unwrap();
    assert!(!params.dark_background);

    let seg = AutoThresholdDetector.detect(&surface, &params).unwrap();
    assert_eq!((seg.threshold.low, seg.threshold.high), (0, 125));
    assert_eq!(seg.particles.len(), 1);
    assert_eq!(seg.particles[0].area, 400);
    assert_relative_eq!(seg.particles[0].mean, 50.0);
}

#[test]
fn test_min_circularity_filters_thin_shapes() {
    let mut data = common::plane(30, 60, 0);
    common::fill_rect(&mut data, 10, 5, 1, 50, 255);
    let surface = GrayFrame::new(data);
    let mut p = params(Roi::full(60, 30), 5);
    p.min_circularity = 0.5;
    let seg = AutoThresholdDetector.detect(&surface, &p).unwrap();
    assert!(seg.particles.is_empty());
}

#[test]
fn test_particle_order_is_raster_order() {
    let mut data = common::plane(40, 40, 0);
    common::fill_rect(&mut data, 25, 5, 4, 4, 255);
    common::fill_rect(&mut data, 5, 30, 4, 4, 255);
    let surface = GrayFrame::new(data);
    let seg = AutoThresholdDetector
        .detect(&surface, &params(Roi::full(40, 40), 5))
        .unwrap();
    assert_eq!(seg.particles.len(), 2);
    assert_eq!(seg.particles[0].bbox.min_row, 5);
    assert_eq!(seg.particles[0].label, 1);
    assert_eq!(seg.particles[1].bbox.min_row, 25);
    assert_eq!(seg.labels[[26, 6]], 2);
}

#[test]
fn test_roi_outside_image_is_an_error() {
    let surface = GrayFrame::new(common::plane(10, 10, 0));
    let err = AutoThresholdDetector
        .detect(&surface, &params(Roi::new(5, 5, 10, 10), 1))
        .unwrap_err();
    assert!(matches!(err, CellStatsError::RoiOutOfBounds { .. }));
}
