use approx::assert_relative_eq;
use cellstats_core::consts::CORNER_CORRECTION;
use cellstats_core::detection::morphology::morphological_closing;
use cellstats_core::detection::particle::{circularity, perimeter};
use cellstats_core::detection::threshold::{histogram, isodata_level};
use cellstats_core::detection::{auto_threshold, label_components, Component, Particle, ThresholdRange};
use cellstats_core::frame::{GrayFrame, Roi};
use ndarray::{array, s, Array2};

fn two_level(fg: u8, bg: u8) -> GrayFrame {
    let mut data = Array2::from_elem((10, 10), bg);
    data.slice_mut(s![2..6, 2..6]).fill(fg);
    GrayFrame::new(data)
}

fn single(mask: Array2<bool>) -> Component {
    let (h, w) = mask.dim();
    let mut labeling = label_components(&mask, &Roi::full(w, h));
    labeling.components.remove(0)
}

// ---------------------------------------------------------------------------
// Threshold
// ---------------------------------------------------------------------------

#[test]
fn test_bimodal_level_is_midpoint() {
    let hist = histogram(&two_level(200, 10));
    assert_eq!(isodata_level(&hist), Some(105));
}

#[test]
fn test_polarity_selects_side() {
    let frame = two_level(50, 200);
    assert_eq!(auto_threshold(&frame, false), ThresholdRange::new(0, 125));
    assert_eq!(auto_threshold(&frame, true), ThresholdRange::new(126, 255));
}

#[test]
fn test_single_level_is_degenerate() {
    let frame = GrayFrame::new(Array2::from_elem((8, 8), 128));
    let range = auto_threshold(&frame, true);
    assert_eq!(range, ThresholdRange::new(0, 255));
    assert!(range.is_degenerate());
}

#[test]
fn test_only_extremes_falls_back_to_mid_level() {
    let frame = two_level(255, 0);
    assert_eq!(auto_threshold(&frame, true), ThresholdRange::new(129, 255));
}

// ---------------------------------------------------------------------------
// Closing
// ---------------------------------------------------------------------------

#[test]
fn test_closing_fills_single_pixel_hole() {
    let mut mask = Array2::from_elem((9, 9), false);
    mask.slice_mut(s![2..7, 2..7]).fill(true);
    mask[[4, 4]] = false;
    let closed = morphological_closing(&mask);
    assert!(closed[[4, 4]]);
    assert_eq!(closed.iter().filter(|&&v| v).count(), 25);
}

#[test]
fn test_closing_bridges_one_pixel_gap() {
    let mut mask = Array2::from_elem((7, 11), false);
    mask.slice_mut(s![2..5, 2..5]).fill(true);
    mask.slice_mut(s![2..5, 6..9]).fill(true);
    let closed = morphological_closing(&mask);
    assert!(closed[[3, 5]]);
}

#[test]
fn test_closing_erodes_image_edge() {
    let mask = Array2::from_elem((4, 4), true);
    let closed = morphological_closing(&mask);
    assert!(!closed[[0, 0]]);
    assert!(closed[[1, 1]]);
}

// ---------------------------------------------------------------------------
// Labelling
// ---------------------------------------------------------------------------

#[test]
fn test_diagonal_pixels_join() {
    let mask = array![
        [false, false, false, false],
        [false, true, false, false],
        [false, false, true, false],
        [false, false, false, false],
    ];
    let labeling = label_components(&mask, &Roi::full(4, 4));
    assert_eq!(labeling.components.len(), 1);
    assert_eq!(labeling.components[0].area(), 2);
}

#[test]
fn test_u_shape_merges_into_one_label() {
    let mask = array![
        [true, false, true],
        [true, false, true],
        [true, true, true],
    ];
    let labeling = label_components(&mask, &Roi::full(3, 3));
    assert_eq!(labeling.components.len(), 1);
    assert!(labeling.labels.iter().all(|&l| l <= 1));
}

#[test]
fn test_labels_follow_raster_order() {
    let mask = array![
        [false, false, false, true],
        [true, false, false, false],
        [false, false, false, false],
    ];
    let labeling = label_components(&mask, &Roi::full(4, 3));
    assert_eq!(labeling.labels[[0, 3]], 1);
    assert_eq!(labeling.labels[[1, 0]], 2);
}

#[test]
fn test_pixels_outside_roi_are_ignored() {
    let mask = Array2::from_elem((6, 6), true);
    let roi = Roi::new(1, 1, 3, 2);
    let labeling = label_components(&mask, &roi);
    assert_eq!(labeling.components.len(), 1);
    assert_eq!(labeling.components[0].area(), 6);
    assert_eq!(labeling.labels[[0, 0]], 0);
    assert!(labeling.components[0].bbox.touches(&roi));
}

// ---------------------------------------------------------------------------
// Particle shape and intensity
// ---------------------------------------------------------------------------

#[test]
fn test_rectangle_perimeter_cuts_corners() {
    let mut mask = Array2::from_elem((9, 14), false);
    mask.slice_mut(s![2..7, 2..12]).fill(true);
    let component = single(mask);
    assert_relative_eq!(perimeter(&component), 30.0 - 4.0 * CORNER_CORRECTION);
}

#[test]
fn test_single_pixel_is_a_diamond() {
    let mut mask = Array2::from_elem((3, 3), false);
    mask[[1, 1]] = true;
    let component = single(mask);
    let p = perimeter(&component);
    assert_relative_eq!(p, 4.0 * std::f64::consts::SQRT_2 - 4.0, epsilon = 1e-12);
    assert_relative_eq!(circularity(1, p), 1.0);
}

#[test]
fn test_holes_do_not_add_perimeter() {
    let mut mask = Array2::from_elem((7, 7), false);
    mask.slice_mut(s![1..6, 1..6]).fill(true);
    mask[[3, 3]] = false;
    let component = single(mask);
    assert_eq!(component.area(), 24);
    assert_relative_eq!(perimeter(&component), 20.0 - 4.0 * CORNER_CORRECTION);
}

#[test]
fn test_measurements_describe_block() {
    let mut data = Array2::from_elem((6, 6), 0u8);
    data.slice_mut(s![1..3, 2..5]).fill(100);
    data[[1, 2]] = 40;
    let mask = data.mapv(|v| v > 0);
    let component = single(mask);
    let particle = Particle::measure(&component, &GrayFrame::new(data));
    assert_eq!(particle.area, 6);
    assert_eq!(particle.min, 40);
    assert_eq!(particle.max, 100);
    assert_relative_eq!(particle.mean, 540.0 / 6.0);
    assert_relative_eq!(particle.x, 3.5);
    assert_relative_eq!(particle.y, 2.0);
    assert_relative_eq!(particle.integrated_density, 540.0);
    assert_relative_eq!(particle.percent_fill, 100.0);
    let values = particle.measurements();
    assert_eq!(values[6], 2.0);
    assert_eq!(values[7], 1.0);
    assert_eq!(values[8], 3.0);
    assert_eq!(values[9], 2.0);
}
