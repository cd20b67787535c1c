//! Diagnostic images. Nothing here affects measurements.

use ndarray::{Array2, Zip};

use crate::frame::{GrayFrame, RgbFrame};

/// Paint every labelled pixel with `color` over the gray intensity image.
pub fn render_overlay(base: &GrayFrame, labels: &Array2<u32>, color: [u8; 3]) -> RgbFrame {
    let mut out = RgbFrame::from_gray(base);
    let [r, g, b] = color;
    Zip::from(&mut out.red.data)
        .and(&mut out.green.data)
        .and(&mut out.blue.data)
        .and(labels)
        .for_each(|pr, pg, pb, &label| {
            if label > 0 {
                *pr = r;
                *pg = g;
                *pb = b;
            }
        });
    out
}

/// Each particle label in its own colour on black.
pub fn render_segmentation(labels: &Array2<u32>) -> RgbFrame {
    let (h, w) = labels.dim();
    let mut red = Array2::<u8>::zeros((h, w));
    let mut green = Array2::<u8>::zeros((h, w));
    let mut blue = Array2::<u8>::zeros((h, w));
    for ((row, col), &label) in labels.indexed_iter() {
        if label == 0 {
            continue;
        }
        let [r, g, b] = label_color(label);
        red[[row, col]] = r;
        green[[row, col]] = g;
        blue[[row, col]] = b;
    }
    RgbFrame {
        red: GrayFrame::new(red),
        green: GrayFrame::new(green),
        blue: GrayFrame::new(blue),
    }
}

/// Fully saturated colour with the hue stepped by the golden angle, so
/// neighbouring labels differ clearly.
pub fn label_color(label: u32) -> [u8; 3] {
    let hue = (label as f64 * 137.507_764) % 360.0;
    hue_to_rgb(hue)
}

fn hue_to_rgb(hue: f64) -> [u8; 3] {
    let sector = hue / 60.0;
    let x = 1.0 - (sector % 2.0 - 1.0).abs();
    let (r, g, b) = match sector as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    };
    let scale = |v: f64| (v * 255.0).round() as u8;
    [scale(r), scale(g), scale(b)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_hues() {
        assert_eq!(hue_to_rgb(0.0), [255, 0, 0]);
        assert_eq!(hue_to_rgb(120.0), [0, 255, 0]);
        assert_eq!(hue_to_rgb(240.0), [0, 0, 255]);
    }
}
