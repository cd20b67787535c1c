use std::collections::VecDeque;
use std::f64::consts::PI;

use ndarray::Array2;

use crate::consts::CORNER_CORRECTION;
use crate::frame::GrayFrame;

use super::components::{BoundingBox, Component};

/// Names of the measured columns, in report order.
pub const MEASUREMENT_COLUMNS: [&str; 14] = [
    "Area", "Mean", "Min", "Max", "X", "Y", "BX", "BY", "Width", "Height", "Perim.", "Circ.",
    "IntDen", "%Fill",
];

/// One accepted connected component with its pixel-space measurements.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    /// Label in the segmentation image.
    pub label: u32,
    /// Area in pixels.
    pub area: usize,
    pub mean: f64,
    pub min: u8,
    pub max: u8,
    /// Centroid column, pixel centres at +0.5.
    pub x: f64,
    /// Centroid row, pixel centres at +0.5.
    pub y: f64,
    pub bbox: BoundingBox,
    pub perimeter: f64,
    pub circularity: f64,
    /// Sum of intensities.
    pub integrated_density: f64,
    /// Share of the bounding box covered by the particle, in percent.
    pub percent_fill: f64,
}

impl Particle {
    /// Measure a component against the intensities of `surface`.
    pub fn measure(component: &Component, surface: &GrayFrame) -> Self {
        let area = component.area();
        let (mut sum, mut sum_row, mut sum_col) = (0.0, 0.0, 0.0);
        let (mut min, mut max) = (u8::MAX, u8::MIN);
        for &(row, col) in &component.pixels {
            let v = surface.data[[row, col]];
            sum += v as f64;
            sum_row += row as f64 + 0.5;
            sum_col += col as f64 + 0.5;
            min = min.min(v);
            max = max.max(v);
        }
        let n = area.max(1) as f64;
        let perimeter = perimeter(component);
        let bbox = component.bbox;

        Self {
            label: component.label,
            area,
            mean: sum / n,
            min,
            max,
            x: sum_col / n,
            y: sum_row / n,
            bbox,
            perimeter,
            circularity: circularity(area, perimeter),
            integrated_density: sum,
            percent_fill: 100.0 * area as f64 / (bbox.width() * bbox.height()) as f64,
        }
    }

    /// Values matching [`MEASUREMENT_COLUMNS`].
    pub fn measurements(&self) -> [f64; 14] {
        [
            self.area as f64,
            self.mean,
            self.min as f64,
            self.max as f64,
            self.x,
            self.y,
            self.bbox.min_col as f64,
            self.bbox.min_row as f64,
            self.bbox.width() as f64,
            self.bbox.height() as f64,
            self.perimeter,
            self.circularity,
            self.integrated_density,
            self.percent_fill,
        ]
    }
}

/// `4π·area/perimeter²`, clamped to 1; zero when the perimeter is zero.
pub fn circularity(area: usize, perimeter: f64) -> f64 {
    if perimeter <= 0.0 {
        return 0.0;
    }
    (4.0 * PI * area as f64 / (perimeter * perimeter)).min(1.0)
}

/// Length of the traced outer outline: boundary pixel edges minus a fixed
/// correction per corner. Interior holes do not contribute.
pub fn perimeter(component: &Component) -> f64 {
    let filled = filled_footprint(component);
    let (h, w) = filled.dim();
    let at = |r: isize, c: isize| -> bool {
        r >= 0 && c >= 0 && (r as usize) < h && (c as usize) < w && filled[[r as usize, c as usize]]
    };

    let mut edges = 0usize;
    for ((r, c), &inside) in filled.indexed_iter() {
        if !inside {
            continue;
        }
        let (r, c) = (r as isize, c as isize);
        edges += [(r - 1, c), (r + 1, c), (r, c - 1), (r, c + 1)]
            .iter()
            .filter(|&&(nr, nc)| !at(nr, nc))
            .count();
    }

    // Each grid vertex sees a 2x2 block of pixels.
    let mut corners = 0usize;
    for vr in 0..=h as isize {
        for vc in 0..=w as isize {
            let tl = at(vr - 1, vc - 1);
            let tr = at(vr - 1, vc);
            let bl = at(vr, vc - 1);
            let br = at(vr, vc);
            corners += match [tl, tr, bl, br].iter().filter(|&&v| v).count() {
                1 | 3 => 1,
                2 if tl == br => 2,
                _ => 0,
            };
        }
    }

    edges as f64 - corners as f64 * CORNER_CORRECTION
}

/// Component pixels within its bounding box, with enclosed holes filled.
fn filled_footprint(component: &Component) -> Array2<bool> {
    let bbox = component.bbox;
    // One pixel of padding so the outside is connected around the shape.
    let (h, w) = (bbox.height() + 2, bbox.width() + 2);
    let mut member = Array2::from_elem((h, w), false);
    for &(row, col) in &component.pixels {
        member[[row - bbox.min_row + 1, col - bbox.min_col + 1]] = true;
    }

    let mut outside = Array2::from_elem((h, w), false);
    let mut queue = VecDeque::from([(0usize, 0usize)]);
    outside[[0, 0]] = true;
    while let Some((r, c)) = queue.pop_front() {
        let candidates = [
            (r.wrapping_sub(1), c),
            (r + 1, c),
            (r, c.wrapping_sub(1)),
            (r, c + 1),
        ];
        for (nr, nc) in candidates {
            if nr < h && nc < w && !member[[nr, nc]] && !outside[[nr, nc]] {
                outside[[nr, nc]] = true;
                queue.push_back((nr, nc));
            }
        }
    }

    outside.mapv(|o| !o)
}
