use ndarray::Array2;

use crate::frame::Roi;

/// Inclusive pixel bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_row: usize,
    pub max_row: usize,
    pub min_col: usize,
    pub max_col: usize,
}

impl BoundingBox {
    fn at(row: usize, col: usize) -> Self {
        Self {
            min_row: row,
            max_row: row,
            min_col: col,
            max_col: col,
        }
    }

    fn extend(&mut self, row: usize, col: usize) {
        self.min_row = self.min_row.min(row);
        self.max_row = self.max_row.max(row);
        self.min_col = self.min_col.min(col);
        self.max_col = self.max_col.max(col);
    }

    pub fn width(&self) -> usize {
        self.max_col - self.min_col + 1
    }

    pub fn height(&self) -> usize {
        self.max_row - self.min_row + 1
    }

    /// True if the box reaches any edge of the ROI.
    pub fn touches(&self, roi: &Roi) -> bool {
        self.min_row == roi.y
            || self.min_col == roi.x
            || self.max_row + 1 >= roi.y + roi.height
            || self.max_col + 1 >= roi.x + roi.width
    }
}

/// One 8-connected foreground component.
#[derive(Clone, Debug, PartialEq)]
pub struct Component {
    /// Label in raster order of the component's first pixel, starting at 1.
    pub label: u32,
    /// Member pixels as (row, col), in raster order.
    pub pixels: Vec<(usize, usize)>,
    pub bbox: BoundingBox,
}

impl Component {
    pub fn area(&self) -> usize {
        self.pixels.len()
    }
}

/// Result of connected component labelling.
#[derive(Clone, Debug, PartialEq)]
pub struct Labeling {
    /// Per-pixel label, 0 for background.
    pub labels: Array2<u32>,
    pub components: Vec<Component>,
}

/// Two-pass union-find labelling of the mask pixels inside `roi`, using
/// 8-connectivity. Labels follow the raster order of each component's first
/// pixel, so the enumeration is deterministic.
pub fn label_components(mask: &Array2<bool>, roi: &Roi) -> Labeling {
    let (h, w) = mask.dim();
    let mut labels = Array2::<u32>::zeros((h, w));
    let row_end = (roi.y + roi.height).min(h);
    let col_end = (roi.x + roi.width).min(w);
    if roi.y >= row_end || roi.x >= col_end {
        return Labeling {
            labels,
            components: Vec::new(),
        };
    }

    // Index 0 unused; provisional labels start at 1.
    let mut parent: Vec<u32> = vec![0];

    // Pass 1: provisional labels from the already-visited neighbours
    // (upper-left, up, upper-right, left).
    for row in roi.y..row_end {
        for col in roi.x..col_end {
            if !mask[[row, col]] {
                continue;
            }

            let mut neighbours = [0u32; 4];
            if row > roi.y {
                if col > roi.x {
                    neighbours[0] = labels[[row - 1, col - 1]];
                }
                neighbours[1] = labels[[row - 1, col]];
                if col + 1 < col_end {
                    neighbours[2] = labels[[row - 1, col + 1]];
                }
            }
            if col > roi.x {
                neighbours[3] = labels[[row, col - 1]];
            }

            let smallest = neighbours.iter().copied().filter(|&l| l > 0).min();
            match smallest {
                None => {
                    let next = parent.len() as u32;
                    parent.push(next);
                    labels[[row, col]] = next;
                }
                Some(label) => {
                    labels[[row, col]] = label;
                    for &other in neighbours.iter().filter(|&&l| l > 0 && l != label) {
                        union(&mut parent, label, other);
                    }
                }
            }
        }
    }

    // Pass 2: resolve roots and renumber in order of first appearance.
    let mut final_label = vec![0u32; parent.len()];
    let mut components: Vec<Component> = Vec::new();

    for row in roi.y..row_end {
        for col in roi.x..col_end {
            let provisional = labels[[row, col]];
            if provisional == 0 {
                continue;
            }
            let root = find(&parent, provisional) as usize;
            if final_label[root] == 0 {
                components.push(Component {
                    label: components.len() as u32 + 1,
                    pixels: Vec::new(),
                    bbox: BoundingBox::at(row, col),
                });
                final_label[root] = components.len() as u32;
            }
            let label = final_label[root];
            labels[[row, col]] = label;
            let component = &mut components[label as usize - 1];
            component.pixels.push((row, col));
            component.bbox.extend(row, col);
        }
    }

    Labeling { labels, components }
}

fn find(parent: &[u32], mut x: u32) -> u32 {
    while parent[x as usize] != x {
        x = parent[x as usize];
    }
    x
}

fn union(parent: &mut [u32], a: u32, b: u32) {
    let ra = find(parent, a);
    let rb = find(parent, b);
    if ra != rb {
        let (small, big) = if ra < rb { (ra, rb) } else { (rb, ra) };
        parent[big as usize] = small;
    }
}
