use ndarray::Array2;

/// Morphological closing (dilation followed by erosion) with a 3x3 square kernel.
///
/// Fills one-pixel gaps and notches in foreground regions.
pub fn morphological_closing(mask: &Array2<bool>) -> Array2<bool> {
    let dilated = dilate(mask);
    erode(&dilated)
}

/// Visit the 3x3 neighbourhood of (row, col); out-of-bounds neighbours are
/// reported as background.
fn neighbourhood(mask: &Array2<bool>, row: usize, col: usize) -> impl Iterator<Item = bool> + '_ {
    let (h, w) = mask.dim();
    (-1..=1_i64).flat_map(move |dr| {
        (-1..=1_i64).map(move |dc| {
            let nr = row as i64 + dr;
            let nc = col as i64 + dc;
            nr >= 0 && nr < h as i64 && nc >= 0 && nc < w as i64 && mask[[nr as usize, nc as usize]]
        })
    })
}

/// Binary erosion: a pixel stays set only if its whole 3x3 neighbourhood is set.
pub fn erode(mask: &Array2<bool>) -> Array2<bool> {
    Array2::from_shape_fn(mask.dim(), |(row, col)| {
        mask[[row, col]] && neighbourhood(mask, row, col).all(|v| v)
    })
}

/// Binary dilation: a pixel becomes set if any pixel of its 3x3 neighbourhood is set.
pub fn dilate(mask: &Array2<bool>) -> Array2<bool> {
    Array2::from_shape_fn(mask.dim(), |(row, col)| {
        neighbourhood(mask, row, col).any(|v| v)
    })
}
