use std::path::{Path, PathBuf};

use cellstats_core::channel::ChannelRole;
use cellstats_core::config::{AnalysisConfig, ImageType};
use cellstats_core::frame::Roi;
use image::{GrayImage, Luma, Rgb, RgbImage};
use ndarray::{s, Array2};

/// Uniform 8-bit plane of the given size.
pub fn plane(height: usize, width: usize, value: u8) -> Array2<u8> {
    Array2::from_elem((height, width), value)
}

/// Fill a `h` x `w` rectangle whose top-left corner is (row, col).
pub fn fill_rect(data: &mut Array2<u8>, row: usize, col: usize, h: usize, w: usize, value: u8) {
    data.slice_mut(s![row..row + h, col..col + w]).fill(value);
}

/// Write a gray plane as PNG into `dir`.
pub fn write_gray_png(dir: &Path, name: &str, data: &Array2<u8>) -> PathBuf {
    let (h, w) = data.dim();
    let mut img = GrayImage::new(w as u32, h as u32);
    for ((row, col), &v) in data.indexed_iter() {
        img.put_pixel(col as u32, row as u32, Luma([v]));
    }
    let path = dir.join(name);
    img.save(&path).expect("write gray png");
    path
}

/// Write three planes as an RGB PNG into `dir`.
pub fn write_rgb_png(
    dir: &Path,
    name: &str,
    red: &Array2<u8>,
    green: &Array2<u8>,
    blue: &Array2<u8>,
) -> PathBuf {
    let (h, w) = red.dim();
    let mut img = RgbImage::new(w as u32, h as u32);
    for row in 0..h {
        for col in 0..w {
            img.put_pixel(
                col as u32,
                row as u32,
                Rgb([red[[row, col]], green[[row, col]], blue[[row, col]]]),
            );
        }
    }
    let path = dir.join(name);
    img.save(&path).expect("write rgb png");
    path
}

/// Create an empty file; the indexer only looks at names.
pub fn touch(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"").expect("touch");
    path
}

/// PNG configuration with a full-frame ROI for `size` x `size` images.
pub fn png_config(input: &Path, output: &Path, labels: Vec<ChannelRole>, size: usize) -> AnalysisConfig {
    AnalysisConfig {
        input_dir: input.to_path_buf(),
        output_dir: output.to_path_buf(),
        num_channels: labels.len(),
        channel_labels: labels,
        analysis_roi: Roi::full(size, size),
        image_type: ImageType::Png,
        ..AnalysisConfig::default()
    }
}

/// Brightfield frame: one dark 20x20 cell (area 400) on a light background.
pub fn brightfield_frame(size: usize) -> Array2<u8> {
    let mut data = plane(size, size, 200);
    fill_rect(&mut data, 10, 10, 20, 20, 50);
    data
}

/// Blue frame: two bright blobs of 10 and 20 pixels on a dark background.
pub fn blue_frame(size: usize) -> Array2<u8> {
    let mut data = plane(size, size, 10);
    fill_rect(&mut data, 12, 12, 2, 5, 200);
    fill_rect(&mut data, 20, 20, 4, 5, 200);
    data
}

/// Well A1 with a brightfield and a blue channel, written as gray PNGs.
pub fn write_two_channel_well(dir: &Path, prefix: &str, size: usize) {
    let bf = brightfield_frame(size);
    let blue = blue_frame(size);
    let zeros = plane(size, size, 0);
    write_rgb_png(dir, &format!("{prefix}_ch00.png"), &bf, &bf, &bf);
    write_rgb_png(dir, &format!("{prefix}_ch01.png"), &zeros, &zeros, &blue);
}
