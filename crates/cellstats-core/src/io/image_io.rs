use std::path::Path;

use image::{GrayImage, ImageFormat, Luma, Rgb, RgbImage};
use ndarray::Array2;

use crate::error::Result;
use crate::frame::{GrayFrame, RgbFrame};

/// Load an image file as an 8-bit RGB frame.
///
/// Grayscale sources end up with three identical planes; 16-bit sources are
/// scaled down to 8 bits.
pub fn load_rgb(path: &Path) -> Result<RgbFrame> {
    let img = image::open(path)?.to_rgb8();
    let (w, h) = img.dimensions();
    let shape = (h as usize, w as usize);
    let mut red = Array2::<u8>::zeros(shape);
    let mut green = Array2::<u8>::zeros(shape);
    let mut blue = Array2::<u8>::zeros(shape);

    for (col, row, pixel) in img.enumerate_pixels() {
        let idx = [row as usize, col as usize];
        red[idx] = pixel.0[0];
        green[idx] = pixel.0[1];
        blue[idx] = pixel.0[2];
    }

    Ok(RgbFrame {
        red: GrayFrame::new(red),
        green: GrayFrame::new(green),
        blue: GrayFrame::new(blue),
    })
}

/// Save a gray frame as 8-bit PNG.
pub fn save_gray_png(frame: &GrayFrame, path: &Path) -> Result<()> {
    let h = frame.height();
    let w = frame.width();

    let mut img = GrayImage::new(w as u32, h as u32);
    for ((row, col), &val) in frame.data.indexed_iter() {
        img.put_pixel(col as u32, row as u32, Luma([val]));
    }

    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Save a binary mask as 8-bit PNG, foreground white.
pub fn save_mask_png(mask: &Array2<bool>, path: &Path) -> Result<()> {
    let gray = GrayFrame::new(mask.mapv(|v| if v { 255 } else { 0 }));
    save_gray_png(&gray, path)
}

/// Save an RGB frame as 8-bit PNG.
pub fn save_rgb_png(frame: &RgbFrame, path: &Path) -> Result<()> {
    let h = frame.height();
    let w = frame.width();

    let mut img = RgbImage::new(w as u32, h as u32);
    for row in 0..h {
        for col in 0..w {
            let r = frame.red.data[[row, col]];
            let g = frame.green.data[[row, col]];
            let b = frame.blue.data[[row, col]];
            img.put_pixel(col as u32, row as u32, Rgb([r, g, b]));
        }
    }

    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}
