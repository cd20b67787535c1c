pub mod image_io;
pub mod metadata;

pub use image_io::{load_rgb, save_gray_png, save_mask_png, save_rgb_png};
pub use metadata::{properties_path, read_properties, MetadataOverrides};
