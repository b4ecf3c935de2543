//! Shared test utilities: synthetic images written to disk.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = tempfile::TempDir::new().unwrap();
//! let photo = write_jpeg(&tmp.path().join("a.jpg"), 200, 150);
//! let logo = write_png(&tmp.path().join("logo.png"), 32, 32, RED);
//! ```

use image::{DynamicImage, ImageEncoder, Rgb, RgbImage, Rgba, RgbaImage};
use std::path::{Path, PathBuf};

pub const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// Deterministic RGB test pattern.
pub fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

/// Write a gradient JPEG and return its path.
pub fn write_jpeg(path: &Path, width: u32, height: u32) -> PathBuf {
    let img = gradient(width, height);
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
    path.to_path_buf()
}

/// Write a solid-colour RGBA PNG and return its path.
pub fn write_png(path: &Path, width: u32, height: u32, color: Rgba<u8>) -> PathBuf {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, color))
        .save(path)
        .unwrap();
    path.to_path_buf()
}

/// Names of the entries in `dir`, sorted.
pub fn dir_listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
