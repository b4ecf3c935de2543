//! Image I/O backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations the batch driver needs
//! from the outside world: decode an image from a path, and encode an image to
//! a path. Everything between those two calls is pure pixel work in
//! [`operations`](super::operations).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), pure Rust, built on the
//! `image` crate. Tests substitute a recording mock.

use super::params::Quality;
use image::{DynamicImage, ImageFormat};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("Failed to encode {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
}

/// Raster formats a watermarked image can be written as.
///
/// The format always follows the original file's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg,
    Bmp,
    Tiff,
    WebP,
}

impl OutputFormat {
    /// Pick the output format from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(OutputFormat::Png),
            "jpg" | "jpeg" => Some(OutputFormat::Jpeg),
            "bmp" => Some(OutputFormat::Bmp),
            "tif" | "tiff" => Some(OutputFormat::Tiff),
            "webp" => Some(OutputFormat::WebP),
            _ => None,
        }
    }

    /// Whether the format stores an alpha channel. Images bound for formats
    /// without one are flattened to RGB before encoding.
    pub fn supports_alpha(self) -> bool {
        !matches!(self, OutputFormat::Jpeg)
    }

    pub fn image_format(self) -> ImageFormat {
        match self {
            OutputFormat::Png => ImageFormat::Png,
            OutputFormat::Jpeg => ImageFormat::Jpeg,
            OutputFormat::Bmp => ImageFormat::Bmp,
            OutputFormat::Tiff => ImageFormat::Tiff,
            OutputFormat::WebP => ImageFormat::WebP,
        }
    }
}

/// Trait for image I/O backends.
///
/// `Sync` so a backend can be shared by reference with the printer thread's
/// owner without extra wrapping.
pub trait ImageBackend: Sync {
    /// Decode the image at `path`.
    fn load(&self, path: &Path) -> Result<DynamicImage, BackendError>;

    /// Encode `image` as `format` and write it to `path`.
    ///
    /// Implementations must not leave a partial file at `path` on failure.
    fn save(
        &self,
        image: &DynamicImage,
        path: &Path,
        format: OutputFormat,
        quality: Quality,
    ) -> Result<(), BackendError>;
}
