//! Pure Rust image I/O backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (PNG, JPEG, BMP, TIFF, WebP) | `image::ImageReader` with content sniffing |
//! | Encode JPEG | `image::codecs::jpeg::JpegEncoder` at the configured quality |
//! | Encode other formats | `DynamicImage::write_to` |
//! | Atomic write | `tempfile::NamedTempFile` in the destination dir, then `persist` |

use super::backend::{BackendError, ImageBackend, OutputFormat};
use super::params::Quality;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

/// Extensions the batch accepts, paired with the decoder they need.
const PHOTO_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("png", ImageFormat::Png),
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("bmp", ImageFormat::Bmp),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    PHOTO_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled() && fmt.writing_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the image file extensions that can be both decoded and re-encoded.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// True when `path` has one of the [supported extensions](supported_input_extensions).
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| {
            supported_input_extensions()
                .iter()
                .any(|s| s.eq_ignore_ascii_case(e))
        })
}

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode an image into memory so nothing touches disk until encoding succeeds.
fn encode(
    image: &DynamicImage,
    format: OutputFormat,
    quality: Quality,
) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Cursor::new(Vec::new());
    match format {
        OutputFormat::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(&mut buf, quality.value() as u8);
            image.write_with_encoder(encoder)?;
        }
        other => image.write_to(&mut buf, other.image_format())?,
    }
    Ok(buf.into_inner())
}

impl ImageBackend for RustBackend {
    fn load(&self, path: &Path) -> Result<DynamicImage, BackendError> {
        ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .map_err(|source| BackendError::Decode {
                path: path.to_path_buf(),
                source,
            })
    }

    fn save(
        &self,
        image: &DynamicImage,
        path: &Path,
        format: OutputFormat,
        quality: Quality,
    ) -> Result<(), BackendError> {
        let bytes = encode(image, format, quality).map_err(|source| BackendError::Encode {
            path: path.to_path_buf(),
            source,
        })?;

        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::Builder::new()
            .prefix(".watermark-")
            .tempfile_in(dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| BackendError::Io(e.error))?;

        debug!(path = %path.display(), bytes = bytes.len(), "wrote image");
        Ok(())
    }
}
