//! Image processing for watermarking, pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode / encode** | `image` (PNG, JPEG, BMP, TIFF, WebP) |
//! | **Text** | `font8x8` bitmap glyphs, integer scaled |
//! | **Rotate** | `imageops::rotate*` for quarter turns, `imageproc` otherwise |
//! | **Composite** | integer Porter-Duff "over" |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for placement and tiling geometry (unit testable)
//! - **Parameters**: Data structures describing a watermark
//! - **Text**: Bitmap-font rasterization
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: Pixel work combining calculations, text, and decoded images

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;
mod text;

pub use backend::{BackendError, ImageBackend, OutputFormat};
pub use calculations::{MARGIN, anchor_position, rotated_bounds, tile_count};
pub use operations::{PreparedWatermark, composite, finish};
pub use params::{Anchor, Angle, Opacity, Placement, Quality, WatermarkSpec};
pub use rust_backend::{RustBackend, is_supported_image, supported_input_extensions};
pub use text::text_size;
