//! Watermark compositing.
//!
//! These functions combine the geometry in [`calculations`](super::calculations)
//! with pixel work on `image` buffers. Nothing here touches the filesystem:
//! the batch driver loads images through a backend and hands them in.
//!
//! ## Pipeline per image
//!
//! ```text
//! base ─► RGBA ─┐
//!               ├─► layer (transparent, base-sized) ◄─ elements at anchor / tiled cell
//!               └─► base OVER layer ─► flatten (JPEG) ─► encode
//! ```
//!
//! The elements themselves (rendered text, resized logo, or the repeated
//! cell) only depend on the [`WatermarkSpec`], so they are built once per
//! batch as a [`PreparedWatermark`] and reused for every file.

use super::backend::OutputFormat;
use super::calculations::{
    IMAGE_CELL, anchor_position, cell_size, rotated_bounds, tile_origins,
};
use super::params::{Anchor, Angle, Opacity, Placement, WatermarkSpec};
use super::text::render_text;
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Blend `src` over `dst` in place (Porter-Duff "over", straight alpha).
///
/// Integer arithmetic, exact at the extremes: a transparent source leaves
/// `dst` untouched, an opaque source replaces it, and a source over a
/// transparent destination is copied as-is.
fn blend_pixel(dst: &mut Rgba<u8>, src: &Rgba<u8>) {
    let sa = src[3] as u32;
    if sa == 0 {
        return;
    }
    if sa == 255 {
        *dst = *src;
        return;
    }
    let da = dst[3] as u32;
    let src_w = sa * 255;
    let dst_w = da * (255 - sa);
    let out_w = src_w + dst_w;
    for c in 0..3 {
        let num = src[c] as u32 * src_w + dst[c] as u32 * dst_w;
        dst[c] = ((num + out_w / 2) / out_w) as u8;
    }
    dst[3] = ((out_w + 127) / 255) as u8;
}

/// Blend `src` over `dst` with its top-left corner at `(x, y)`.
///
/// Offsets may be negative or push `src` past the far edges; only the
/// overlapping region is touched.
pub fn paste_over(dst: &mut RgbaImage, src: &RgbaImage, x: i64, y: i64) {
    let (dw, dh) = (dst.width() as i64, dst.height() as i64);
    let (sw, sh) = (src.width() as i64, src.height() as i64);

    let (x0, y0) = (x.max(0), y.max(0));
    let (x1, y1) = ((x + sw).min(dw), (y + sh).min(dh));

    for dy in y0..y1 {
        for dx in x0..x1 {
            let s = src.get_pixel((dx - x) as u32, (dy - y) as u32);
            blend_pixel(dst.get_pixel_mut(dx as u32, dy as u32), s);
        }
    }
}

/// Composite a base-sized layer over the base image.
pub fn alpha_composite(base: &mut RgbaImage, layer: &RgbaImage) {
    debug_assert_eq!(base.dimensions(), layer.dimensions());
    for (dst, src) in base.pixels_mut().zip(layer.pixels()) {
        blend_pixel(dst, src);
    }
}

/// Multiply every pixel's alpha by `opacity` in one pass over the alpha channel.
pub fn scale_alpha(image: &mut RgbaImage, opacity: Opacity) {
    let factor = opacity.value();
    if factor >= 1.0 {
        return;
    }
    let lut: [u8; 256] = std::array::from_fn(|a| (a as f32 * factor) as u8);
    for px in image.chunks_exact_mut(4) {
        px[3] = lut[px[3] as usize];
    }
}

/// Rotate counter-clockwise by `angle`, growing the canvas so no content is cut.
///
/// Quarter turns are lossless transposes. Other angles sample with nearest
/// neighbour; uncovered corners are transparent.
pub fn rotate_expand(image: &RgbaImage, angle: Angle) -> RgbaImage {
    if angle.is_zero() {
        return image.clone();
    }
    match angle.degrees() {
        // imageops rotations turn clockwise
        90 => imageops::rotate270(image),
        180 => imageops::rotate180(image),
        270 => imageops::rotate90(image),
        deg => {
            let (w, h) = rotated_bounds(image.dimensions(), deg);
            let mut canvas = RgbaImage::from_pixel(w, h, TRANSPARENT);
            // Pixel centres sit on integer coordinates, so the middle of an
            // n-pixel axis is (n - 1) / 2. Projection::rotate turns clockwise
            // for positive theta in image space.
            let center = |n: u32| (n as f32 - 1.0) / 2.0;
            let projection = Projection::translate(center(w), center(h))
                * Projection::rotate(-(deg as f32).to_radians())
                * Projection::translate(-center(image.width()), -center(image.height()));
            warp_into(image, &projection, Interpolation::Nearest, TRANSPARENT, &mut canvas);
            canvas
        }
    }
}

/// Render the text element: white glyphs at `255 × opacity` alpha, unrotated.
pub fn text_element(text: &str, scale: u32, opacity: Opacity) -> Option<RgbaImage> {
    render_text(text, scale, Rgba([255, 255, 255, opacity.alpha()]))
}

/// Build the image element: RGBA, resized to the 100×100 cell, alpha scaled.
pub fn image_element(source: &DynamicImage, opacity: Opacity) -> RgbaImage {
    let rgba = source.to_rgba8();
    let mut cell = if rgba.dimensions() == (IMAGE_CELL, IMAGE_CELL) {
        rgba
    } else {
        imageops::resize(&rgba, IMAGE_CELL, IMAGE_CELL, FilterType::CatmullRom)
    };
    scale_alpha(&mut cell, opacity);
    cell
}

/// A rotated element and the size its anchor offset is computed from.
///
/// Text is anchored by its unrotated box and the rotated pixels are pasted
/// from that corner; the image is anchored by its rotated size.
#[derive(Debug, Clone)]
struct FixedElement {
    pixels: RgbaImage,
    anchor_size: (u32, u32),
}

#[derive(Debug, Clone)]
enum Layout {
    /// Elements already rotated, each placed independently at the anchor.
    Fixed {
        anchor: Anchor,
        elements: Vec<FixedElement>,
    },
    /// One rotated cell stamped on a grid.
    Repeated { spacing: u32, cell: RgbaImage },
    /// No text and no image: compositing is a no-op.
    Empty,
}

/// Watermark elements rendered once per batch, ready to stamp onto any base.
#[derive(Debug, Clone)]
pub struct PreparedWatermark {
    layout: Layout,
}

impl PreparedWatermark {
    /// Render the watermark described by `spec`.
    ///
    /// `logo` is the decoded watermark image when `spec.image` is set; the
    /// caller owns loading it so decode errors surface before any file is
    /// processed.
    pub fn new(spec: &WatermarkSpec, logo: Option<&DynamicImage>) -> Self {
        let text = spec
            .text()
            .and_then(|t| text_element(t, spec.text_scale, spec.opacity));
        let image = logo.map(|l| image_element(l, spec.opacity));

        if text.is_none() && image.is_none() {
            return Self {
                layout: Layout::Empty,
            };
        }

        let layout = match spec.placement {
            Placement::Fixed(anchor) => {
                let text = text.as_ref().map(|t| FixedElement {
                    pixels: rotate_expand(t, spec.angle),
                    anchor_size: t.dimensions(),
                });
                let image = image.as_ref().map(|i| {
                    let pixels = rotate_expand(i, spec.angle);
                    let anchor_size = pixels.dimensions();
                    FixedElement {
                        pixels,
                        anchor_size,
                    }
                });
                Layout::Fixed {
                    anchor,
                    elements: text.into_iter().chain(image).collect(),
                }
            }
            Placement::Repeated { spacing } => {
                let elements: Vec<&RgbaImage> = text.iter().chain(image.iter()).collect();
                let sizes: Vec<(u32, u32)> = elements.iter().map(|e| e.dimensions()).collect();
                let (cw, ch) = cell_size(&sizes);
                let mut cell = RgbaImage::from_pixel(cw, ch, TRANSPARENT);
                for element in elements {
                    let (x, y) = anchor_position((cw, ch), element.dimensions(), Anchor::TopLeft);
                    paste_over(&mut cell, element, x, y);
                }
                Layout::Repeated {
                    spacing,
                    cell: rotate_expand(&cell, spec.angle),
                }
            }
        };

        Self { layout }
    }

    /// True when there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        matches!(self.layout, Layout::Empty)
    }

    /// Draw the watermark onto a fresh transparent layer of the given size.
    pub fn layer(&self, width: u32, height: u32) -> RgbaImage {
        let mut layer = RgbaImage::from_pixel(width, height, TRANSPARENT);
        match &self.layout {
            Layout::Empty => {}
            Layout::Fixed { anchor, elements } => {
                for element in elements {
                    let (x, y) = anchor_position((width, height), element.anchor_size, *anchor);
                    paste_over(&mut layer, &element.pixels, x, y);
                }
            }
            Layout::Repeated { spacing, cell } => {
                let xs = tile_origins(width, *spacing);
                let ys = tile_origins(height, *spacing);
                for &y in &ys {
                    for &x in &xs {
                        paste_over(&mut layer, cell, x, y);
                    }
                }
            }
        }
        layer
    }
}

/// Apply a prepared watermark to `base`, returning the RGBA result.
///
/// The base is converted to RGBA, a transparent layer of the same size
/// receives the watermark, and the layer is composited over the base once.
pub fn composite(base: &DynamicImage, watermark: &PreparedWatermark) -> RgbaImage {
    let mut out = base.to_rgba8();
    if watermark.is_empty() {
        return out;
    }
    let layer = watermark.layer(out.width(), out.height());
    alpha_composite(&mut out, &layer);
    out
}

/// Convert a composited image into the pixel layout `format` can store.
///
/// Formats without alpha get RGB with the alpha channel discarded.
pub fn finish(image: RgbaImage, format: OutputFormat) -> DynamicImage {
    let rgba = DynamicImage::ImageRgba8(image);
    if format.supports_alpha() {
        rgba
    } else {
        DynamicImage::ImageRgb8(rgba.to_rgb8())
    }
}
