//! Text rasterization with the built-in 8×8 bitmap font.
//!
//! The font ships inside the binary (`font8x8`), so text watermarks need no
//! font file on disk and render identically everywhere. Glyphs are scaled up
//! by an integer factor with nearest-neighbour, one scaled pixel of spacing
//! between glyphs and between lines. Characters the font does not cover are
//! drawn as `?`.

use font8x8::{BASIC_FONTS, UnicodeFonts};
use image::{Rgba, RgbaImage};

const GLYPH_SIZE: u32 = 8;

fn glyph(ch: char) -> [u8; 8] {
    BASIC_FONTS
        .get(ch)
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

/// Measure the tight bounding box of `text` at the given scale.
///
/// Returns `(0, 0)` for empty text.
pub fn text_size(text: &str, scale: u32) -> (u32, u32) {
    let scale = scale.max(1);
    let advance = (GLYPH_SIZE + 1) * scale;
    let lines: Vec<&str> = text.lines().collect();
    let widest = lines.iter().map(|l| l.chars().count() as u32).max().unwrap_or(0);
    if widest == 0 {
        return (0, 0);
    }
    let width = widest * advance - scale;
    let height = lines.len() as u32 * advance - scale;
    (width, height)
}

/// Render `text` into a transparent buffer sized exactly to the text.
///
/// Every set glyph pixel gets `color`; everything else stays transparent.
/// Returns `None` when there is nothing to draw.
pub fn render_text(text: &str, scale: u32, color: Rgba<u8>) -> Option<RgbaImage> {
    let scale = scale.max(1);
    let (width, height) = text_size(text, scale);
    if width == 0 || height == 0 {
        return None;
    }

    let advance = (GLYPH_SIZE + 1) * scale;
    let mut buf = RgbaImage::new(width, height);

    for (line_idx, line) in text.lines().enumerate() {
        let top = line_idx as u32 * advance;
        for (col_idx, ch) in line.chars().enumerate() {
            let left = col_idx as u32 * advance;
            for (row, bits) in glyph(ch).iter().enumerate() {
                for col in 0..GLYPH_SIZE {
                    // Bit 0 is the leftmost pixel
                    if (bits >> col) & 1 == 0 {
                        continue;
                    }
                    let x0 = left + col * scale;
                    let y0 = top + row as u32 * scale;
                    for dy in 0..scale {
                        for dx in 0..scale {
                            buf.put_pixel(x0 + dx, y0 + dy, color);
                        }
                    }
                }
            }
        }
    }

    Some(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    #[test]
    fn size_single_char() {
        assert_eq!(text_size("A", 1), (8, 8));
        assert_eq!(text_size("A", 3), (24, 24));
    }

    #[test]
    fn size_includes_gap_between_glyphs_only() {
        // 4 glyphs of 8 plus 3 gaps of 1
        assert_eq!(text_size("TEST", 1), (35, 8));
        assert_eq!(text_size("TEST", 2), (70, 16));
    }

    #[test]
    fn size_multiline_uses_widest_line() {
        assert_eq!(text_size("AB\nABCD", 1), (35, 17));
    }

    #[test]
    fn size_empty_text() {
        assert_eq!(text_size("", 1), (0, 0));
        assert!(render_text("", 1, WHITE).is_none());
    }

    #[test]
    fn zero_scale_treated_as_one() {
        assert_eq!(text_size("A", 0), (8, 8));
    }

    #[test]
    fn render_matches_measured_size() {
        let img = render_text("TEST", 2, WHITE).unwrap();
        assert_eq!(img.dimensions(), text_size("TEST", 2));
    }

    #[test]
    fn render_uses_color_and_leaves_background_transparent() {
        let color = Rgba([255, 255, 255, 127]);
        let img = render_text("TEST", 1, color).unwrap();
        let mut drawn = 0;
        for p in img.pixels() {
            if p[3] == 0 {
                assert_eq!(*p, Rgba([0, 0, 0, 0]));
            } else {
                assert_eq!(*p, color);
                drawn += 1;
            }
        }
        assert!(drawn > 0, "no glyph pixels drawn");
    }

    #[test]
    fn space_renders_nothing() {
        let img = render_text(" ", 1, WHITE).unwrap();
        assert!(img.pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn unknown_character_falls_back_to_question_mark() {
        let fallback = render_text("?", 1, WHITE).unwrap();
        let unknown = render_text("\u{2603}", 1, WHITE).unwrap();
        assert_eq!(fallback, unknown);
    }
}
