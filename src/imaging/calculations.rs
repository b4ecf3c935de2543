//! Pure geometry for watermark placement.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::Anchor;

/// Fixed distance in pixels between an anchored element and the canvas edge.
pub const MARGIN: i64 = 10;

/// Side length of the square cell an image watermark is resized to.
pub const IMAGE_CELL: u32 = 100;

/// Calculate the top-left offset for an element placed at an anchor.
///
/// # Arguments
/// * `canvas` - Canvas dimensions (width, height)
/// * `element` - Element dimensions (width, height), after rotation
/// * `anchor` - Which of the five placement points to use
///
/// # Returns
/// * `(x, y)` - Signed offset. Negative when the element is larger than the
///   canvas on that axis; the paste clips it.
///
/// # Examples
/// ```
/// # use batch_watermark::imaging::{anchor_position, Anchor};
/// assert_eq!(anchor_position((200, 200), (100, 100), Anchor::TopLeft), (10, 10));
/// assert_eq!(anchor_position((200, 200), (100, 100), Anchor::BottomRight), (90, 90));
/// assert_eq!(anchor_position((200, 200), (101, 101), Anchor::Center), (49, 49));
/// ```
pub fn anchor_position(canvas: (u32, u32), element: (u32, u32), anchor: Anchor) -> (i64, i64) {
    let (cw, ch) = (canvas.0 as i64, canvas.1 as i64);
    let (ew, eh) = (element.0 as i64, element.1 as i64);

    match anchor {
        Anchor::TopLeft => (MARGIN, MARGIN),
        Anchor::TopRight => (cw - ew - MARGIN, MARGIN),
        Anchor::BottomLeft => (MARGIN, ch - eh - MARGIN),
        Anchor::BottomRight => (cw - ew - MARGIN, ch - eh - MARGIN),
        // div_euclid keeps floor semantics when the element overflows the canvas
        Anchor::Center => ((cw - ew).div_euclid(2), (ch - eh).div_euclid(2)),
    }
}

/// Calculate the bounding box of a `(width, height)` rectangle rotated by
/// `degrees`, so the rotated content fits without cropping.
///
/// Quarter turns are exact (a transpose); other angles round up.
pub fn rotated_bounds(size: (u32, u32), degrees: u32) -> (u32, u32) {
    let (w, h) = size;
    match degrees % 360 {
        0 | 180 => (w, h),
        90 | 270 => (h, w),
        d => {
            let theta = (d as f64).to_radians();
            let (sin, cos) = (theta.sin().abs(), theta.cos().abs());
            let (w, h) = (w as f64, h as f64);
            // Shave float noise so e.g. 50.0000001 does not round up to 51
            let new_w = (w * cos + h * sin - 1e-6).ceil().max(1.0);
            let new_h = (w * sin + h * cos - 1e-6).ceil().max(1.0);
            (new_w as u32, new_h as u32)
        }
    }
}

/// Number of tiles needed along one axis: `ceil(extent / spacing)`.
///
/// Returns 0 for a zero spacing, which callers reject before this point.
pub fn tile_count(extent: u32, spacing: u32) -> u32 {
    if spacing == 0 {
        return 0;
    }
    extent.div_ceil(spacing)
}

/// Tile origins along one axis, starting at 0 with the given pitch.
///
/// The last tile may extend past `extent`; the paste clips it.
pub fn tile_origins(extent: u32, spacing: u32) -> Vec<i64> {
    (0..tile_count(extent, spacing))
        .map(|i| i as i64 * spacing as i64)
        .collect()
}

/// Size of the buffer a repeated-mode cell is rendered into.
///
/// Every element sits at the top-left anchor, so the cell is the largest
/// element plus the margin on both sides.
pub fn cell_size(elements: &[(u32, u32)]) -> (u32, u32) {
    let pad = 2 * MARGIN as u32;
    let w = elements.iter().map(|e| e.0).max().unwrap_or(0);
    let h = elements.iter().map(|e| e.1).max().unwrap_or(0);
    (w + pad, h + pad)
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // anchor_position tests
    // =========================================================================

    #[test]
    fn anchor_top_left_uses_margin() {
        assert_eq!(anchor_position((640, 480), (50, 20), Anchor::TopLeft), (10, 10));
    }

    #[test]
    fn anchor_top_right() {
        // 640 - 50 - 10 = 580
        assert_eq!(anchor_position((640, 480), (50, 20), Anchor::TopRight), (580, 10));
    }

    #[test]
    fn anchor_bottom_left() {
        // 480 - 20 - 10 = 450
        assert_eq!(anchor_position((640, 480), (50, 20), Anchor::BottomLeft), (10, 450));
    }

    #[test]
    fn anchor_bottom_right() {
        assert_eq!(
            anchor_position((640, 480), (50, 20), Anchor::BottomRight),
            (580, 450)
        );
    }

    #[test]
    fn anchor_center_integer_division() {
        // (640 - 51) / 2 = 294, (480 - 21) / 2 = 229
        assert_eq!(anchor_position((640, 480), (51, 21), Anchor::Center), (294, 229));
    }

    #[test]
    fn anchor_oversized_element_goes_negative() {
        assert_eq!(
            anchor_position((100, 100), (150, 150), Anchor::BottomRight),
            (-60, -60)
        );
        assert_eq!(anchor_position((100, 100), (151, 151), Anchor::Center), (-26, -26));
    }

    #[test]
    fn anchors_stay_inside_canvas_when_element_fits() {
        let canvases = [(200, 200), (300, 120), (1920, 1080), (40, 40)];
        let elements = [(1, 1), (20, 20), (100, 30), (40, 40), (200, 120)];
        for &canvas in &canvases {
            for &element in &elements {
                // Room for the margin on both sides
                if element.0 + 20 > canvas.0 || element.1 + 20 > canvas.1 {
                    continue;
                }
                for anchor in Anchor::ALL {
                    let (x, y) = anchor_position(canvas, element, anchor);
                    assert!(
                        x >= 0 && x <= (canvas.0 - element.0) as i64,
                        "{anchor} x={x} for {canvas:?}/{element:?}"
                    );
                    assert!(
                        y >= 0 && y <= (canvas.1 - element.1) as i64,
                        "{anchor} y={y} for {canvas:?}/{element:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn center_stays_inside_without_margin_room() {
        // Center has no margin, so it fits whenever the element does
        for (canvas, element) in [((50, 50), (50, 50)), ((51, 40), (50, 39))] {
            let (x, y) = anchor_position(canvas, element, Anchor::Center);
            assert!(x >= 0 && x <= (canvas.0 - element.0) as i64);
            assert!(y >= 0 && y <= (canvas.1 - element.1) as i64);
        }
    }

    // =========================================================================
    // rotated_bounds tests
    // =========================================================================

    #[test]
    fn rotated_bounds_zero_is_identity() {
        assert_eq!(rotated_bounds((100, 40), 0), (100, 40));
    }

    #[test]
    fn rotated_bounds_quarter_turns_swap() {
        assert_eq!(rotated_bounds((100, 40), 90), (40, 100));
        assert_eq!(rotated_bounds((100, 40), 180), (100, 40));
        assert_eq!(rotated_bounds((100, 40), 270), (40, 100));
    }

    #[test]
    fn rotated_bounds_45_degrees_square() {
        // 100 * sqrt(2) = 141.42 → 142
        assert_eq!(rotated_bounds((100, 100), 45), (142, 142));
    }

    #[test]
    fn rotated_bounds_30_degrees() {
        // w' = 100*0.866 + 40*0.5 = 106.6 → 107
        // h' = 100*0.5 + 40*0.866 = 84.64 → 85
        assert_eq!(rotated_bounds((100, 40), 30), (107, 85));
    }

    #[test]
    fn rotated_bounds_never_loses_area() {
        for deg in 0..360 {
            let (w, h) = rotated_bounds((64, 16), deg);
            assert!(w * h >= 64 * 16, "angle {deg} gave {w}x{h}");
        }
    }

    // =========================================================================
    // tiling tests
    // =========================================================================

    #[test]
    fn tile_count_is_ceiling() {
        assert_eq!(tile_count(200, 50), 4);
        assert_eq!(tile_count(201, 50), 5);
        assert_eq!(tile_count(10, 50), 1);
        assert_eq!(tile_count(0, 50), 0);
    }

    #[test]
    fn tile_count_zero_spacing_is_zero() {
        assert_eq!(tile_count(200, 0), 0);
    }

    #[test]
    fn tile_origins_cover_extent_without_gaps() {
        for extent in [1, 99, 100, 101, 333] {
            for spacing in [1, 7, 50, 100, 500] {
                let origins = tile_origins(extent, spacing);
                assert_eq!(origins.len() as u32, tile_count(extent, spacing));
                assert_eq!(origins[0], 0);
                // Consecutive origins are exactly one pitch apart
                for pair in origins.windows(2) {
                    assert_eq!(pair[1] - pair[0], spacing as i64);
                }
                // The last tile reaches the far edge
                let last = *origins.last().unwrap();
                assert!(last < extent as i64);
                assert!(last + spacing as i64 >= extent as i64);
            }
        }
    }

    // =========================================================================
    // cell_size tests
    // =========================================================================

    #[test]
    fn cell_size_pads_largest_element() {
        assert_eq!(cell_size(&[(100, 100), (47, 8)]), (120, 120));
        assert_eq!(cell_size(&[(30, 8)]), (50, 28));
    }

    #[test]
    fn cell_size_empty_is_margin_only() {
        assert_eq!(cell_size(&[]), (20, 20));
    }
}
