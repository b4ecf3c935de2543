//! Parameter types for watermark operations.
//!
//! These types describe *what* watermark to apply, not *how* to draw it. They
//! are the interface between the caller (CLI, config, batch driver) and the
//! [`operations`](super::operations) module that does the pixel work.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100, default 90). Clamped on construction.
//! - [`Opacity`]: Watermark opacity in `[0.0, 1.0]`. Clamped on construction.
//! - [`Angle`]: Counter-clockwise rotation in whole degrees, normalized to `0..360`.
//! - [`Anchor`]: One of the five fixed placement points.
//! - [`Placement`]: Fixed anchor or repeated tile grid.
//! - [`WatermarkSpec`]: The full immutable parameter bundle for one batch.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Watermark opacity (0.0 = invisible, 1.0 = fully opaque).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Opacity(f32);

impl Opacity {
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self(0.0);
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Build from a 0–100 percentage, as entered by the user.
    pub fn from_percent(percent: u32) -> Self {
        Self::new(percent as f32 / 100.0)
    }

    pub fn value(self) -> f32 {
        self.0
    }

    /// Alpha for a fully opaque source pixel at this opacity.
    ///
    /// Truncates rather than rounds: 50% yields 127, not 128.
    pub fn alpha(self) -> u8 {
        (255.0 * self.0) as u8
    }
}

impl Default for Opacity {
    fn default() -> Self {
        Self(0.5)
    }
}

/// Counter-clockwise rotation in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Angle(u32);

impl Angle {
    pub fn new(degrees: u32) -> Self {
        Self(degrees % 360)
    }

    pub fn degrees(self) -> u32 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

/// Fixed placement point on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
    Center,
}

impl Anchor {
    pub const ALL: [Anchor; 5] = [
        Anchor::TopLeft,
        Anchor::TopRight,
        Anchor::BottomLeft,
        Anchor::BottomRight,
        Anchor::Center,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Anchor::TopLeft => "top-left",
            Anchor::TopRight => "top-right",
            Anchor::BottomLeft => "bottom-left",
            Anchor::BottomRight => "bottom-right",
            Anchor::Center => "center",
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Anchor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Anchor::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "unknown position '{s}' (expected one of: top-left, top-right, \
                     bottom-left, bottom-right, center)"
                )
            })
    }
}

/// Where the watermark goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Each element drawn once at the anchor.
    Fixed(Anchor),
    /// One cell repeated on a grid with the given pitch in pixels.
    Repeated { spacing: u32 },
}

impl Default for Placement {
    fn default() -> Self {
        Placement::Fixed(Anchor::default())
    }
}

/// Immutable watermark parameters for a whole batch.
#[derive(Debug, Clone, PartialEq)]
pub struct WatermarkSpec {
    /// Text to render. `None` or empty means no text element.
    pub text: Option<String>,
    /// Image to use as the image element.
    pub image: Option<PathBuf>,
    pub opacity: Opacity,
    pub angle: Angle,
    pub placement: Placement,
    /// Integer upscale of the 8px bitmap font.
    pub text_scale: u32,
}

impl Default for WatermarkSpec {
    fn default() -> Self {
        Self {
            text: None,
            image: None,
            opacity: Opacity::default(),
            angle: Angle::default(),
            placement: Placement::default(),
            text_scale: 1,
        }
    }
}

impl WatermarkSpec {
    /// The text element, if any. Empty strings count as absent.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }

    /// True when neither a text nor an image element is configured.
    ///
    /// Not an error: compositing simply returns the base unchanged.
    pub fn is_empty(&self) -> bool {
        self.text().is_none() && self.image.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 1);
        assert_eq!(Quality::new(50).value(), 50);
        assert_eq!(Quality::new(150).value(), 100);
    }

    #[test]
    fn opacity_clamps_to_valid_range() {
        assert_eq!(Opacity::new(-0.5).value(), 0.0);
        assert_eq!(Opacity::new(0.25).value(), 0.25);
        assert_eq!(Opacity::new(3.0).value(), 1.0);
        assert_eq!(Opacity::new(f32::NAN).value(), 0.0);
    }

    #[test]
    fn opacity_from_percent() {
        assert_eq!(Opacity::from_percent(50).value(), 0.5);
        assert_eq!(Opacity::from_percent(250).value(), 1.0);
    }

    #[test]
    fn opacity_alpha_truncates() {
        assert_eq!(Opacity::new(0.5).alpha(), 127);
        assert_eq!(Opacity::new(1.0).alpha(), 255);
        assert_eq!(Opacity::new(0.0).alpha(), 0);
    }

    #[test]
    fn angle_wraps_full_turns() {
        assert_eq!(Angle::new(359).degrees(), 359);
        assert_eq!(Angle::new(360).degrees(), 0);
        assert_eq!(Angle::new(450).degrees(), 90);
        assert!(Angle::new(720).is_zero());
    }

    #[test]
    fn anchor_parses_case_insensitively() {
        assert_eq!("Top-Left".parse::<Anchor>().unwrap(), Anchor::TopLeft);
        assert_eq!("center".parse::<Anchor>().unwrap(), Anchor::Center);
        assert!("middle".parse::<Anchor>().is_err());
    }

    #[test]
    fn anchor_display_roundtrips() {
        for anchor in Anchor::ALL {
            assert_eq!(anchor.to_string().parse::<Anchor>().unwrap(), anchor);
        }
    }

    #[test]
    fn spec_with_blank_text_is_empty() {
        let spec = WatermarkSpec {
            text: Some(String::new()),
            ..Default::default()
        };
        assert!(spec.is_empty());
        assert_eq!(spec.text(), None);
    }

    #[test]
    fn spec_with_image_is_not_empty() {
        let spec = WatermarkSpec {
            image: Some("logo.png".into()),
            ..Default::default()
        };
        assert!(!spec.is_empty());
    }
}
