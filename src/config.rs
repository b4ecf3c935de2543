//! Watermark configuration.
//!
//! Handles loading, validating, and merging `watermark.toml`. Settings are
//! layered: stock defaults, then the config file, then command-line flags.
//! Each layer is a sparse TOML table merged over the one below it, and the
//! result is validated once.
//!
//! ## Config File Location
//!
//! `watermark.toml` in the working directory is picked up automatically when
//! present. `--config FILE` names a file explicitly; that file must exist.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [watermark]
//! # text = "© Example"      # Text watermark (omit for none)
//! # image = "logo.png"      # Image watermark (omit for none)
//! opacity = 50              # Percent, 0-100
//! angle = 0                 # Degrees counter-clockwise, 0-359
//! position = "bottom-right" # top-left | top-right | bottom-left | bottom-right | center
//! text_scale = 1            # Integer scale of the 8x8 font
//!
//! [tiling]
//! enabled = false           # Repeat the watermark across the whole image
//! spacing = 200             # Grid pitch in pixels
//!
//! [output]
//! suffix = "_watermarked"   # Appended to the file stem
//! # directory = "out"       # Write here instead of beside each original
//! quality = 90              # JPEG quality, 1-100
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{Anchor, Angle, Opacity, Placement, Quality, WatermarkSpec};
use crate::naming::DEFAULT_SUFFIX;
use crate::process::BatchOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name picked up from the working directory when `--config` is absent.
pub const CONFIG_FILE_NAME: &str = "watermark.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Watermark configuration loaded from `watermark.toml`.
///
/// All fields have defaults. Config files need only specify the values they
/// want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WatermarkConfig {
    /// What to draw and how.
    pub watermark: WatermarkSection,
    /// Repeated placement across the whole image.
    pub tiling: TilingConfig,
    /// Where and how results are written.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WatermarkSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<PathBuf>,
    /// Percent, 0-100.
    pub opacity: u32,
    /// Degrees counter-clockwise, 0-359.
    pub angle: u32,
    pub position: Anchor,
    pub text_scale: u32,
}

impl Default for WatermarkSection {
    fn default() -> Self {
        Self {
            text: None,
            image: None,
            opacity: 50,
            angle: 0,
            position: Anchor::default(),
            text_scale: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TilingConfig {
    pub enabled: bool,
    /// Grid pitch in pixels.
    pub spacing: u32,
}

impl Default for TilingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            spacing: 200,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub suffix: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
    /// JPEG quality, 1-100.
    pub quality: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_SUFFIX.to_string(),
            directory: None,
            quality: Quality::default().value(),
        }
    }
}

impl WatermarkConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.watermark.opacity > 100 {
            return Err(ConfigError::Validation(
                "watermark.opacity must be 0-100".into(),
            ));
        }
        if self.watermark.angle > 359 {
            return Err(ConfigError::Validation(
                "watermark.angle must be 0-359".into(),
            ));
        }
        if self.watermark.text_scale == 0 {
            return Err(ConfigError::Validation(
                "watermark.text_scale must be at least 1".into(),
            ));
        }
        if self.tiling.spacing == 0 {
            return Err(ConfigError::Validation(
                "tiling.spacing must be non-zero".into(),
            ));
        }
        if self.output.suffix.is_empty() {
            return Err(ConfigError::Validation(
                "output.suffix must not be empty (outputs would overwrite originals)".into(),
            ));
        }
        if self.output.quality == 0 || self.output.quality > 100 {
            return Err(ConfigError::Validation(
                "output.quality must be 1-100".into(),
            ));
        }
        Ok(())
    }

    /// The watermark parameters for the compositor.
    pub fn spec(&self) -> WatermarkSpec {
        let w = &self.watermark;
        let placement = if self.tiling.enabled {
            Placement::Repeated {
                spacing: self.tiling.spacing,
            }
        } else {
            Placement::Fixed(w.position)
        };
        WatermarkSpec {
            text: w.text.clone(),
            image: w.image.clone(),
            opacity: Opacity::from_percent(w.opacity),
            angle: Angle::new(w.angle),
            placement,
            text_scale: w.text_scale,
        }
    }

    /// The batch driver's output settings.
    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            suffix: self.output.suffix.clone(),
            out_dir: self.output.directory.clone(),
            quality: Quality::new(self.output.quality),
        }
    }
}

/// Command-line values that override the config file.
///
/// `None` fields leave the lower layers untouched.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub text: Option<String>,
    pub image: Option<PathBuf>,
    pub opacity: Option<u32>,
    pub angle: Option<u32>,
    pub position: Option<Anchor>,
    pub tile_spacing: Option<u32>,
    pub text_scale: Option<u32>,
    pub suffix: Option<String>,
    pub out_dir: Option<PathBuf>,
    pub quality: Option<u32>,
}

impl Overrides {
    /// Render the overrides as a sparse TOML layer.
    ///
    /// `tile_spacing` switches tiling on; `position` switches it off.
    pub fn to_toml(&self) -> Result<toml::Value, ConfigError> {
        let mut watermark = toml::Table::new();
        let mut tiling = toml::Table::new();
        let mut output = toml::Table::new();

        if let Some(text) = &self.text {
            watermark.insert("text".into(), text.clone().into());
        }
        if let Some(image) = &self.image {
            watermark.insert("image".into(), toml::Value::try_from(image)?);
        }
        if let Some(opacity) = self.opacity {
            watermark.insert("opacity".into(), i64::from(opacity).into());
        }
        if let Some(angle) = self.angle {
            watermark.insert("angle".into(), i64::from(angle).into());
        }
        if let Some(position) = self.position {
            watermark.insert("position".into(), position.as_str().into());
            tiling.insert("enabled".into(), false.into());
        }
        if let Some(scale) = self.text_scale {
            watermark.insert("text_scale".into(), i64::from(scale).into());
        }
        if let Some(spacing) = self.tile_spacing {
            tiling.insert("enabled".into(), true.into());
            tiling.insert("spacing".into(), i64::from(spacing).into());
        }
        if let Some(suffix) = &self.suffix {
            output.insert("suffix".into(), suffix.clone().into());
        }
        if let Some(dir) = &self.out_dir {
            output.insert("directory".into(), toml::Value::try_from(dir)?);
        }
        if let Some(quality) = self.quality {
            output.insert("quality".into(), i64::from(quality).into());
        }

        let mut root = toml::Table::new();
        for (name, section) in [("watermark", watermark), ("tiling", tiling), ("output", output)] {
            if !section.is_empty() {
                root.insert(name.into(), toml::Value::Table(section));
            }
        }
        Ok(toml::Value::Table(root))
    }
}

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(WatermarkConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge overlays onto a base value in order, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlays: impl IntoIterator<Item = toml::Value>,
) -> Result<WatermarkConfig, ConfigError> {
    let merged = overlays.into_iter().fold(base, merge_toml);
    let config: WatermarkConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Resolve the effective config: stock defaults, then the config file, then
/// `overrides`.
///
/// `explicit` is the `--config` path and must exist. Without it,
/// [`CONFIG_FILE_NAME`] in `cwd` is used when present.
pub fn load_config(
    explicit: Option<&Path>,
    cwd: &Path,
    overrides: &Overrides,
) -> Result<WatermarkConfig, ConfigError> {
    let file_layer = match explicit {
        Some(path) => Some(load_raw_config(path)?.ok_or_else(|| {
            ConfigError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("config file not found: {}", path.display()),
            ))
        })?),
        None => load_raw_config(&cwd.join(CONFIG_FILE_NAME))?,
    };

    let layers = file_layer.into_iter().chain([overrides.to_toml()?]);
    resolve_config(stock_defaults_value()?, layers)
}

/// Returns a fully-commented stock `watermark.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Batch Watermark Configuration
# =============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# The file is read from ./watermark.toml, or from the path given with
# --config. Command-line flags override anything set here.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Watermark content
# ---------------------------------------------------------------------------
[watermark]
# Text to draw, in the built-in 8x8 bitmap font. Omit for no text.
# text = "(c) Example"

# Image to draw, resized to 100x100. Omit for no image.
# image = "logo.png"

# Opacity in percent (0 = invisible, 100 = opaque).
opacity = 50

# Rotation in degrees, counter-clockwise (0-359).
angle = 0

# Anchor for a single watermark:
# top-left, top-right, bottom-left, bottom-right, center.
position = "bottom-right"

# Integer magnification of the 8x8 font.
text_scale = 1

# ---------------------------------------------------------------------------
# Tiling
# ---------------------------------------------------------------------------
[tiling]
# Repeat the watermark across the whole image instead of placing it once.
enabled = false

# Distance in pixels between tile origins, horizontally and vertically.
spacing = 200

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# Appended to each file name: photo.jpg -> photo_watermarked.jpg
suffix = "_watermarked"

# Write results here instead of beside each original.
# directory = "watermarked"

# JPEG encoding quality (1 = worst, 100 = best).
quality = 90
"##
}
