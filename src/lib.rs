//! # Batch Watermark
//!
//! Stamps text and/or image watermarks onto a batch of photos, writing a
//! watermarked copy next to each original.
//!
//! # Architecture
//!
//! ```text
//! 1. Collect   paths      →  ordered file list       (files as given, directories expanded)
//! 2. Resolve   TOML+flags →  WatermarkSpec           (stock → watermark.toml → CLI)
//! 3. Prepare   spec       →  PreparedWatermark       (text, logo, or tile cell; once per batch)
//! 4. Process   per file   →  <stem>_watermarked.ext  (composite, flatten, atomic write)
//! ```
//!
//! The compositor in [`imaging`] is pure: it takes decoded images and returns
//! pixels. All filesystem access goes through the
//! [`ImageBackend`](imaging::ImageBackend) trait, so the batch logic is unit
//! tested against a recording mock.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Expands files and directories into the ordered batch |
//! | [`config`] | `watermark.toml` loading, layering with CLI flags, validation |
//! | [`imaging`] | Placement geometry, bitmap text, rotation, compositing, image I/O |
//! | [`naming`] | Output file names (`<stem><suffix><ext>`) |
//! | [`process`] | Runs the batch with per-file error isolation and progress events |
//! | [`output`] | CLI output formatting for progress and the final summary |
//!
//! # Design Decisions
//!
//! ## Prepare Once, Stamp Many
//!
//! Everything about the watermark that does not depend on the base image
//! (rendered text, the resized and rotated logo, the rotated tile cell) is
//! built once per batch. Per file, only placement and blending remain.
//!
//! ## No Partial Outputs
//!
//! Results are encoded in memory and written through a temporary file in the
//! destination directory, renamed into place only once complete. A failed
//! file leaves nothing behind; originals are never opened for writing.
//!
//! ## Built-in Font
//!
//! Text is drawn with an embedded 8×8 bitmap font, integer scaled. No font
//! files are needed at runtime and output is identical on every machine.

pub mod config;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod process;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
