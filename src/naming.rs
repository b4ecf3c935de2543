//! Output file naming.
//!
//! A watermarked copy is written next to its original (or into an output
//! directory) as `<stem><suffix><ext>`:
//! - `photo.jpg` → `photo_watermarked.jpg`
//! - `Scan.PNG` → `Scan_watermarked.PNG` (extension case preserved)
//! - `archive.tar.png` → `archive.tar_watermarked.png`
//!
//! The output format always follows the extension, so the copy keeps its
//! original's format.

use crate::imaging::OutputFormat;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Suffix appended to the file stem when none is configured.
pub const DEFAULT_SUFFIX: &str = "_watermarked";

/// Build the output path for `original`.
///
/// `out_dir` replaces the original's directory when given.
pub fn watermarked_path(original: &Path, suffix: &str, out_dir: Option<&Path>) -> PathBuf {
    let mut name = OsString::from(original.file_stem().unwrap_or_default());
    name.push(suffix);
    if let Some(ext) = original.extension() {
        name.push(".");
        name.push(ext);
    }

    let dir = match out_dir {
        Some(d) => d,
        None => original.parent().unwrap_or(Path::new("")),
    };
    dir.join(name)
}

/// The format a file at `path` is written as, from its extension.
pub fn output_format(path: &Path) -> Option<OutputFormat> {
    OutputFormat::from_path(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn beside_original_with_default_suffix() {
        assert_eq!(
            watermarked_path(Path::new("/photos/a.jpg"), DEFAULT_SUFFIX, None),
            PathBuf::from("/photos/a_watermarked.jpg")
        );
    }

    #[test]
    fn extension_case_preserved() {
        assert_eq!(
            watermarked_path(Path::new("Scan.PNG"), DEFAULT_SUFFIX, None),
            PathBuf::from("Scan_watermarked.PNG")
        );
    }

    #[test]
    fn only_last_extension_is_split() {
        assert_eq!(
            watermarked_path(Path::new("dir/archive.tar.png"), "-wm", None),
            PathBuf::from("dir/archive.tar-wm.png")
        );
    }

    #[test]
    fn custom_output_directory() {
        assert_eq!(
            watermarked_path(Path::new("/photos/a.jpg"), "_wm", Some(Path::new("/out"))),
            PathBuf::from("/out/a_wm.jpg")
        );
    }

    #[test]
    fn no_extension() {
        assert_eq!(
            watermarked_path(Path::new("raw"), DEFAULT_SUFFIX, None),
            PathBuf::from("raw_watermarked")
        );
    }

    #[test]
    fn hidden_file_keeps_leading_dot() {
        // `.logo` is all stem, no extension
        assert_eq!(
            watermarked_path(Path::new("/h/.logo"), DEFAULT_SUFFIX, None),
            PathBuf::from("/h/.logo_watermarked")
        );
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(output_format(Path::new("a.JPEG")), Some(OutputFormat::Jpeg));
        assert_eq!(output_format(Path::new("a.png")), Some(OutputFormat::Png));
        assert_eq!(output_format(Path::new("a.gif")), None);
    }
}
