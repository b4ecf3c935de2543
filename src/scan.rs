//! Input collection.
//!
//! Expands the paths given on the command line into the ordered list of files
//! the batch will process:
//!
//! - **Files** are taken as given, in command-line order, whatever their
//!   extension. A file the batch cannot handle is reported as a per-file
//!   failure, not dropped silently.
//! - **Directories** contribute their supported image files, sorted by path.
//!   Only immediate children are taken unless `recursive` is set.
//!   Hidden entries (leading `.`) are skipped, and so are hidden
//!   subdirectories when recursing.
//! - The same file named twice (directly or via a directory) is kept once,
//!   at its first position.
//!
//! Paths that do not exist are passed through as files so they surface in
//! the batch report with their load error.

use crate::imaging::is_supported_image;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Failed to read directory: {0}")]
    Walk(#[from] walkdir::Error),
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

/// Supported image files under `dir`, sorted by path.
fn images_in(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>, ScanError> {
    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files = Vec::new();

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(max_depth)
        .into_iter()
        // The root itself may be hidden (e.g. a temp dir); only its contents are filtered
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e));
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() && is_supported_image(entry.path()) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    debug!(dir = %dir.display(), count = files.len(), "collected directory images");
    Ok(files)
}

/// Expand `inputs` into the ordered, de-duplicated batch.
pub fn collect_inputs(inputs: &[PathBuf], recursive: bool) -> Result<Vec<PathBuf>, ScanError> {
    let mut seen = HashSet::new();
    let mut batch = Vec::new();

    for input in inputs {
        let expanded = if input.is_dir() {
            images_in(input, recursive)?
        } else {
            vec![input.clone()]
        };
        for path in expanded {
            if seen.insert(path.clone()) {
                batch.push(path);
            }
        }
    }

    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    fn names(paths: &[PathBuf], root: &Path) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    fn setup_tree() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        for name in [
            "b.jpg",
            "a.PNG",
            "notes.txt",
            ".hidden.png",
            "sub/c.bmp",
            "sub/deeper/d.jpeg",
            ".cache/e.png",
        ] {
            touch(&root.join(name));
        }
        tmp
    }

    #[test]
    fn directory_lists_supported_images_sorted() {
        let tmp = setup_tree();
        let batch = collect_inputs(&[tmp.path().to_path_buf()], false).unwrap();
        assert_eq!(names(&batch, tmp.path()), vec!["a.PNG", "b.jpg"]);
    }

    #[test]
    fn recursive_descends_but_skips_hidden_dirs() {
        let tmp = setup_tree();
        let batch = collect_inputs(&[tmp.path().to_path_buf()], true).unwrap();
        assert_eq!(
            names(&batch, tmp.path()),
            vec!["a.PNG", "b.jpg", "sub/c.bmp", "sub/deeper/d.jpeg"]
        );
    }

    #[test]
    fn files_keep_command_line_order() {
        let tmp = setup_tree();
        let root = tmp.path();
        let batch = collect_inputs(&[root.join("b.jpg"), root.join("a.PNG")], false).unwrap();
        assert_eq!(names(&batch, root), vec!["b.jpg", "a.PNG"]);
    }

    #[test]
    fn explicit_files_are_not_filtered() {
        let tmp = setup_tree();
        let root = tmp.path();
        let batch = collect_inputs(&[root.join("notes.txt"), root.join(".hidden.png")], false).unwrap();
        assert_eq!(names(&batch, root), vec!["notes.txt", ".hidden.png"]);
    }

    #[test]
    fn duplicates_keep_first_position() {
        let tmp = setup_tree();
        let root = tmp.path();
        let batch = collect_inputs(
            &[root.join("b.jpg"), root.to_path_buf(), root.join("a.PNG")],
            false,
        )
        .unwrap();
        assert_eq!(names(&batch, root), vec!["b.jpg", "a.PNG"]);
    }

    #[test]
    fn missing_path_passes_through() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("gone.jpg");
        let batch = collect_inputs(std::slice::from_ref(&missing), false).unwrap();
        assert_eq!(batch, vec![missing]);
    }

    #[test]
    fn empty_inputs_give_empty_batch() {
        assert!(collect_inputs(&[], true).unwrap().is_empty());
    }

    #[test]
    fn empty_directory_gives_empty_batch() {
        let tmp = TempDir::new().unwrap();
        assert!(collect_inputs(&[tmp.path().to_path_buf()], false).unwrap().is_empty());
    }
}
