//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Progress
//!
//! Each file leads with its positional index and file name; the full output
//! path or the error follows as indented context.
//!
//! ```text
//! Watermarking 3 files
//! 001 dawn.jpg
//!     Output: photos/dawn_watermarked.jpg
//! 002 notes.txt
//!     Error: Image processing failed: Unsupported output format: txt
//! 003 dusk.png
//!     Output: photos/dusk_watermarked.png
//! ```
//!
//! ## Summary
//!
//! ```text
//! Watermarked 2 of 3 files
//! Failed
//!     photos/notes.txt
//!         Image processing failed: Unsupported output format: txt
//! ```
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::process::{BatchReport, ProcessEvent};
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Format a single progress event as display lines.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::BatchStarted { total } => {
            vec![format!("Watermarking {} file{}", total, plural(*total))]
        }
        ProcessEvent::FileWritten {
            index,
            source,
            output,
            ..
        } => vec![
            format!("{} {}", format_index(*index), file_name(source)),
            format!("{}Output: {}", indent(1), output.display()),
        ],
        ProcessEvent::FileFailed {
            index,
            source,
            error,
            ..
        } => vec![
            format!("{} {}", format_index(*index), file_name(source)),
            format!("{}Error: {}", indent(1), error),
        ],
    }
}

/// Format the end-of-batch summary.
pub fn format_summary(report: &BatchReport) -> Vec<String> {
    let total = report.total();
    let mut lines = vec![format!(
        "Watermarked {} of {} file{}",
        report.written.len(),
        total,
        plural(total)
    )];

    if !report.failed.is_empty() {
        lines.push("Failed".to_string());
        for failure in &report.failed {
            lines.push(format!("{}{}", indent(1), failure.source.display()));
            lines.push(format!("{}{}", indent(2), failure.error));
        }
    }
    lines
}

/// Print a progress event to stdout.
pub fn print_process_event(event: &ProcessEvent) {
    for line in format_process_event(event) {
        println!("{}", line);
    }
}

/// Print the batch summary to stdout.
pub fn print_summary(report: &BatchReport) {
    for line in format_summary(report) {
        println!("{}", line);
    }
}
