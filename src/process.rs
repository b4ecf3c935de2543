//! Batch watermarking.
//!
//! Takes the ordered file list from [`scan`](crate::scan) and a
//! [`WatermarkSpec`], and writes one watermarked copy per file.
//!
//! ## Flow
//!
//! ```text
//! files ──► empty? ──► EmptyBatch (nothing touched)
//!       └─► load watermark image once ──► PreparedWatermark
//!           └─► per file: load ─► composite ─► flatten ─► encode ─► atomic write
//! ```
//!
//! ## Failure Handling
//!
//! Problems with batch-wide inputs abort before any file is written: an empty
//! file list, a watermark image that cannot be decoded, an output directory
//! that cannot be created. Problems with one file are recorded in the
//! [`BatchReport`] and the batch moves on to the next file.
//!
//! ## Output
//!
//! Each result is written as `<stem><suffix><ext>` beside its original, or in
//! the configured output directory, in the format its extension names.
//! Originals are never modified.
//!
//! Files are processed one at a time, in order. Progress is reported as
//! [`ProcessEvent`]s over an optional channel.

use crate::imaging::{
    BackendError, ImageBackend, OutputFormat, PreparedWatermark, Quality, RustBackend,
    WatermarkSpec, composite, finish,
};
use crate::naming::{DEFAULT_SUFFIX, output_format, watermarked_path};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("No files selected")]
    EmptyBatch,
    #[error("Failed to load {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: BackendError,
    },
    #[error("Failed to encode {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: BackendError,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image processing failed: {0}")]
    Imaging(#[from] BackendError),
}

/// Where and how results are written.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOptions {
    /// Appended to each file stem.
    pub suffix: String,
    /// Write here instead of beside each original.
    pub out_dir: Option<PathBuf>,
    /// JPEG encoding quality.
    pub quality: Quality,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_SUFFIX.to_string(),
            out_dir: None,
            quality: Quality::default(),
        }
    }
}

/// Progress events emitted while a batch runs.
///
/// `index` is 1-based.
#[derive(Debug, Clone)]
pub enum ProcessEvent {
    BatchStarted {
        total: usize,
    },
    FileWritten {
        index: usize,
        total: usize,
        source: PathBuf,
        output: PathBuf,
    },
    FileFailed {
        index: usize,
        total: usize,
        source: PathBuf,
        error: String,
    },
}

/// A file that was watermarked and written.
#[derive(Debug, Clone, Serialize)]
pub struct WrittenFile {
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// A file that could not be watermarked.
#[derive(Debug, Clone, Serialize)]
pub struct FailedFile {
    pub source: PathBuf,
    pub error: String,
}

/// Outcome of a whole batch, in input order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub written: Vec<WrittenFile>,
    pub failed: Vec<FailedFile>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.written.len() + self.failed.len()
    }

    /// True when every file was written.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Watermark `files` with the production backend.
pub fn process(
    files: &[PathBuf],
    spec: &WatermarkSpec,
    options: &BatchOptions,
    progress: Option<Sender<ProcessEvent>>,
) -> Result<BatchReport, ProcessError> {
    let backend = RustBackend::new();
    process_with_backend(&backend, files, spec, options, progress)
}

/// Watermark `files` using a specific backend (allows testing with mock).
pub fn process_with_backend(
    backend: &impl ImageBackend,
    files: &[PathBuf],
    spec: &WatermarkSpec,
    options: &BatchOptions,
    progress: Option<Sender<ProcessEvent>>,
) -> Result<BatchReport, ProcessError> {
    if files.is_empty() {
        return Err(ProcessError::EmptyBatch);
    }
    if spec.is_empty() {
        warn!("no watermark text or image set; outputs will be plain copies");
    }

    let logo = match &spec.image {
        Some(path) => Some(backend.load(path).map_err(|source| ProcessError::Load {
            path: path.clone(),
            source,
        })?),
        None => None,
    };
    let prepared = PreparedWatermark::new(spec, logo.as_ref());

    if let Some(dir) = &options.out_dir {
        std::fs::create_dir_all(dir)?;
    }

    let emit = |event: ProcessEvent| {
        if let Some(tx) = &progress {
            // A closed receiver only means nobody is listening
            tx.send(event).ok();
        }
    };

    let total = files.len();
    info!(total, "starting batch");
    emit(ProcessEvent::BatchStarted { total });

    let mut report = BatchReport::default();
    for (i, source) in files.iter().enumerate() {
        let index = i + 1;
        match watermark_file(backend, source, &prepared, options) {
            Ok(written) => {
                info!(source = %source.display(), output = %written.output.display(), "watermarked");
                emit(ProcessEvent::FileWritten {
                    index,
                    total,
                    source: source.clone(),
                    output: written.output.clone(),
                });
                report.written.push(written);
            }
            Err(e) => {
                warn!(source = %source.display(), error = %e, "skipping file");
                emit(ProcessEvent::FileFailed {
                    index,
                    total,
                    source: source.clone(),
                    error: e.to_string(),
                });
                report.failed.push(FailedFile {
                    source: source.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    Ok(report)
}

/// Load, composite, and write one file.
fn watermark_file(
    backend: &impl ImageBackend,
    source: &Path,
    prepared: &PreparedWatermark,
    options: &BatchOptions,
) -> Result<WrittenFile, ProcessError> {
    let output = watermarked_path(source, &options.suffix, options.out_dir.as_deref());
    let format: OutputFormat = output_format(&output).ok_or_else(|| {
        let ext = source
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        BackendError::UnsupportedFormat(ext)
    })?;

    let base = backend.load(source).map_err(|source_err| ProcessError::Load {
        path: source.to_path_buf(),
        source: source_err,
    })?;
    let (width, height) = (base.width(), base.height());
    debug!(source = %source.display(), width, height, "loaded");

    let finished = finish(composite(&base, prepared), format);

    backend
        .save(&finished, &output, format, options.quality)
        .map_err(|e| match e {
            BackendError::Io(io) => ProcessError::Io(io),
            other => ProcessError::Encode {
                path: output.clone(),
                source: other,
            },
        })?;

    Ok(WrittenFile {
        source: source.to_path_buf(),
        output,
        width,
        height,
    })
}
