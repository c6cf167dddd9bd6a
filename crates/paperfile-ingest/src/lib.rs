use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

pub mod discover;
pub mod filing;
pub mod hashing;
pub mod naming;
pub mod organizer;

// Re-export domain types for convenience
pub use paperfile_core::{Config, PaperMetadata, PdfBackend};
pub use paperfile_parsing::{Extraction, MetadataExtractor};

pub use discover::{discover_pdfs, is_pdf_path};
pub use hashing::{content_hash, SeenHashes};
pub use naming::{paper_filename, sanitize_filename, unique_destination};
pub use organizer::{organize, Organizer, Placement, ProgressEvent, RunStats};

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("failed to create folder {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to hash {}: {source}", .path.display())]
    Hash {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to copy {} to {}: {source}", .from.display(), .to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to move {} to {}: {source}", .from.display(), .to.display())]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("PDF extraction error: {0}")]
    Parsing(#[from] paperfile_parsing::ParsingError),
    #[error(transparent)]
    Config(#[from] paperfile_core::ConfigError),
    #[error("background task failed: {0}")]
    Task(String),
    #[cfg(not(feature = "pdf"))]
    #[error("PDF support not compiled in (enable the `pdf` feature of paperfile-ingest)")]
    NoPdfSupport,
}

/// The MuPDF backend (requires the `pdf` feature).
#[cfg(feature = "pdf")]
pub fn default_backend() -> Result<Arc<dyn PdfBackend>, IngestError> {
    Ok(Arc::new(paperfile_pdf_mupdf::MupdfBackend::default()))
}

#[cfg(not(feature = "pdf"))]
pub fn default_backend() -> Result<Arc<dyn PdfBackend>, IngestError> {
    Err(IngestError::NoPdfSupport)
}

/// Run the title/author pipeline on one PDF and report which strategies
/// produced the result. Unlike a run, read failures are returned.
pub fn inspect(path: &Path, max_pages: usize) -> Result<Extraction, IngestError> {
    let backend = default_backend()?;
    Ok(MetadataExtractor::new().inspect_path(path, backend.as_ref(), max_pages)?)
}
