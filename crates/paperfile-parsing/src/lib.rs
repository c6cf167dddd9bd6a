use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod authors;
pub mod config;
pub mod extractor;
pub mod identifiers;
pub mod text_processing;
pub mod title;
pub mod validate;

pub use authors::{extract_author, first_author_segment, strip_affiliations, AuthorResult, AuthorSource};
pub use config::{ListOverride, ParsingConfig, ParsingConfigBuilder};
pub use extractor::{Extraction, MetadataExtractor};
pub use title::{extract_title, TitleResult, TitleSource, UNTITLED};
pub use validate::{is_author_line, is_author_name};
// Re-export domain types from core (canonical definitions live there)
pub use paperfile_core::{BackendError, DocumentMetadata, ExtractedDocument, PaperMetadata, PdfBackend};

/// Author label used when nothing plausible is found.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

#[derive(Error, Debug)]
pub enum ParsingError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("no extractable text in {}", .path.display())]
    EmptyText { path: PathBuf },
    #[error("extraction panicked on {} (malformed document)", .path.display())]
    Panicked { path: PathBuf },
    #[error("invalid parsing config: {0}")]
    InvalidConfig(String),
}

/// Infer `(full title, first author)` from extracted text and metadata.
///
/// Pipeline:
/// 1. Title and optional subtitle from metadata, leading lines, or patterns
/// 2. First author, anchored on the main title where possible
/// 3. Whitespace cleanup and length caps on both
///
/// `filename` is the document's file name; it supplies the arXiv id and the
/// last-resort title.
pub fn run_pipeline(text: &str, metadata: &DocumentMetadata, filename: &str) -> PaperMetadata {
    MetadataExtractor::new().run(text, metadata, filename)
}

/// Read a PDF through `backend` and infer its `(title, author)`.
///
/// Never fails; unreadable documents yield `(file stem, "Unknown")`.
pub fn extract_from_path(path: &Path, backend: &dyn PdfBackend, max_pages: usize) -> PaperMetadata {
    MetadataExtractor::new().extract_from_path(path, backend, max_pages)
}
