use std::path::Path;

use thiserror::Error;

use crate::ExtractedDocument;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open PDF: {0}")]
    OpenError(String),
    #[error("failed to extract text: {0}")]
    ExtractionError(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for PDF text extraction backends.
///
/// Implementors read the leading pages of a document plus its embedded
/// `Title`/`Author` metadata; the title/author heuristics live in
/// `paperfile_parsing::MetadataExtractor`.
pub trait PdfBackend: Send + Sync {
    /// Extract the text of the first `max_pages` pages and the document metadata.
    fn extract(&self, path: &Path, max_pages: usize) -> Result<ExtractedDocument, BackendError>;
}
