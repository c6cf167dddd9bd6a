use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use serde::Serialize;

use paperfile_core::{DocumentMetadata, ExtractedDocument, PaperMetadata, PdfBackend};

use crate::authors::{self, AuthorResult, AuthorSource};
use crate::config::ParsingConfig;
use crate::text_processing::{normalize_whitespace, truncate_with_ellipsis};
use crate::title::{self, TitleResult, UNTITLED};
use crate::ParsingError;

/// Title and author of one document, with the strategies that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extraction {
    pub title: TitleResult,
    pub author: AuthorResult,
}

impl Extraction {
    /// Collapse into the `(full title, author)` pair used for file names.
    pub fn to_paper_metadata(&self, config: &ParsingConfig) -> PaperMetadata {
        PaperMetadata {
            title: normalize_whitespace(&self.title.full_title()),
            author: truncate_with_ellipsis(
                &normalize_whitespace(&self.author.name),
                config.max_author_chars,
            ),
        }
    }
}

/// A configurable title/author extraction pipeline.
///
/// Holds a [`ParsingConfig`] and exposes each pipeline step as a method.
/// The default constructor uses built-in defaults; use
/// [`MetadataExtractor::with_config`] to adjust limits and word lists.
#[derive(Debug, Clone)]
pub struct MetadataExtractor {
    config: ParsingConfig,
}

impl Default for MetadataExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataExtractor {
    /// Create an extractor with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParsingConfig::default(),
        }
    }

    /// Create an extractor with a custom configuration.
    pub fn with_config(config: ParsingConfig) -> Self {
        Self { config }
    }

    /// Get a reference to the current config.
    pub fn config(&self) -> &ParsingConfig {
        &self.config
    }

    /// Infer the title and optional subtitle (step 1).
    pub fn extract_title(
        &self,
        text: &str,
        metadata: &DocumentMetadata,
        filename_stem: &str,
    ) -> TitleResult {
        title::extract_title_with_config(text, metadata, filename_stem, &self.config)
    }

    /// Infer the first author given the main title (step 2).
    pub fn extract_author(
        &self,
        text: &str,
        title: &str,
        filename: &str,
        metadata: &DocumentMetadata,
    ) -> AuthorResult {
        authors::extract_author_with_config(text, title, filename, metadata, &self.config)
    }

    /// Run both steps and keep the per-step detail.
    pub fn analyze(&self, text: &str, metadata: &DocumentMetadata, filename: &str) -> Extraction {
        let stem = file_stem(filename);
        let title = self.extract_title(text, metadata, &stem);
        let author = self.extract_author(text, &title.title, filename, metadata);
        Extraction { title, author }
    }

    /// Run the full pipeline on already-extracted text.
    ///
    /// Never fails: if the pipeline panics, the result is the file stem and
    /// the unknown label.
    pub fn run(&self, text: &str, metadata: &DocumentMetadata, filename: &str) -> PaperMetadata {
        self.run_guarded(filename, || self.analyze(text, metadata, filename))
    }

    fn run_guarded(&self, filename: &str, analyze: impl FnOnce() -> Extraction) -> PaperMetadata {
        match panic::catch_unwind(AssertUnwindSafe(analyze)) {
            Ok(extraction) => {
                let paper = extraction.to_paper_metadata(&self.config);
                tracing::info!(filename, title = %paper.title, author = %paper.author, "extracted");
                paper
            }
            Err(_) => {
                tracing::warn!(filename, "extraction panicked, using file name");
                self.fallback(Path::new(filename))
            }
        }
    }

    /// Read a document through `backend`, rejecting documents with no text.
    ///
    /// Panics raised inside the backend are reported as
    /// [`ParsingError::Panicked`].
    pub fn read_document(
        &self,
        path: &Path,
        backend: &dyn PdfBackend,
        max_pages: usize,
    ) -> Result<ExtractedDocument, ParsingError> {
        let doc = panic::catch_unwind(AssertUnwindSafe(|| backend.extract(path, max_pages)))
            .map_err(|_| ParsingError::Panicked {
                path: path.to_path_buf(),
            })??;

        if doc.text.trim().is_empty() {
            return Err(ParsingError::EmptyText {
                path: path.to_path_buf(),
            });
        }
        Ok(doc)
    }

    /// Read a document and report per-step detail. Errors are returned, not
    /// masked; see [`extract_from_path`](Self::extract_from_path) for the
    /// infallible form.
    pub fn inspect_path(
        &self,
        path: &Path,
        backend: &dyn PdfBackend,
        max_pages: usize,
    ) -> Result<Extraction, ParsingError> {
        let doc = self.read_document(path, backend, max_pages)?;
        let filename = file_name(path);
        panic::catch_unwind(AssertUnwindSafe(|| {
            self.analyze(&doc.text, &doc.metadata, &filename)
        }))
        .map_err(|_| ParsingError::Panicked {
            path: path.to_path_buf(),
        })
    }

    /// Read a document and infer its `(title, author)`.
    ///
    /// Never fails: when the document can't be read, has no text, or the
    /// pipeline panics, the result is the file stem and the unknown label.
    pub fn extract_from_path(
        &self,
        path: &Path,
        backend: &dyn PdfBackend,
        max_pages: usize,
    ) -> PaperMetadata {
        match self.inspect_path(path, backend, max_pages) {
            Ok(extraction) => {
                let paper = extraction.to_paper_metadata(&self.config);
                tracing::info!(
                    path = %path.display(),
                    title = %paper.title,
                    title_source = %extraction.title.source,
                    author = %paper.author,
                    author_source = %extraction.author.source,
                    "extracted"
                );
                paper
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "extraction failed, using file name");
                self.fallback(path)
            }
        }
    }

    /// `(file stem, unknown label)` for a document that couldn't be read.
    pub fn fallback(&self, path: &Path) -> PaperMetadata {
        let stem = path
            .file_stem()
            .map(|s| normalize_whitespace(&s.to_string_lossy()))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| UNTITLED.to_string());
        PaperMetadata {
            title: stem,
            author: self.config.unknown_author.clone(),
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// `"2301.01234v2.pdf"` → `"2301.01234v2"`; names without an extension are kept.
fn file_stem(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
