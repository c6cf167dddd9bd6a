use std::path::Path;

use mupdf::{Document, MetadataName, Page, TextPageFlags};

use paperfile_core::{BackendError, DocumentMetadata, ExtractedDocument, PdfBackend};
use paperfile_parsing::text_processing::expand_ligatures;

/// MuPDF-based implementation of [`PdfBackend`].
///
/// This crate isolates the mupdf dependency (AGPL-3.0) so the extraction
/// engine and orchestrator can be built and tested without it.
///
/// Whole pages are read by default. Header and footer bands can be dropped
/// with [`with_header_exclusion`](Self::with_header_exclusion) and
/// [`with_footer_exclusion`](Self::with_footer_exclusion) when running heads
/// such as "Proceedings of the VLDB Endowment, Vol. 14" outrank the title.
#[derive(Debug, Default)]
pub struct MupdfBackend {
    /// Fraction of page height from bottom to exclude as footer (0.0–1.0).
    /// `None` (the default) keeps the whole page.
    footer_exclusion_ratio: Option<f32>,
    /// Fraction of page height from top to exclude as header (0.0–1.0).
    /// `None` (the default) keeps the whole page.
    header_exclusion_ratio: Option<f32>,
}

impl MupdfBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the footer exclusion ratio. Pass `0.0` to disable.
    pub fn with_footer_exclusion(mut self, ratio: f32) -> Self {
        self.footer_exclusion_ratio = if ratio > 0.0 { Some(ratio) } else { None };
        self
    }

    /// Set the header exclusion ratio. Pass `0.0` to disable.
    pub fn with_header_exclusion(mut self, ratio: f32) -> Self {
        self.header_exclusion_ratio = if ratio > 0.0 { Some(ratio) } else { None };
        self
    }

    fn page_text(&self, page: &Page) -> Result<String, BackendError> {
        let text_page = page
            .to_text_page(TextPageFlags::empty())
            .map_err(|e| BackendError::ExtractionError(e.to_string()))?;

        let page_bounds = page
            .bounds()
            .map_err(|e| BackendError::ExtractionError(e.to_string()))?;
        let page_height = page_bounds.y1 - page_bounds.y0;

        let header_threshold = self
            .header_exclusion_ratio
            .map(|r| page_bounds.y0 + page_height * r);
        let footer_threshold = self
            .footer_exclusion_ratio
            .map(|r| page_bounds.y1 - page_height * r);

        let mut text = String::new();
        for block in text_page.blocks() {
            let block_bounds = block.bounds();

            // Blocks entirely inside the header band
            if let Some(threshold) = header_threshold
                && block_bounds.y1 <= threshold
            {
                continue;
            }

            // Blocks starting inside the footer band
            if let Some(threshold) = footer_threshold
                && block_bounds.y0 >= threshold
            {
                continue;
            }

            for line in block.lines() {
                text.extend(line.chars().map(|c| c.char().unwrap_or('\u{FFFD}')));
                text.push('\n');
            }
        }
        Ok(expand_ligatures(&text))
    }
}

/// An info-dictionary entry; a missing or unreadable entry is `None`.
fn metadata_field(document: &Document, name: MetadataName) -> Option<String> {
    document.metadata(name).ok()
}

impl PdfBackend for MupdfBackend {
    fn extract(&self, path: &Path, max_pages: usize) -> Result<ExtractedDocument, BackendError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| BackendError::OpenError("invalid path encoding".into()))?;

        let document =
            Document::open(path_str).map_err(|e| BackendError::OpenError(e.to_string()))?;

        let mut text = String::new();
        for page_result in document
            .pages()
            .map_err(|e| BackendError::ExtractionError(e.to_string()))?
            .take(max_pages)
        {
            let page = page_result.map_err(|e| BackendError::ExtractionError(e.to_string()))?;
            text.push_str(&self.page_text(&page)?);
            text.push('\n');
        }

        let metadata = DocumentMetadata::new(
            metadata_field(&document, MetadataName::Title),
            metadata_field(&document, MetadataName::Author),
        );
        tracing::trace!(
            path = %path.display(),
            chars = text.len(),
            has_title = metadata.title.is_some(),
            has_author = metadata.author.is_some(),
            "read document"
        );

        Ok(ExtractedDocument { text, metadata })
    }
}
