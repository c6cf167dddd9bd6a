use std::path::PathBuf;

pub mod backend;
pub mod config_file;

pub use backend::{BackendError, PdfBackend};
pub use config_file::{ConfigError, ConfigFile};

/// Default number of leading pages read from each document.
pub const DEFAULT_MAX_PAGES: usize = 2;

/// Upper bound for the default worker count.
const MAX_DEFAULT_WORKERS: usize = 8;

/// Embedded document-information metadata.
///
/// Blank values are normalized to `None` on construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
}

impl DocumentMetadata {
    pub fn new(title: Option<String>, author: Option<String>) -> Self {
        let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Self {
            title: non_blank(title),
            author: non_blank(author),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none()
    }
}

/// What a [`PdfBackend`] returns for one document: the concatenated text of
/// its leading pages plus its embedded metadata.
#[derive(Debug, Clone, Default)]
pub struct ExtractedDocument {
    pub text: String,
    pub metadata: DocumentMetadata,
}

/// The inferred (title, first author) pair for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperMetadata {
    /// Full title, including `": subtitle"` when one was found.
    pub title: String,
    pub author: String,
}

/// Resolved configuration for one filing run.
#[derive(Debug, Clone)]
pub struct Config {
    pub input_folders: Vec<PathBuf>,
    pub output_folder: PathBuf,
    pub processed_folder: PathBuf,
    pub max_pages: usize,
    pub num_workers: usize,
    /// Move originals into `processed_folder` after copying.
    pub move_processed: bool,
    /// Report destinations without touching the filesystem.
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_folders: vec![],
            output_folder: PathBuf::from("./outputs"),
            processed_folder: PathBuf::from("./processed_papers"),
            max_pages: DEFAULT_MAX_PAGES,
            num_workers: default_num_workers(),
            move_processed: true,
            dry_run: false,
        }
    }
}

impl Config {
    /// Resolve an on-disk config into a run config, applying defaults.
    ///
    /// Fails with [`ConfigError::NoInputFolders`] when no input folder is
    /// configured in either the list or the legacy single-folder form.
    pub fn from_file(file: &ConfigFile) -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let input_folders: Vec<PathBuf> = file.inputs().into_iter().map(PathBuf::from).collect();
        if input_folders.is_empty() {
            return Err(ConfigError::NoInputFolders);
        }

        let max_pages = file
            .extraction
            .as_ref()
            .and_then(|e| e.max_pages)
            .unwrap_or(defaults.max_pages);
        if max_pages == 0 {
            return Err(ConfigError::Invalid {
                field: "extraction.max_pages",
                reason: "must be at least 1".into(),
            });
        }

        let num_workers = file
            .concurrency
            .as_ref()
            .and_then(|c| c.num_workers)
            .unwrap_or(defaults.num_workers);
        if num_workers == 0 {
            return Err(ConfigError::Invalid {
                field: "concurrency.num_workers",
                reason: "must be at least 1".into(),
            });
        }

        Ok(Self {
            input_folders,
            output_folder: file
                .output_folder
                .as_ref()
                .map(PathBuf::from)
                .unwrap_or(defaults.output_folder),
            processed_folder: file
                .processed_folder
                .as_ref()
                .map(PathBuf::from)
                .unwrap_or(defaults.processed_folder),
            max_pages,
            num_workers,
            move_processed: file
                .filing
                .as_ref()
                .and_then(|f| f.move_processed)
                .unwrap_or(defaults.move_processed),
            dry_run: false,
        })
    }
}

fn default_num_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
        .min(MAX_DEFAULT_WORKERS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config_file::{ConcurrencyConfig, ExtractionConfig};

    #[test]
    fn blank_metadata_is_absent() {
        let meta = DocumentMetadata::new(Some("   ".into()), Some("Alice Wang".into()));
        assert_eq!(meta.title, None);
        assert_eq!(meta.author.as_deref(), Some("Alice Wang"));
        assert!(DocumentMetadata::new(None, Some(String::new())).is_empty());
    }

    #[test]
    fn config_requires_inputs() {
        assert!(matches!(
            Config::from_file(&ConfigFile::default()),
            Err(ConfigError::NoInputFolders)
        ));
    }

    #[test]
    fn config_applies_defaults() {
        let file = ConfigFile {
            input_folder: Some("/papers".into()),
            ..Default::default()
        };
        let config = Config::from_file(&file).unwrap();
        assert_eq!(config.input_folders, vec![PathBuf::from("/papers")]);
        assert_eq!(config.output_folder, PathBuf::from("./outputs"));
        assert_eq!(config.processed_folder, PathBuf::from("./processed_papers"));
        assert_eq!(config.max_pages, DEFAULT_MAX_PAGES);
        assert!(config.num_workers >= 1 && config.num_workers <= MAX_DEFAULT_WORKERS);
        assert!(config.move_processed);
        assert!(!config.dry_run);
    }

    #[test]
    fn config_rejects_zero_values() {
        let file = ConfigFile {
            input_folders: Some(vec!["/papers".into()]),
            extraction: Some(ExtractionConfig { max_pages: Some(0) }),
            ..Default::default()
        };
        assert!(matches!(
            Config::from_file(&file),
            Err(ConfigError::Invalid { field: "extraction.max_pages", .. })
        ));

        let file = ConfigFile {
            input_folders: Some(vec!["/papers".into()]),
            concurrency: Some(ConcurrencyConfig { num_workers: Some(0) }),
            ..Default::default()
        };
        assert!(matches!(
            Config::from_file(&file),
            Err(ConfigError::Invalid { field: "concurrency.num_workers", .. })
        ));
    }
}
