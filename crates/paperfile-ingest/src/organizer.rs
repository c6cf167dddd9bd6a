use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use futures_util::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;

use paperfile_core::{Config, PaperMetadata, PdfBackend};
use paperfile_parsing::MetadataExtractor;

use crate::discover::discover_pdfs;
use crate::filing::{copy_file, move_file};
use crate::hashing::{content_hash, SeenHashes};
use crate::naming::{paper_filename, unique_destination};
use crate::IngestError;

/// Progress events emitted while organizing a batch.
///
/// Every discovered document produces exactly one of `Filed`, `Duplicate`
/// or `Failed`, in discovery order, unless the run is cancelled.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    Discovered {
        total: usize,
    },
    Filed {
        index: usize,
        total: usize,
        source: PathBuf,
        destination: PathBuf,
        /// Where the original went, when it was moved.
        processed: Option<PathBuf>,
        paper: PaperMetadata,
    },
    Duplicate {
        index: usize,
        total: usize,
        path: PathBuf,
    },
    Failed {
        index: usize,
        total: usize,
        path: PathBuf,
        error: String,
    },
}

/// Counters for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    /// PDF files discovered in the input folders.
    pub found: usize,
    /// Copied into the output folder (or planned, in dry-run mode).
    pub filed: usize,
    /// Originals moved into the processed folder.
    pub moved: usize,
    /// Skipped because identical bytes were already filed.
    pub duplicates: usize,
    pub failed: usize,
    pub cancelled: bool,
}

/// Where one document ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub destination: PathBuf,
    pub processed: Option<PathBuf>,
}

/// Per-document result of the parallel stage.
struct Analyzed {
    hash: Option<String>,
    paper: PaperMetadata,
}

fn analyze(
    path: &Path,
    backend: &dyn PdfBackend,
    extractor: &MetadataExtractor,
    max_pages: usize,
) -> Analyzed {
    let hash = match content_hash(path) {
        Ok(h) => Some(h),
        Err(source) => {
            let e = IngestError::Hash {
                path: path.to_path_buf(),
                source,
            };
            tracing::warn!(error = %e, "filing without duplicate check");
            None
        }
    };
    let paper = extractor.extract_from_path(path, backend, max_pages);
    Analyzed { hash, paper }
}

/// Copies and moves documents; all filesystem mutation goes through here.
struct Filer {
    output_folder: PathBuf,
    processed_folder: PathBuf,
    move_processed: bool,
    dry_run: bool,
    /// Destinations handed out this run, so dry runs number collisions too.
    reserved: HashSet<PathBuf>,
}

impl Filer {
    fn new(config: &Config) -> Self {
        Self {
            output_folder: config.output_folder.clone(),
            processed_folder: config.processed_folder.clone(),
            move_processed: config.move_processed,
            dry_run: config.dry_run,
            reserved: HashSet::new(),
        }
    }

    fn file(&mut self, source: &Path, paper: &PaperMetadata) -> Result<Placement, IngestError> {
        let destination =
            unique_destination(&self.output_folder, &paper_filename(paper), &self.reserved);
        if !self.dry_run {
            copy_file(source, &destination)?;
        }
        self.reserved.insert(destination.clone());
        tracing::info!(
            from = %source.display(),
            to = %destination.display(),
            dry_run = self.dry_run,
            "filed"
        );

        let processed = if self.move_processed {
            self.move_original(source)
        } else {
            None
        };
        Ok(Placement {
            destination,
            processed,
        })
    }

    /// Move a filed original into the processed folder, keeping its name.
    /// A failed move is logged; the copy already made stands.
    fn move_original(&mut self, source: &Path) -> Option<PathBuf> {
        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document.pdf".to_string());
        let target = unique_destination(&self.processed_folder, &name, &self.reserved);

        if !self.dry_run
            && let Err(e) = move_file(source, &target)
        {
            tracing::warn!(error = %e, "original left in place");
            return None;
        }
        self.reserved.insert(target.clone());
        Some(target)
    }
}

/// Renames, files and deduplicates the PDFs found in the configured input
/// folders.
///
/// Text extraction runs on the blocking pool with at most `num_workers`
/// documents in flight; results are consumed in discovery order so that
/// duplicate detection and all copies and moves happen one at a time.
pub struct Organizer {
    config: Config,
    backend: Arc<dyn PdfBackend>,
    extractor: Arc<MetadataExtractor>,
}

impl Organizer {
    pub fn new(config: Config, backend: Arc<dyn PdfBackend>) -> Self {
        Self {
            config,
            backend,
            extractor: Arc::new(MetadataExtractor::new()),
        }
    }

    /// Use a custom-configured extractor.
    pub fn with_extractor(mut self, extractor: MetadataExtractor) -> Self {
        self.extractor = Arc::new(extractor);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Create the output and processed folders. Skipped in dry-run mode.
    pub fn prepare(&self) -> Result<(), IngestError> {
        if self.config.dry_run {
            return Ok(());
        }
        let mut folders = vec![&self.config.output_folder];
        if self.config.move_processed {
            folders.push(&self.config.processed_folder);
        }
        for folder in folders {
            std::fs::create_dir_all(folder).map_err(|source| IngestError::CreateDir {
                path: folder.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// Process every discovered document.
    ///
    /// Fails only if the output folders can't be created; per-document
    /// problems are counted in [`RunStats::failed`] and reported through
    /// `progress`. Cancelling stops the run between documents.
    pub async fn run(
        &self,
        progress: impl Fn(ProgressEvent) + Send + Sync,
        cancel: CancellationToken,
    ) -> Result<RunStats, IngestError> {
        self.prepare()?;

        let files = discover_pdfs(&self.config.input_folders);
        let total = files.len();
        progress(ProgressEvent::Discovered { total });
        tracing::info!(total, workers = self.config.num_workers, "starting run");

        let mut stats = RunStats {
            found: total,
            ..RunStats::default()
        };
        let mut seen = SeenHashes::new();
        let filer = Arc::new(Mutex::new(Filer::new(&self.config)));

        let max_pages = self.config.max_pages;
        let mut analyzed = stream::iter(files.into_iter().enumerate())
            .map(|(index, path)| {
                let backend = Arc::clone(&self.backend);
                let extractor = Arc::clone(&self.extractor);
                let task_path = path.clone();
                async move {
                    let result = tokio::task::spawn_blocking(move || {
                        analyze(&task_path, backend.as_ref(), &extractor, max_pages)
                    })
                    .await;
                    (index, path, result)
                }
            })
            .buffered(self.config.num_workers.max(1));

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::warn!("run cancelled");
                    stats.cancelled = true;
                    break;
                }
                next = analyzed.next() => next,
            };
            let Some((index, path, result)) = next else {
                break;
            };

            let doc = match result {
                Ok(doc) => doc,
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "extraction task failed");
                    stats.failed += 1;
                    progress(ProgressEvent::Failed {
                        index,
                        total,
                        path,
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            if let Some(hash) = &doc.hash
                && seen.contains(hash)
            {
                tracing::info!(path = %path.display(), "duplicate content, skipping");
                stats.duplicates += 1;
                progress(ProgressEvent::Duplicate { index, total, path });
                continue;
            }

            let task_filer = Arc::clone(&filer);
            let source = path.clone();
            let paper = doc.paper.clone();
            let placed = tokio::task::spawn_blocking(move || {
                let mut filer = task_filer.lock().unwrap_or_else(|e| e.into_inner());
                filer.file(&source, &paper)
            })
            .await
            .map_err(|e| IngestError::Task(e.to_string()))
            .and_then(|r| r);

            match placed {
                Ok(placement) => {
                    stats.filed += 1;
                    if placement.processed.is_some() {
                        stats.moved += 1;
                    }
                    if let Some(hash) = doc.hash {
                        seen.insert(hash);
                    }
                    progress(ProgressEvent::Filed {
                        index,
                        total,
                        source: path,
                        destination: placement.destination,
                        processed: placement.processed,
                        paper: doc.paper,
                    });
                }
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "filing failed");
                    stats.failed += 1;
                    progress(ProgressEvent::Failed {
                        index,
                        total,
                        path,
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            found = stats.found,
            filed = stats.filed,
            moved = stats.moved,
            duplicates = stats.duplicates,
            failed = stats.failed,
            "run finished"
        );
        Ok(stats)
    }
}

/// Organize the configured input folders with `backend`.
pub async fn organize(
    config: Config,
    backend: Arc<dyn PdfBackend>,
    progress: impl Fn(ProgressEvent) + Send + Sync,
    cancel: CancellationToken,
) -> Result<RunStats, IngestError> {
    Organizer::new(config, backend).run(progress, cancel).await
}
