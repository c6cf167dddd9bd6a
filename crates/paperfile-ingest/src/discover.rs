use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Is `path` named `*.pdf` (any case)?
pub fn is_pdf_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// Recursively collect PDF files under each folder, in folder order and
/// then sorted by file name within each directory.
///
/// Missing folders and unreadable entries are logged and skipped.
pub fn discover_pdfs(folders: &[PathBuf]) -> Vec<PathBuf> {
    let mut found = Vec::new();
    for folder in folders {
        if !folder.is_dir() {
            tracing::warn!(path = %folder.display(), "input folder does not exist, skipping");
            continue;
        }
        tracing::info!(path = %folder.display(), "scanning input folder");

        for entry in WalkDir::new(folder).sort_by_file_name() {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if entry.file_type().is_file() && is_pdf_path(entry.path()) {
                found.push(entry.into_path());
            }
        }
    }
    found
}
