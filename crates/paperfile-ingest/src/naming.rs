use std::collections::HashSet;
use std::path::{Path, PathBuf};

use paperfile_core::PaperMetadata;
use paperfile_parsing::text_processing::truncate_with_ellipsis;

/// Longest file name produced by [`sanitize_filename`], in chars.
pub const MAX_FILENAME_CHARS: usize = 200;

const INVALID_FILENAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Replace characters that are invalid in file names on common platforms
/// with `_`, then cap the result at 200 chars.
///
/// - `"Efficient Indexing: A Survey"` → `"Efficient Indexing_ A Survey"`
pub fn sanitize_filename(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if INVALID_FILENAME_CHARS.contains(&c) { '_' } else { c })
        .collect();
    truncate_with_ellipsis(&replaced, MAX_FILENAME_CHARS)
}

/// `"{title}({author}).pdf"`, sanitized.
pub fn paper_filename(paper: &PaperMetadata) -> String {
    format!(
        "{}.pdf",
        sanitize_filename(&format!("{}({})", paper.title, paper.author))
    )
}

/// First free path for `file_name` in `dir`, appending `_1`, `_2`, … to the
/// stem until neither the filesystem nor `reserved` holds it.
pub fn unique_destination(dir: &Path, file_name: &str, reserved: &HashSet<PathBuf>) -> PathBuf {
    let taken = |p: &Path| p.exists() || reserved.contains(p);

    let candidate = dir.join(file_name);
    if !taken(&candidate) {
        return candidate;
    }

    let name = Path::new(file_name);
    let stem = name
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string());
    let ext = name.extension().map(|e| e.to_string_lossy().into_owned());

    (1..)
        .map(|n| {
            let numbered = match &ext {
                Some(ext) => format!("{stem}_{n}.{ext}"),
                None => format!("{stem}_{n}"),
            };
            dir.join(numbered)
        })
        .find(|p| !taken(p))
        .unwrap_or(candidate)
}
