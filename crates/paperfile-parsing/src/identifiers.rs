use once_cell::sync::Lazy;
use regex::Regex;

static DOCUMENT_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}\.\d{5}(?:v\d+)?").unwrap());

/// Extract an arXiv-style document identifier from a file name.
///
/// Matches the `YYMM.NNNNN` form with an optional version suffix:
/// - `2301.01234v2.pdf` → `2301.01234v2`
/// - `paper-2106.09685.pdf` → `2106.09685`
///
/// Four-digit sequence numbers (pre-2015 ids) are not recognized.
pub fn extract_document_id(filename: &str) -> Option<&str> {
    DOCUMENT_ID_RE.find(filename).map(|m| m.as_str())
}

/// Does the file name carry a document identifier?
pub fn has_document_id(filename: &str) -> bool {
    DOCUMENT_ID_RE.is_match(filename)
}
