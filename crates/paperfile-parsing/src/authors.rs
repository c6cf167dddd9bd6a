use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use paperfile_core::DocumentMetadata;

use crate::config::ParsingConfig;
use crate::identifiers::has_document_id;
use crate::text_processing::{
    char_len, has_digit, normalize_whitespace, take_chars, truncate_with_ellipsis,
};
use crate::validate::{is_author_line, is_author_name_with_config};

/// Which strategy produced an [`AuthorResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorSource {
    Metadata,
    Identifier,
    Proximity,
    Global,
    /// The whole metadata author string, used when nothing better was found.
    MetadataFallback,
    Unknown,
}

impl fmt::Display for AuthorSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AuthorSource::Metadata => "metadata",
            AuthorSource::Identifier => "identifier",
            AuthorSource::Proximity => "proximity",
            AuthorSource::Global => "global",
            AuthorSource::MetadataFallback => "metadata fallback",
            AuthorSource::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// The inferred first author and the strategy that found it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorResult {
    pub name: String,
    pub source: AuthorSource,
}

/// The first author of a separated author list.
///
/// Splits on the first comma, else the first semicolon, else the first
/// standalone "and" (any case).
///
/// - `"Alice Wang, Bob Lee"` → `"Alice Wang"`
/// - `"Alice Wang and Bob Lee"` → `"Alice Wang"`
/// - `"Alexander Hamilton"` → `"Alexander Hamilton"`
pub fn first_author_segment(authors: &str) -> String {
    static AND_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\band\b").unwrap());

    let head = if let Some((head, _)) = authors.split_once(',') {
        head
    } else if let Some((head, _)) = authors.split_once(';') {
        head
    } else if let Some(m) = AND_RE.find(authors) {
        &authors[..m.start()]
    } else {
        authors
    };
    head.trim().to_string()
}

/// Remove parenthesized affiliations and email addresses.
pub fn strip_affiliations(author: &str) -> String {
    static PAREN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(.*?\)").unwrap());
    static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+@\S+").unwrap());

    let without_parens = PAREN_RE.replace_all(author, "");
    EMAIL_RE.replace_all(&without_parens, "").trim().to_string()
}

/// Infer the first author of a paper.
///
/// `title` is the main title (without subtitle) as returned by the title
/// extractor. Returns `"Unknown"` when nothing plausible is found.
pub fn extract_author(
    text: &str,
    title: &str,
    filename: &str,
    metadata: &DocumentMetadata,
) -> String {
    extract_author_with_config(text, title, filename, metadata, &ParsingConfig::default()).name
}

/// Config-aware variant of [`extract_author`] that also reports the strategy.
///
/// Strategies, first success wins:
/// 1. Embedded `Author` metadata (first listed author)
/// 2. The line right below the title, for files named by arXiv id
/// 3. Names in the text just after the title
/// 4. Name-shaped phrases anywhere near the top of the document
///
/// A result shorter than 3 chars falls back to the whole metadata author,
/// then to the configured unknown label.
pub fn extract_author_with_config(
    text: &str,
    title: &str,
    filename: &str,
    metadata: &DocumentMetadata,
    config: &ParsingConfig,
) -> AuthorResult {
    let metadata_author = metadata.author.as_deref().map(str::trim).unwrap_or("");

    let found = try_metadata_author(metadata_author)
        .map(|name| (name, AuthorSource::Metadata))
        .or_else(|| {
            try_identifier_anchored(text, title, filename, config)
                .map(|name| (name, AuthorSource::Identifier))
        })
        .or_else(|| try_post_title(text, title, config).map(|name| (name, AuthorSource::Proximity)))
        .or_else(|| try_global_patterns(text, config).map(|name| (name, AuthorSource::Global)));

    let (name, source) = match found {
        Some((name, source)) if char_len(&name) >= 3 => (name, source),
        _ if char_len(metadata_author) > 2 => {
            (metadata_author.to_string(), AuthorSource::MetadataFallback)
        }
        _ => (config.unknown_author.clone(), AuthorSource::Unknown),
    };

    let name = normalize_whitespace(&name);
    if name.is_empty() {
        return AuthorResult {
            name: config.unknown_author.clone(),
            source: AuthorSource::Unknown,
        };
    }

    tracing::debug!(%source, author = %name, "author resolved");
    AuthorResult {
        name: truncate_with_ellipsis(&name, config.max_author_chars),
        source,
    }
}

fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}

fn try_metadata_author(metadata_author: &str) -> Option<String> {
    let len = char_len(metadata_author);
    if len <= 2 || len >= 50 {
        return None;
    }
    non_empty(first_author_segment(metadata_author))
}

fn try_identifier_anchored(
    text: &str,
    title: &str,
    filename: &str,
    config: &ParsingConfig,
) -> Option<String> {
    let title = title.trim();
    if title.is_empty() || !has_document_id(filename) {
        return None;
    }

    let lines: Vec<&str> = text.split('\n').take(config.author_scan_lines).collect();
    let title_idx = lines.iter().position(|l| l.contains(title))?;
    let author_line = lines.get(title_idx + 1)?;
    if !is_author_line(author_line) {
        return None;
    }

    let author = strip_affiliations(&first_author_segment(author_line));
    if author.is_empty() || !is_author_name_with_config(&author, config) {
        return None;
    }
    tracing::trace!(filename, author = %author, "author line below title");
    Some(author)
}

fn try_post_title(text: &str, title: &str, config: &ParsingConfig) -> Option<String> {
    if title.is_empty() {
        return None;
    }
    let title_end = text.find(title)? + title.len();
    let window = take_chars(&text[title_end..], config.proximity_window_chars);

    let candidate = scan_author_lines(window, config).or_else(|| match_author_patterns(window, config))?;
    non_empty(strip_affiliations(&first_author_segment(&candidate)))
}

/// Check the leading lines of `window` one at a time for a validated name.
fn scan_author_lines(window: &str, config: &ParsingConfig) -> Option<String> {
    static NAME_RUN_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"[A-Z][a-z]+(?:\s+[A-Z][a-z]+)+").unwrap());

    for line in window.split('\n').take(config.proximity_lines) {
        if !is_author_line(line) {
            continue;
        }

        if let Some(m) = NAME_RUN_RE.find(line) {
            let name = m.as_str().trim();
            if is_author_name_with_config(name, config) {
                return Some(name.to_string());
            }
        }

        if let Some((head, _)) = line.split_once(',')
            && !has_digit(head)
        {
            let head = head.trim();
            if is_author_name_with_config(head, config) {
                return Some(head.to_string());
            }
        }
    }
    None
}

fn match_author_patterns(window: &str, config: &ParsingConfig) -> Option<String> {
    static AUTHOR_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
        [
            r"(?:Author|AUTHORS|By)[:\s]+(.*?)[\n\r]",
            r"(?:\n|\r)((?:[A-Z][a-z]+\s+)+[A-Z][a-z]+)(?:\n|\r|,)",
            r"([A-Z][a-z]+\s+[A-Z][a-z]+)(?:\s*,\s*\d|\s*\(\d)",
            r"([A-Z][a-z]+\s+[A-Z]\.\s*[A-Z][a-z]+)",
            r"([A-Z][a-z]+(?:-[A-Z][a-z]+)?\s+[A-Z][a-z]+)",
        ]
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
    });

    first_valid_capture(&AUTHOR_PATTERNS, window, config)
}

fn try_global_patterns(text: &str, config: &ParsingConfig) -> Option<String> {
    static GLOBAL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
        [
            r"([A-Z][a-z]+\s+[A-Z]\.\s*[A-Z][a-z]+)",
            r"([A-Z][a-z]+\s+[A-Z][a-z]+)(?:\s*,\s*\d|\s*\(\d)",
            // The trailing group is consumed, not looked ahead; the capture is identical.
            r"([A-Z][a-z]+\s+(?:[A-Z][a-z]+\s+){0,2}[A-Z][a-z]+)(?:\s*,|\s*and|\s*;|\s*\n)",
        ]
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
    });

    let head = take_chars(text, config.global_window_chars);
    first_valid_capture(&GLOBAL_PATTERNS, head, config)
}

/// The leftmost match of each pattern in turn; the first one that validates wins.
fn first_valid_capture(patterns: &[Regex], haystack: &str, config: &ParsingConfig) -> Option<String> {
    patterns.iter().find_map(|re| {
        let caps = re.captures(haystack)?;
        let candidate = caps.get(1)?.as_str().trim();
        is_author_name_with_config(candidate, config).then(|| candidate.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_meta() -> DocumentMetadata {
        DocumentMetadata::default()
    }

    fn meta_author(author: &str) -> DocumentMetadata {
        DocumentMetadata::new(None, Some(author.to_string()))
    }

    #[test]
    fn test_first_author_segment() {
        assert_eq!(first_author_segment("Alice Wang, Bob Lee"), "Alice Wang");
        assert_eq!(first_author_segment("Alice Wang; Bob Lee"), "Alice Wang");
        assert_eq!(first_author_segment("Alice Wang AND Bob Lee"), "Alice Wang");
        assert_eq!(first_author_segment("Alexander Hamilton"), "Alexander Hamilton");
        assert_eq!(first_author_segment("Sandra Lee"), "Sandra Lee");
    }

    #[test]
    fn test_strip_affiliations() {
        assert_eq!(strip_affiliations("Alice Wang (MIT)"), "Alice Wang");
        assert_eq!(strip_affiliations("Alice Wang alice@mit.edu"), "Alice Wang");
        assert_eq!(strip_affiliations("(MIT)"), "");
    }

    #[test]
    fn test_metadata_author_first_segment() {
        let result = extract_author_with_config(
            "",
            "Title",
            "paper.pdf",
            &meta_author("Alice Wang and Bob Lee"),
            &ParsingConfig::default(),
        );
        assert_eq!(result.name, "Alice Wang");
        assert_eq!(result.source, AuthorSource::Metadata);
    }

    #[test]
    fn test_metadata_author_not_validated() {
        assert_eq!(extract_author("", "T", "p.pdf", &meta_author("acmuser")), "acmuser");
    }

    #[test]
    fn test_identifier_anchored_line() {
        let text = "\
Sparse Attention for Long Documents
Alice Wang, Bob Lee
Stanford
Abstract
";
        let result = extract_author_with_config(
            text,
            "Sparse Attention for Long Documents",
            "2301.01234v2.pdf",
            &no_meta(),
            &ParsingConfig::default(),
        );
        assert_eq!(result.name, "Alice Wang");
        assert_eq!(result.source, AuthorSource::Identifier);
    }

    #[test]
    fn test_identifier_line_with_affiliation() {
        let text = "Sparse Attention for Long Documents\nAlice Wang (Stanford) and Bob Lee\n";
        let author = extract_author(
            text,
            "Sparse Attention for Long Documents",
            "2301.01234.pdf",
            &no_meta(),
        );
        assert_eq!(author, "Alice Wang");
    }

    #[test]
    fn test_proximity_name_run() {
        let text = "\
Sparse Attention for Long Documents
Carol Diaz
Stanford
";
        let result = extract_author_with_config(
            text,
            "Sparse Attention for Long Documents",
            "sparse.pdf",
            &no_meta(),
            &ParsingConfig::default(),
        );
        assert_eq!(result.name, "Carol Diaz");
        assert_eq!(result.source, AuthorSource::Proximity);
    }

    #[test]
    fn test_proximity_skips_invalid_lines() {
        let text = "\
Sparse Attention for Long Documents
ABSTRACT BANNER LINE
Department Of Physics
J. K. Rowling, Oxford
";
        let author = extract_author(text, "Sparse Attention for Long Documents", "x.pdf", &no_meta());
        assert_eq!(author, "J. K. Rowling");
    }

    #[test]
    fn test_proximity_pattern_when_line_is_rejected() {
        // The line mentions a university, so only the regex pass sees the name.
        let text = "Robust Graph Learning\nMaria Gonzalez, Stanford University\n";
        let result = extract_author_with_config(
            text,
            "Robust Graph Learning",
            "x.pdf",
            &no_meta(),
            &ParsingConfig::default(),
        );
        assert_eq!(result.name, "Maria Gonzalez");
        assert_eq!(result.source, AuthorSource::Proximity);
    }

    #[test]
    fn test_proximity_label_beyond_scanned_lines() {
        let filler = "see the appendix for details\n".repeat(10);
        for label in ["Author: ", "By "] {
            let text = format!("Robust Graph Learning\n{filler}{label}Grace Hopper\n");
            let result = extract_author_with_config(
                &text,
                "Robust Graph Learning",
                "x.pdf",
                &no_meta(),
                &ParsingConfig::default(),
            );
            assert_eq!(result.name, "Grace Hopper", "label {label:?}");
            assert_eq!(result.source, AuthorSource::Proximity);
        }
    }

    #[test]
    fn test_global_fallback() {
        let text = "notes on engines by Ada Lovelace, 1843";
        let result = extract_author_with_config(
            text,
            "Not In Text",
            "x.pdf",
            &no_meta(),
            &ParsingConfig::default(),
        );
        assert_eq!(result.name, "Ada Lovelace");
        assert_eq!(result.source, AuthorSource::Global);
    }

    #[test]
    fn test_global_multiword_before_separator() {
        let text = "written here by Grace Brewster Hopper and others";
        assert_eq!(extract_author(text, "", "x.pdf", &no_meta()), "Grace Brewster Hopper");
    }

    #[test]
    fn test_unknown_when_nothing_found() {
        let result = extract_author_with_config(
            "lowercase text only",
            "",
            "x.pdf",
            &no_meta(),
            &ParsingConfig::default(),
        );
        assert_eq!(result.name, "Unknown");
        assert_eq!(result.source, AuthorSource::Unknown);
    }

    #[test]
    fn test_short_result_uses_whole_metadata_author() {
        let result = extract_author_with_config(
            "",
            "",
            "x.pdf",
            &meta_author("Li, Wei"),
            &ParsingConfig::default(),
        );
        assert_eq!(result.name, "Li, Wei");
        assert_eq!(result.source, AuthorSource::MetadataFallback);
    }

    #[test]
    fn test_long_metadata_author_is_fallback_and_truncated() {
        let long = format!("Alice Wang {}", "x".repeat(60));
        let result = extract_author_with_config(
            "",
            "",
            "x.pdf",
            &meta_author(&long),
            &ParsingConfig::default(),
        );
        assert_eq!(result.source, AuthorSource::MetadataFallback);
        assert_eq!(char_len(&result.name), 50);
        assert!(result.name.ends_with("..."));
    }
}
