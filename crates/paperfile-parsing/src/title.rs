use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use paperfile_core::DocumentMetadata;

use crate::config::ParsingConfig;
use crate::text_processing::{
    char_len, is_all_uppercase, normalize_whitespace, sentence_case, split_on_colon,
    truncate_with_ellipsis,
};

/// Title used when neither the document nor its file name yields one.
pub const UNTITLED: &str = "Untitled";

/// Openers that mark a short line right below the title as its subtitle.
const SUBTITLE_OPENERS: &[&str] = &[
    "for", "of", "in", "on", "with", "using", "a", "an", "the", "toward",
];

/// Which strategy produced a [`TitleResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleSource {
    Metadata,
    LineHeuristic,
    Pattern,
    Filename,
}

impl fmt::Display for TitleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TitleSource::Metadata => "metadata",
            TitleSource::LineHeuristic => "line heuristic",
            TitleSource::Pattern => "pattern",
            TitleSource::Filename => "filename",
        };
        f.write_str(name)
    }
}

/// An inferred title with its optional subtitle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitleResult {
    pub title: String,
    pub subtitle: Option<String>,
    pub source: TitleSource,
}

impl TitleResult {
    /// `"{title}: {subtitle}"`, or just the title.
    pub fn full_title(&self) -> String {
        match &self.subtitle {
            Some(sub) => format!("{}: {}", self.title, sub),
            None => self.title.clone(),
        }
    }
}

/// Intermediate (title, subtitle) pair before post-processing.
type Candidate = (String, Option<String>);

/// Infer the title of a paper from its leading text and metadata.
///
/// Strategies, first success wins:
/// 1. Embedded `Title` metadata longer than 10 chars
/// 2. The first long line near the top that isn't front-matter
/// 3. `Title:` markers or the opening sentence
/// 4. `filename_stem`, or [`UNTITLED`]
///
/// The title is capped at 150 chars and the subtitle at 100.
pub fn extract_title(text: &str, metadata: &DocumentMetadata, filename_stem: &str) -> TitleResult {
    extract_title_with_config(text, metadata, filename_stem, &ParsingConfig::default())
}

/// Config-aware variant of [`extract_title`].
pub fn extract_title_with_config(
    text: &str,
    metadata: &DocumentMetadata,
    filename_stem: &str,
    config: &ParsingConfig,
) -> TitleResult {
    let found = try_metadata_title(metadata)
        .and_then(|c| finish(c, TitleSource::Metadata, config))
        .or_else(|| {
            try_line_heuristic(text, config)
                .and_then(|c| finish(c, TitleSource::LineHeuristic, config))
        })
        .or_else(|| {
            try_title_patterns(text).and_then(|c| finish(c, TitleSource::Pattern, config))
        });

    if let Some(result) = found {
        tracing::debug!(source = %result.source, title = %result.title, "title found");
        return result;
    }

    tracing::debug!(stem = filename_stem, "no title in text, using file name");
    let stem = normalize_whitespace(filename_stem);
    let title = if stem.is_empty() {
        UNTITLED.to_string()
    } else {
        truncate_with_ellipsis(&stem, config.max_title_chars)
    };
    TitleResult {
        title,
        subtitle: None,
        source: TitleSource::Filename,
    }
}

/// Split a matched string on its first colon, or keep it whole.
fn into_candidate(text: &str) -> Candidate {
    split_on_colon(text).unwrap_or_else(|| (text.trim().to_string(), None))
}

fn try_metadata_title(metadata: &DocumentMetadata) -> Option<Candidate> {
    let title = metadata.title.as_deref()?.trim();
    (char_len(title) > 10).then(|| into_candidate(title))
}

fn try_line_heuristic(text: &str, config: &ParsingConfig) -> Option<Candidate> {
    let candidates: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .take(config.title_scan_lines)
        .filter(|l| {
            let lower = l.to_lowercase();
            !config.title_exclusions.iter().any(|ex| lower.contains(ex.as_str()))
        })
        .filter(|l| {
            (20..=200).contains(&char_len(l))
                && !l.starts_with("Fig")
                && !l.starts_with(|c: char| c.is_ascii_digit())
        })
        .collect();

    let first = *candidates.first()?;
    if let Some(split) = split_on_colon(first) {
        return Some(split);
    }

    let subtitle = candidates.get(1).filter(|second| {
        let lower = second.to_lowercase();
        (char_len(second) as f64) < char_len(first) as f64 * 1.5
            && SUBTITLE_OPENERS.iter().any(|w| lower.starts_with(w))
    });

    Some((first.to_string(), subtitle.map(|s| s.to_string())))
}

fn try_title_patterns(text: &str) -> Option<Candidate> {
    static TITLE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
        [
            r"(?:Title|TITLE)[:\s]+(.*?)[\n\r]",
            r"^([A-Z][^.!?]*[.!?])(?:\s|$)",
            r"^\s*([A-Z][^.!?]{10,100}[.!?])",
        ]
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
    });

    // The first pattern that matches decides, even when its capture is blank.
    let caps = TITLE_PATTERNS.iter().find_map(|re| re.captures(text))?;
    let matched = caps.get(1)?.as_str().trim();
    if matched.is_empty() {
        return None;
    }
    Some(into_candidate(matched))
}

/// Normalize and cap a candidate; `None` if nothing printable remains.
fn finish(
    (title, subtitle): Candidate,
    source: TitleSource,
    config: &ParsingConfig,
) -> Option<TitleResult> {
    let title = normalize_whitespace(&title);
    if title.is_empty() {
        return None;
    }

    let subtitle = subtitle
        .map(|s| normalize_whitespace(&s))
        .filter(|s| !s.is_empty())
        .map(|s| {
            let s = truncate_with_ellipsis(&s, config.max_subtitle_chars);
            if is_all_uppercase(&s) && char_len(&s) > 10 {
                sentence_case(&s)
            } else {
                s
            }
        });

    Some(TitleResult {
        title: truncate_with_ellipsis(&title, config.max_title_chars),
        subtitle,
        source,
    })
}
