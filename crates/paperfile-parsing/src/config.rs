use crate::ParsingError;

/// Title lines containing any of these (case-insensitive) are never title candidates.
pub(crate) const DEFAULT_TITLE_EXCLUSIONS: &[&str] = &[
    "University",
    "Institute",
    "Department",
    "Abstract",
    "Introduction",
    "Keywords",
    "©",
    "Email",
    "http",
];

/// Words that disqualify a candidate author name.
pub(crate) const DEFAULT_NAME_BLACKLIST: &[&str] = &[
    "university",
    "institute",
    "department",
    "abstract",
    "introduction",
    "keywords",
    "copyright",
    "rights",
    "reserved",
    "published",
    "submitted",
    "received",
    "accepted",
    "revised",
];

/// Controls how a list of values is overridden from its defaults.
#[derive(Debug, Clone, Default)]
pub enum ListOverride<T> {
    /// Use the built-in defaults.
    #[default]
    Default,
    /// Completely replace the defaults with these values.
    Replace(Vec<T>),
    /// Append these values to the defaults.
    Extend(Vec<T>),
}

impl<T: Clone> ListOverride<T> {
    /// Resolve this override against the given defaults.
    pub fn resolve(&self, defaults: &[T]) -> Vec<T> {
        match self {
            ListOverride::Default => defaults.to_vec(),
            ListOverride::Replace(v) => v.clone(),
            ListOverride::Extend(v) => {
                let mut result = defaults.to_vec();
                result.extend(v.iter().cloned());
                result
            }
        }
    }
}

/// Tunables for the title/author extraction engine.
///
/// Defaults reproduce the stock heuristics; use [`ParsingConfigBuilder`] to
/// adjust them.
#[derive(Debug, Clone)]
pub struct ParsingConfig {
    // ── title.rs ──
    /// Non-empty leading lines scanned by the line heuristic (default: 30).
    pub(crate) title_scan_lines: usize,
    /// Lower-cased substrings that exclude a line from title candidacy.
    pub(crate) title_exclusions: Vec<String>,
    /// Maximum title length in chars, ellipsis included (default: 150).
    pub(crate) max_title_chars: usize,
    /// Maximum subtitle length in chars, ellipsis included (default: 100).
    pub(crate) max_subtitle_chars: usize,

    // ── authors.rs ──
    /// Leading lines searched for the title in the identifier strategy (default: 50).
    pub(crate) author_scan_lines: usize,
    /// Chars after the title examined by the proximity strategy (default: 1000).
    pub(crate) proximity_window_chars: usize,
    /// Lines of the proximity window checked individually (default: 10).
    pub(crate) proximity_lines: usize,
    /// Leading chars of the document searched by the global fallback (default: 3000).
    pub(crate) global_window_chars: usize,
    /// Maximum author length in chars, ellipsis included (default: 50).
    pub(crate) max_author_chars: usize,
    /// Label used when no author can be inferred (default: `"Unknown"`).
    pub(crate) unknown_author: String,

    // ── validate.rs ──
    /// Lower-cased words that disqualify an author name.
    pub(crate) name_blacklist: Vec<String>,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            title_scan_lines: 30,
            title_exclusions: lowercase_all(DEFAULT_TITLE_EXCLUSIONS),
            max_title_chars: 150,
            max_subtitle_chars: 100,
            author_scan_lines: 50,
            proximity_window_chars: 1000,
            proximity_lines: 10,
            global_window_chars: 3000,
            max_author_chars: 50,
            unknown_author: crate::UNKNOWN_AUTHOR.to_string(),
            name_blacklist: lowercase_all(DEFAULT_NAME_BLACKLIST),
        }
    }
}

impl ParsingConfig {
    /// Label used when no author can be inferred.
    pub fn unknown_author(&self) -> &str {
        &self.unknown_author
    }

    pub fn max_title_chars(&self) -> usize {
        self.max_title_chars
    }

    pub fn max_author_chars(&self) -> usize {
        self.max_author_chars
    }
}

fn lowercase_all<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    values.iter().map(|v| v.as_ref().to_lowercase()).collect()
}

/// Builder for [`ParsingConfig`].
///
/// [`build()`](Self::build) rejects limits too small to hold the `"..."`
/// truncation marker and an empty unknown-author label.
#[derive(Debug, Clone, Default)]
pub struct ParsingConfigBuilder {
    title_scan_lines: Option<usize>,
    title_exclusions: ListOverride<String>,
    max_title_chars: Option<usize>,
    max_subtitle_chars: Option<usize>,
    author_scan_lines: Option<usize>,
    proximity_window_chars: Option<usize>,
    proximity_lines: Option<usize>,
    global_window_chars: Option<usize>,
    max_author_chars: Option<usize>,
    unknown_author: Option<String>,
    name_blacklist: ListOverride<String>,
}

impl ParsingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Title ──

    pub fn title_scan_lines(mut self, n: usize) -> Self {
        self.title_scan_lines = Some(n);
        self
    }

    pub fn set_title_exclusions(mut self, terms: Vec<String>) -> Self {
        self.title_exclusions = ListOverride::Replace(terms);
        self
    }

    pub fn add_title_exclusion(mut self, term: String) -> Self {
        match &mut self.title_exclusions {
            ListOverride::Extend(v) => v.push(term),
            _ => self.title_exclusions = ListOverride::Extend(vec![term]),
        }
        self
    }

    pub fn max_title_chars(mut self, n: usize) -> Self {
        self.max_title_chars = Some(n);
        self
    }

    pub fn max_subtitle_chars(mut self, n: usize) -> Self {
        self.max_subtitle_chars = Some(n);
        self
    }

    // ── Author ──

    pub fn author_scan_lines(mut self, n: usize) -> Self {
        self.author_scan_lines = Some(n);
        self
    }

    pub fn proximity_window_chars(mut self, n: usize) -> Self {
        self.proximity_window_chars = Some(n);
        self
    }

    pub fn proximity_lines(mut self, n: usize) -> Self {
        self.proximity_lines = Some(n);
        self
    }

    pub fn global_window_chars(mut self, n: usize) -> Self {
        self.global_window_chars = Some(n);
        self
    }

    pub fn max_author_chars(mut self, n: usize) -> Self {
        self.max_author_chars = Some(n);
        self
    }

    pub fn unknown_author(mut self, label: &str) -> Self {
        self.unknown_author = Some(label.to_string());
        self
    }

    // ── Name blacklist ──

    pub fn set_name_blacklist(mut self, words: Vec<String>) -> Self {
        self.name_blacklist = ListOverride::Replace(words);
        self
    }

    pub fn add_blacklisted_word(mut self, word: String) -> Self {
        match &mut self.name_blacklist {
            ListOverride::Extend(v) => v.push(word),
            _ => self.name_blacklist = ListOverride::Extend(vec![word]),
        }
        self
    }

    /// Validate and produce a [`ParsingConfig`].
    pub fn build(self) -> Result<ParsingConfig, ParsingError> {
        let defaults = ParsingConfig::default();

        let limit = |name: &str, value: Option<usize>, default: usize| {
            let v = value.unwrap_or(default);
            if v <= crate::text_processing::ELLIPSIS.len() {
                Err(ParsingError::InvalidConfig(format!(
                    "{name} must be greater than 3 (got {v})"
                )))
            } else {
                Ok(v)
            }
        };

        let unknown_author = self.unknown_author.unwrap_or(defaults.unknown_author);
        if unknown_author.trim().is_empty() {
            return Err(ParsingError::InvalidConfig(
                "unknown_author must not be empty".into(),
            ));
        }

        let default_exclusions: Vec<String> =
            DEFAULT_TITLE_EXCLUSIONS.iter().map(|s| s.to_string()).collect();
        let default_blacklist: Vec<String> =
            DEFAULT_NAME_BLACKLIST.iter().map(|s| s.to_string()).collect();

        Ok(ParsingConfig {
            title_scan_lines: self.title_scan_lines.unwrap_or(defaults.title_scan_lines),
            title_exclusions: lowercase_all(&self.title_exclusions.resolve(&default_exclusions)),
            max_title_chars: limit("max_title_chars", self.max_title_chars, defaults.max_title_chars)?,
            max_subtitle_chars: limit(
                "max_subtitle_chars",
                self.max_subtitle_chars,
                defaults.max_subtitle_chars,
            )?,
            author_scan_lines: self.author_scan_lines.unwrap_or(defaults.author_scan_lines),
            proximity_window_chars: self
                .proximity_window_chars
                .unwrap_or(defaults.proximity_window_chars),
            proximity_lines: self.proximity_lines.unwrap_or(defaults.proximity_lines),
            global_window_chars: self
                .global_window_chars
                .unwrap_or(defaults.global_window_chars),
            max_author_chars: limit(
                "max_author_chars",
                self.max_author_chars,
                defaults.max_author_chars,
            )?,
            unknown_author,
            name_blacklist: lowercase_all(&self.name_blacklist.resolve(&default_blacklist)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ParsingConfig::default();
        assert_eq!(config.title_scan_lines, 30);
        assert_eq!(config.max_title_chars, 150);
        assert_eq!(config.max_subtitle_chars, 100);
        assert_eq!(config.max_author_chars, 50);
        assert_eq!(config.proximity_window_chars, 1000);
        assert_eq!(config.global_window_chars, 3000);
        assert_eq!(config.unknown_author(), "Unknown");
        assert!(config.title_exclusions.contains(&"university".to_string()));
        assert!(config.name_blacklist.contains(&"revised".to_string()));
    }

    #[test]
    fn test_builder_defaults_match_default() {
        let built = ParsingConfigBuilder::new().build().unwrap();
        let default = ParsingConfig::default();
        assert_eq!(built.title_exclusions, default.title_exclusions);
        assert_eq!(built.name_blacklist, default.name_blacklist);
        assert_eq!(built.max_author_chars, default.max_author_chars);
    }

    #[test]
    fn test_builder_overrides() {
        let config = ParsingConfigBuilder::new()
            .max_title_chars(80)
            .unknown_author("Anonymous")
            .add_title_exclusion("Preprint".to_string())
            .set_name_blacklist(vec!["Committee".to_string()])
            .build()
            .unwrap();
        assert_eq!(config.max_title_chars, 80);
        assert_eq!(config.unknown_author(), "Anonymous");
        assert!(config.title_exclusions.contains(&"preprint".to_string()));
        assert!(config.title_exclusions.contains(&"university".to_string()));
        assert_eq!(config.name_blacklist, vec!["committee".to_string()]);
    }

    #[test]
    fn test_builder_rejects_tiny_limits() {
        assert!(ParsingConfigBuilder::new().max_author_chars(3).build().is_err());
        assert!(ParsingConfigBuilder::new().unknown_author("  ").build().is_err());
    }

    #[test]
    fn test_list_override_resolve() {
        let defaults = vec!["a".to_string(), "b".to_string()];

        let d: ListOverride<String> = ListOverride::Default;
        assert_eq!(d.resolve(&defaults), defaults);

        let r: ListOverride<String> = ListOverride::Replace(vec!["x".to_string()]);
        assert_eq!(r.resolve(&defaults), vec!["x".to_string()]);

        let e: ListOverride<String> = ListOverride::Extend(vec!["c".to_string()]);
        assert_eq!(
            e.resolve(&defaults),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
    }
}
