//! Acceptance gates shared by every author strategy.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ParsingConfig;
use crate::text_processing::{char_len, has_digit, is_all_uppercase};

/// Lower-cased fragments that mark a line as front-matter rather than authors.
const NON_AUTHOR_LINE_MARKERS: &[&str] = &[
    "abstract",
    "keywords",
    "introduction",
    "university",
    "institute",
    "table",
    "copyright",
];

/// Words that, when they make up the whole candidate, mean it is prose.
const FILLER_WORDS: &[&str] = &[
    "for", "of", "in", "on", "with", "using", "by", "to", "at", "from", "and",
];

/// Does this line look like it could hold an author list?
///
/// - `"Alice Wang, Bob Lee"` → true
/// - `"Abstract"` → false
/// - `"On the Hardness of Learning"` → false
pub fn is_author_line(line: &str) -> bool {
    static LEADING_DIGIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d").unwrap());
    static PROSE_START_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?i)^(?:for|of|in|on|with|using|a|an|the|toward)\s").unwrap()
    });

    let line = line.trim();
    if char_len(line) > 100 {
        return false;
    }

    let lower = line.to_lowercase();
    if NON_AUTHOR_LINE_MARKERS.iter().any(|m| lower.contains(m)) || lower.starts_with("fig") {
        return false;
    }

    if LEADING_DIGIT_RE.is_match(line) {
        return false;
    }

    // Shouted lines are section headings or venue banners.
    if is_all_uppercase(line) && char_len(line) > 5 {
        return false;
    }

    !PROSE_START_RE.is_match(line)
}

/// Does this string look like a single person's name?
///
/// Uses the default name blacklist.
///
/// - `"John Smith"` → true
/// - `"J. K. Rowling"` → true
/// - `"John Smith 2021"` → false
/// - `"Smith"` → false
pub fn is_author_name(name: &str) -> bool {
    is_author_name_with_config(name, &ParsingConfig::default())
}

/// Config-aware variant of [`is_author_name`].
pub fn is_author_name_with_config(name: &str, config: &ParsingConfig) -> bool {
    static CAPITALIZED_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"[A-Z][a-z]+|[A-Z]\.").unwrap());
    static LEADING_INITIAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]\.").unwrap());

    let name = name.trim();
    let len = char_len(name);
    if !(2..=50).contains(&len) {
        return false;
    }

    if !name.contains(' ') {
        return false;
    }

    if has_digit(name) {
        return false;
    }

    if !CAPITALIZED_RE.is_match(name) {
        return false;
    }

    let words: Vec<&str> = name.split_whitespace().collect();
    if words.len() > 6 {
        return false;
    }

    let blacklisted = words.iter().any(|w| {
        let bare = w
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();
        config.name_blacklist.iter().any(|b| *b == bare)
    });
    if blacklisted {
        return false;
    }

    if words
        .iter()
        .all(|w| FILLER_WORDS.contains(&w.to_lowercase().as_str()))
    {
        return false;
    }

    let has_acronym = words
        .iter()
        .any(|w| is_all_uppercase(w) && char_len(w) > 1);
    if has_acronym && !LEADING_INITIAL_RE.is_match(name) {
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParsingConfigBuilder;

    #[test]
    fn test_author_line_accepts_name_lists() {
        assert!(is_author_line("Alice Wang, Bob Lee"));
        assert!(is_author_line("  J. Smith and K. Jones  "));
        assert!(is_author_line("ACM"));
    }

    #[test]
    fn test_author_line_rejects_front_matter() {
        assert!(!is_author_line("Abstract"));
        assert!(!is_author_line("Stanford University"));
        assert!(!is_author_line("Figure 1: Overview"));
        assert!(!is_author_line("Table 2"));
        assert!(!is_author_line("1 Introduction"));
        assert!(!is_author_line("2023 Proceedings"));
        assert!(!is_author_line("PROCEEDINGS OF THE VLDB"));
        assert!(!is_author_line(&"Alice ".repeat(30)));
    }

    #[test]
    fn test_digits_in_any_script_are_rejected() {
        assert!(!is_author_name("John Smith ２０２１"));
        assert!(!is_author_name("John Smith\u{0662}"));
        assert!(!is_author_line("１ Overview"));
    }

    #[test]
    fn test_author_line_rejects_prose_openers() {
        assert!(!is_author_line("On the Hardness of Learning"));
        assert!(!is_author_line("the quick brown fox"));
        assert!(!is_author_line("Toward Robust Models"));
        // Whole word only.
        assert!(is_author_line("Anna Schmidt"));
        assert!(is_author_line("Theo Smith"));
    }

    #[test]
    fn test_author_name_examples() {
        assert!(is_author_name("John Smith"));
        assert!(is_author_name("J. K. Rowling"));
        assert!(is_author_name("Alice Wang"));
        assert!(!is_author_name("John Smith 2021"));
        assert!(!is_author_name("Smith"));
    }

    #[test]
    fn test_author_name_length_and_words() {
        assert!(!is_author_name(""));
        assert!(!is_author_name(&format!("Al {}", "b".repeat(60))));
        assert!(!is_author_name("Alpha Beta Gamma Delta Epsilon Zeta Eta"));
        assert!(!is_author_name("john smith"));
    }

    #[test]
    fn test_author_name_blacklist() {
        assert!(!is_author_name("Stanford University"));
        assert!(!is_author_name("Received March"));
        assert!(!is_author_name("All Rights, Reserved."));
        // Substrings of blacklisted words are fine.
        assert!(is_author_name("Reservedo Silva"));
    }

    #[test]
    fn test_author_name_acronyms() {
        assert!(!is_author_name("John SMITH"));
        assert!(!is_author_name("IEEE Transactions"));
        assert!(is_author_name("J. SMITH"));
    }

    #[test]
    fn test_author_name_custom_blacklist() {
        let config = ParsingConfigBuilder::new()
            .add_blacklisted_word("Committee".to_string())
            .build()
            .unwrap();
        assert!(!is_author_name_with_config("Program Committee", &config));
        assert!(is_author_name_with_config("Alice Wang", &config));
    }
}
