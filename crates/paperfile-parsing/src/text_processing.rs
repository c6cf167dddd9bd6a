use once_cell::sync::Lazy;
use regex::Regex;

/// Marker appended to anything cut by [`truncate_with_ellipsis`].
pub const ELLIPSIS: &str = "...";

/// Expand common typographic ligatures found in PDFs.
pub fn expand_ligatures(text: &str) -> String {
    text.replace('\u{FB00}', "ff")
        .replace('\u{FB01}', "fi")
        .replace('\u{FB02}', "fl")
        .replace('\u{FB03}', "ffi")
        .replace('\u{FB04}', "ffl")
        .replace(['\u{FB05}', '\u{FB06}'], "st")
}

/// Collapse runs of newlines, carriage returns and tabs into a single space,
/// drop any other control characters, and trim.
///
/// - `"Deep\n\nLearning"` → `"Deep Learning"`
/// - `"\tAlice\r\n"` → `"Alice"`
pub fn normalize_whitespace(text: &str) -> String {
    static BREAKS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\n\r\t]+").unwrap());
    let collapsed = BREAKS_RE.replace_all(text, " ");
    let cleaned: String = collapsed.chars().filter(|c| !c.is_control()).collect();
    cleaned.trim().to_string()
}

/// Length in characters (not bytes).
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Cap `text` at `max_chars` characters. Longer input keeps its first
/// `max_chars - 3` characters followed by `"..."`.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if char_len(text) <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

/// The prefix of `text` holding at most `n` characters.
pub fn take_chars(text: &str, n: usize) -> &str {
    let end = text.char_indices().nth(n).map_or(text.len(), |(i, _)| i);
    &text[..end]
}

/// True when `text` contains a decimal digit in any script (`"２０２１"` counts).
pub fn has_digit(text: &str) -> bool {
    static DIGIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d").unwrap());
    DIGIT_RE.is_match(text)
}

/// True when `text` has at least one cased letter and no lowercase letters.
///
/// `"DEEP LEARNING 2"` is upper-case; `"2024"` and `"Deep"` are not.
pub fn is_all_uppercase(text: &str) -> bool {
    let mut has_cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_cased = true;
        }
    }
    has_cased
}

/// Upper-case the first character and lower-case the rest.
pub fn sentence_case(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Split on the first colon into trimmed `(head, tail)`; an empty tail is `None`.
pub(crate) fn split_on_colon(text: &str) -> Option<(String, Option<String>)> {
    let (head, tail) = text.split_once(':')?;
    let tail = tail.trim();
    Some((
        head.trim().to_string(),
        (!tail.is_empty()).then(|| tail.to_string()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_digit_any_script() {
        assert!(has_digit("Smith 2021"));
        assert!(has_digit("Smith ２０２１"));
        assert!(has_digit("Smith \u{0663}"));
        assert!(!has_digit("John Smith"));
    }

    #[test]
    fn test_expand_ligatures() {
        assert_eq!(expand_ligatures("ﬁnding ﬂow"), "finding flow");
        assert_eq!(expand_ligatures("eﬃcient oﬄine"), "efficient offline");
        assert_eq!(expand_ligatures("no ligatures here"), "no ligatures here");
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("Deep\n\nLearning"), "Deep Learning");
        assert_eq!(normalize_whitespace("\tAlice Wang\r\n"), "Alice Wang");
        assert_eq!(normalize_whitespace("a\u{0}b\u{7}c"), "abc");
        assert_eq!(normalize_whitespace(""), "");
        assert_eq!(normalize_whitespace(" \n\t "), "");
    }

    #[test]
    fn test_truncate_with_ellipsis() {
        let long = "x".repeat(300);
        let cut = truncate_with_ellipsis(&long, 150);
        assert_eq!(char_len(&cut), 150);
        assert!(cut.starts_with(&"x".repeat(147)));
        assert!(cut.ends_with("..."));

        assert_eq!(truncate_with_ellipsis("short", 150), "short");
        assert_eq!(truncate_with_ellipsis(&"y".repeat(50), 50), "y".repeat(50));
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        let accented = "é".repeat(60);
        let cut = truncate_with_ellipsis(&accented, 50);
        assert_eq!(char_len(&cut), 50);
        assert!(cut.starts_with(&"é".repeat(47)));
    }

    #[test]
    fn test_take_chars() {
        assert_eq!(take_chars("héllo", 2), "hé");
        assert_eq!(take_chars("abc", 10), "abc");
        assert_eq!(take_chars("", 3), "");
    }

    #[test]
    fn test_is_all_uppercase() {
        assert!(is_all_uppercase("DEEP LEARNING 2"));
        assert!(is_all_uppercase("J."));
        assert!(!is_all_uppercase("Deep"));
        assert!(!is_all_uppercase("2024"));
        assert!(!is_all_uppercase(""));
    }

    #[test]
    fn test_sentence_case() {
        assert_eq!(sentence_case("A SURVEY OF METHODS"), "A survey of methods");
        assert_eq!(sentence_case(""), "");
    }

    #[test]
    fn test_split_on_colon() {
        assert_eq!(
            split_on_colon("Efficient Indexing: A Survey"),
            Some(("Efficient Indexing".to_string(), Some("A Survey".to_string())))
        );
        assert_eq!(
            split_on_colon("Trailing colon:  "),
            Some(("Trailing colon".to_string(), None))
        );
        assert_eq!(split_on_colon("No colon"), None);
    }
}
