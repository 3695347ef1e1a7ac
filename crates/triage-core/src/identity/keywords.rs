//! Keyword extraction for search. Not part of the identity.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").unwrap());

/// Lowercase word tokens of a raw message, deduplicated.
pub fn extract_keywords(message: &str) -> BTreeSet<String> {
    let lowered = fold_case(message);
    WORD_RE
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Case folding shared by keyword extraction and search terms.
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_lowercases_and_dedups() {
        let kw = extract_keywords("Connection RESET by peer; connection closed");
        let expected: BTreeSet<String> = ["connection", "reset", "by", "peer", "closed"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(kw, expected);
    }

    #[test]
    fn keeps_digits_and_underscores() {
        let kw = extract_keywords("user_id 42 missing");
        assert!(kw.contains("user_id"));
        assert!(kw.contains("42"));
    }

    #[test]
    fn unicode_words_are_tokens() {
        let kw = extract_keywords("Ошибка Größe");
        assert!(kw.contains("ошибка"));
        assert!(kw.contains("größe"));
    }

    #[test]
    fn empty_message_has_no_keywords() {
        assert!(extract_keywords("  ...  ").is_empty());
    }
}
