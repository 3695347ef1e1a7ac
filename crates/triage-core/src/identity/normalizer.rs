//! Strips volatile substrings from an error message so that messages
//! differing only in interpolated values collapse to one identity.
//!
//! Two passes, in order:
//! 1. Quoted literals (`"..."` or `'...'`), non-greedy. A closing quote
//!    preceded by a backslash is literal content. Literals never span a
//!    line break. An opening quote with no valid close is kept.
//! 2. Every run of decimal digits.
//!
//! Digits inside a literal leave with the literal. Casing is preserved.

use std::sync::LazyLock;

use regex::Regex;

static DIGIT_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

/// Normalize a message for identity hashing.
pub fn normalize(message: &str) -> String {
    let without_literals = strip_quoted_literals(message);
    DIGIT_RUN_RE.replace_all(&without_literals, "").into_owned()
}

/// Remove every well-formed quoted span, scanning left to right.
fn strip_quoted_literals(message: &str) -> String {
    let chars: Vec<char> = message.chars().collect();
    let mut out = String::with_capacity(message.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if is_quote(c) {
            if let Some(close) = closing_quote(&chars, i) {
                i = close + 1;
                continue;
            }
        }
        out.push(c);
        i += 1;
    }
    out
}

/// Index of the quote closing the literal opened at `open`, if any.
fn closing_quote(chars: &[char], open: usize) -> Option<usize> {
    let quote = chars[open];
    let mut prev = quote;
    for (j, &c) in chars.iter().enumerate().skip(open + 1) {
        if c == '\n' {
            return None;
        }
        if c == quote && prev != '\\' {
            return Some(j);
        }
        prev = c;
    }
    None
}

fn is_quote(c: char) -> bool {
    c == '"' || c == '\''
}
