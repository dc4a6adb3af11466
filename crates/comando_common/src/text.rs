//! Text normalization and tokenization
//!
//! Both stages are pure functions of their input.

use regex::Regex;
use std::sync::OnceLock;
use unicode_normalization::char::canonical_combining_class;
use unicode_normalization::UnicodeNormalization;

fn token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[\w\-.]+|https?://\S+|/\S+").expect("token regex must compile")
    })
}

/// Canonicalize raw text: compatibility decomposition, lowercase, combining
/// marks dropped, whitespace runs collapsed to one space and trimmed.
///
/// Lowercasing happens after decomposition so that compatibility characters
/// decomposing to uppercase letters still fold, which keeps the function
/// idempotent.
pub fn normalize(text: &str) -> String {
    // Whole-string lowercasing so a word-final capital sigma becomes ς
    let decomposed: String = text.nfkd().collect();
    let folded: String = decomposed
        .to_lowercase()
        .chars()
        .filter(|c| canonical_combining_class(*c) == 0)
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split normalized text into words, URLs and path-like fragments, in
/// document order. Characters outside any match are dropped.
pub fn tokenize(text: &str) -> Vec<String> {
    token_re()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}
