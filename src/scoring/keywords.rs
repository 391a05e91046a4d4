use serde::{Deserialize, Serialize};

use crate::scoring::text::{normalize, plain_tokens};

/// Keywords are raw reference tokens longer than this many characters.
pub const KEYWORD_MIN_EXCLUSIVE_LEN: usize = 4;
pub const MAX_KEYWORDS: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordMatch {
    /// Matched keywords in their original form and order.
    pub matched: Vec<String>,
    pub ratio: f64,
}

/// Picks the first few long whitespace tokens of the raw reference text.
///
/// Tokens keep their case and punctuation and are not deduplicated.
pub fn derive_keywords(reference_text: &str) -> Vec<String> {
    reference_text
        .split_whitespace()
        .filter(|word| word.chars().count() > KEYWORD_MIN_EXCLUSIVE_LEN)
        .take(MAX_KEYWORDS)
        .map(str::to_string)
        .collect()
}

/// A keyword matches when its normalized form is one of the candidate's
/// normalized tokens, or failing that a substring of the normalized
/// candidate (which catches multi-word keywords).
///
/// Keywords that normalize to nothing (stop words such as "through") are
/// compared in their plain letters-only form against the candidate's plain
/// words instead.
pub fn match_keywords(candidate: &str, keywords: &[String]) -> KeywordMatch {
    if keywords.is_empty() {
        return KeywordMatch::default();
    }

    let processed = normalize(candidate);
    let candidate_tokens: Vec<&str> = processed.split_whitespace().collect();
    let plain_candidate = plain_tokens(candidate);

    let matched: Vec<String> = keywords
        .iter()
        .filter(|keyword| {
            let needle = normalize(keyword);
            if needle.is_empty() {
                return matches_plain(&plain_candidate, keyword);
            }
            candidate_tokens.contains(&needle.as_str()) || processed.contains(&needle)
        })
        .cloned()
        .collect();

    let ratio = matched.len() as f64 / keywords.len() as f64;
    KeywordMatch { matched, ratio }
}

fn matches_plain(candidate_words: &[String], keyword: &str) -> bool {
    let needle = plain_tokens(keyword);
    match needle.as_slice() {
        [] => false,
        [word] => candidate_words.contains(word),
        phrase => candidate_words
            .windows(phrase.len())
            .any(|window| window == phrase),
    }
}
