//! Shared text normalization for keyword matching and similarity.
//!
//! Lowercase, fold compatibility characters (OCR often emits ligatures such
//! as `ﬁ`), replace everything that is not an ASCII letter with a space,
//! drop English stop words and reduce the remaining tokens to their lemma.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static NON_ALPHA: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z\s]").expect("static regex"));

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
        "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers",
        "herself", "it", "its", "itself", "they", "them", "their", "theirs", "themselves",
        "what", "which", "who", "whom", "this", "that", "these", "those", "am", "is", "are",
        "was", "were", "be", "been", "being", "have", "has", "had", "having", "do", "does",
        "did", "doing", "a", "an", "the", "and", "but", "if", "or", "because", "as", "until",
        "while", "of", "at", "by", "for", "with", "about", "against", "between", "into",
        "through", "during", "before", "after", "above", "below", "to", "from", "up", "down",
        "in", "out", "on", "off", "over", "under", "again", "further", "then", "once", "here",
        "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
        "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so",
        "than", "too", "very", "s", "t", "can", "will", "just", "don", "should", "now", "d",
        "ll", "m", "o", "re", "ve", "y", "ain", "aren", "couldn", "didn", "doesn", "hadn",
        "hasn", "haven", "isn", "ma", "mightn", "mustn", "needn", "shan", "shouldn", "wasn",
        "weren", "won", "wouldn",
    ]
    .into_iter()
    .collect()
});

static IRREGULAR_NOUNS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("children", "child"),
        ("men", "man"),
        ("women", "woman"),
        ("feet", "foot"),
        ("teeth", "tooth"),
        ("mice", "mouse"),
        ("geese", "goose"),
        ("data", "datum"),
        ("leaves", "leaf"),
        ("lives", "life"),
        ("knives", "knife"),
        ("wives", "wife"),
        ("halves", "half"),
        ("analyses", "analysis"),
        ("crises", "crisis"),
        ("phenomena", "phenomenon"),
        ("criteria", "criterion"),
    ]
    .into_iter()
    .collect()
});

/// Endings that look plural but belong to singular nouns.
const SINGULAR_ENDINGS: [&str; 4] = ["ss", "us", "is", "ics"];

/// Inflectional suffixes stripped down to their base, most specific first.
const NOUN_SUFFIXES: [(&str, &str); 6] = [
    ("ies", "y"),
    ("sses", "ss"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
];

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(token)
}

/// Noun lemma of a lowercase ASCII token.
pub fn lemmatize(token: &str) -> String {
    if let Some(lemma) = IRREGULAR_NOUNS.get(token) {
        return (*lemma).to_string();
    }
    if token.len() <= 3 || SINGULAR_ENDINGS.iter().any(|end| token.ends_with(end)) {
        return token.to_string();
    }
    for (suffix, replacement) in NOUN_SUFFIXES {
        if let Some(stem) = token.strip_suffix(suffix) {
            if !stem.is_empty() {
                return format!("{stem}{replacement}");
            }
        }
    }
    match token.strip_suffix('s') {
        Some(stem) => stem.to_string(),
        None => token.to_string(),
    }
}

/// Folded, lowercased, letters-only words of `text`, stop words included.
pub fn plain_tokens(text: &str) -> Vec<String> {
    let folded: String = text.nfkc().collect::<String>().to_lowercase();
    NON_ALPHA
        .replace_all(&folded, " ")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Normalized tokens of `text`, in order.
pub fn tokens(text: &str) -> Vec<String> {
    plain_tokens(text)
        .into_iter()
        .filter(|token| !is_stop_word(token))
        .map(|token| lemmatize(&token))
        .collect()
}

/// Normalized form of `text`: its tokens joined by single spaces.
pub fn normalize(text: &str) -> String {
    tokens(text).join(" ")
}

/// Whitespace-separated word count of the raw text.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn strips_case_punctuation_digits_and_stop_words() {
        assert_eq!(
            normalize("The Sun's ENERGY (in 2024) is converted!"),
            "sun energy converted"
        );
    }

    #[test]
    fn folds_ligatures_before_stripping() {
        assert_eq!(normalize("eﬃcient ﬁlters"), "efficient filter");
    }

    #[test]
    fn lemmatizes_regular_and_irregular_plurals() {
        let cases = [
            ("plants", "plant"),
            ("studies", "study"),
            ("classes", "class"),
            ("boxes", "box"),
            ("branches", "branch"),
            ("children", "child"),
            ("photosynthesis", "photosynthesis"),
            ("status", "status"),
            ("physics", "physics"),
            ("glass", "glass"),
            ("gas", "gas"),
            ("energy", "energy"),
        ];
        for (word, lemma) in cases {
            assert_eq!(lemmatize(word), lemma, "{word}");
        }
    }

    #[test]
    fn blank_and_stop_word_only_text_normalizes_to_empty() {
        assert_eq!(normalize("   \n\t"), "");
        assert_eq!(normalize("it is what it is"), "");
        assert_eq!(normalize("42 + 7 = 49"), "");
    }

    #[test]
    fn plain_tokens_keep_stop_words_unlemmatized() {
        assert_eq!(
            plain_tokens("Which cells, THROUGH mitosis?"),
            vec!["which", "cells", "through", "mitosis"]
        );
    }

    #[test]
    fn counts_raw_words() {
        assert_eq!(word_count("  one two\nthree  "), 3);
        assert_eq!(word_count(""), 0);
    }
}
