use std::collections::BTreeMap;

use tracing::warn;

use crate::core::error::{GradeError, Result};
use crate::scoring::text::normalize;

/// Lexical similarity of two answers in `[0, 1]`.
///
/// Blank input, or input that normalizes to nothing, scores 0. A degenerate
/// TF-IDF space is logged and also scores 0.
pub fn similarity(candidate: &str, reference: &str) -> f64 {
    let candidate = normalize(candidate);
    let reference = normalize(reference);
    if candidate.is_empty() || reference.is_empty() {
        return 0.0;
    }

    match tfidf_cosine(&reference, &candidate) {
        Ok(score) => score,
        Err(err) => {
            warn!(error = %err, "similarity fell back to zero");
            0.0
        }
    }
}

/// Cosine similarity of two documents in a TF-IDF space fitted on exactly
/// these two documents.
///
/// Terms are runs of two or more word characters; idf is smoothed
/// (`ln((1 + n) / (1 + df)) + 1`) and term counts are used raw.
pub fn tfidf_cosine(first: &str, second: &str) -> Result<f64> {
    let docs = [term_counts(first), term_counts(second)];

    let mut document_frequency: BTreeMap<&str, usize> = BTreeMap::new();
    for counts in &docs {
        for term in counts.keys() {
            *document_frequency.entry(*term).or_default() += 1;
        }
    }
    if document_frequency.is_empty() {
        return Err(GradeError::Vectorization(
            "empty vocabulary; documents contain no terms".to_string(),
        ));
    }

    let n_docs = docs.len() as f64;
    let weights: Vec<Vec<f64>> = docs
        .iter()
        .map(|counts| {
            document_frequency
                .iter()
                .map(|(term, df)| {
                    let tf = counts.get(term).copied().unwrap_or(0) as f64;
                    let idf = ((1.0 + n_docs) / (1.0 + *df as f64)).ln() + 1.0;
                    tf * idf
                })
                .collect()
        })
        .collect();

    let (a, b) = (&weights[0], &weights[1]);
    let (norm_a, norm_b) = (l2_norm(a), l2_norm(b));
    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    Ok((dot / (norm_a * norm_b)).clamp(0.0, 1.0))
}

fn l2_norm(v: &[f64]) -> f64 {
    v.iter().map(|w| w * w).sum::<f64>().sqrt()
}

fn term_counts(text: &str) -> BTreeMap<&str, usize> {
    let mut counts = BTreeMap::new();
    for term in text
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|term| term.chars().count() >= 2)
    {
        *counts.entry(term).or_default() += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE: &str = "Photosynthesis converts light energy into chemical energy";

    #[test]
    fn identical_text_scores_one() {
        let score = similarity(REFERENCE, REFERENCE);
        assert!((score - 1.0).abs() < 1e-12, "{score}");
    }

    #[test]
    fn blank_or_stop_word_input_scores_zero() {
        assert_eq!(similarity("   ", REFERENCE), 0.0);
        assert_eq!(similarity(REFERENCE, ""), 0.0);
        assert_eq!(similarity("it is what it is", REFERENCE), 0.0);
    }

    #[test]
    fn disjoint_vocabulary_scores_zero() {
        assert_eq!(similarity("volcanoes erupt lava", REFERENCE), 0.0);
    }

    #[test]
    fn partial_overlap_is_strictly_between_bounds() {
        let score = similarity(
            "Plants use photosynthesis to convert sunlight into energy",
            REFERENCE,
        );
        assert!(score > 0.0 && score < 1.0, "{score}");
    }

    #[test]
    fn single_letter_terms_leave_an_empty_vocabulary() {
        let err = tfidf_cosine("a b c", "x y").unwrap_err();
        assert!(matches!(err, GradeError::Vectorization(_)));
        assert_eq!(similarity("q r", "x y z"), 0.0);
    }

    #[test]
    fn shared_terms_are_down_weighted() {
        // "energy" appears in both documents, so its idf is 1 while the
        // unique terms get 1 + ln(1.5).
        let unique_idf = 1.0 + (1.5f64).ln();
        let expected = 1.0 / (1.0 + unique_idf * unique_idf);
        let score = tfidf_cosine("energy light", "energy heat").unwrap();
        assert!((score - expected).abs() < 1e-12, "{score} vs {expected}");
    }

    #[test]
    fn score_is_symmetric() {
        let a = "cells divide by mitosis";
        let b = "mitosis produces identical cells";
        assert!((similarity(a, b) - similarity(b, a)).abs() < 1e-12);
    }
}
