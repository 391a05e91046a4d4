pub mod feedback;
pub mod keywords;
pub mod similarity;
pub mod summary;
pub mod text;

pub use keywords::{derive_keywords, match_keywords, KeywordMatch};
pub use similarity::similarity;
pub use summary::PerformanceSummary;

use tracing::debug;

use crate::core::model::round2;
use crate::scoring::feedback::{compose_feedback, FeedbackInput};

pub const NO_ANSWER_FEEDBACK: &str = "No answer provided.";
pub const NO_REFERENCE_FEEDBACK: &str = "No model answer configured.";

/// Substituted when a question is configured with a non-positive maximum.
pub const DEFAULT_MAX_SCORE: f64 = 10.0;

/// Weight of keyword coverage in the blended score.
pub const KEYWORD_WEIGHT: f64 = 0.6;
/// Weight of TF-IDF similarity in the blended score.
pub const SIMILARITY_WEIGHT: f64 = 0.4;

#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub score: f64,
    pub feedback: String,
    pub keyword_match: KeywordMatch,
    pub similarity: f64,
}

impl Evaluation {
    fn zero(feedback: &str) -> Self {
        Self {
            score: 0.0,
            feedback: feedback.to_string(),
            keyword_match: KeywordMatch::default(),
            similarity: 0.0,
        }
    }
}

/// Scores one answer: `min(round2((0.6 * ratio + 0.4 * similarity) * max), max)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnswerEvaluator;

impl AnswerEvaluator {
    pub fn new() -> Self {
        Self
    }

    pub fn evaluate(
        &self,
        candidate: &str,
        reference: &str,
        keywords: &[String],
        max_score: f64,
    ) -> Evaluation {
        if candidate.trim().is_empty() {
            return Evaluation::zero(NO_ANSWER_FEEDBACK);
        }
        if reference.trim().is_empty() {
            return Evaluation::zero(NO_REFERENCE_FEEDBACK);
        }
        let max_score = if max_score > 0.0 {
            max_score
        } else {
            DEFAULT_MAX_SCORE
        };

        let keyword_match = match_keywords(candidate, keywords);
        let similarity = similarity(candidate, reference);

        let weighted =
            (KEYWORD_WEIGHT * keyword_match.ratio + SIMILARITY_WEIGHT * similarity) * max_score;
        let score = round2(weighted).min(max_score);
        debug!(
            ratio = keyword_match.ratio,
            similarity, score, max_score, "evaluated answer"
        );

        let feedback = compose_feedback(&FeedbackInput {
            candidate,
            reference,
            matched_keywords: &keyword_match.matched,
            all_keywords: keywords,
            similarity,
            score,
            max_score,
        });

        Evaluation {
            score,
            feedback,
            keyword_match,
            similarity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const REFERENCE: &str = "Photosynthesis converts light energy into chemical energy";

    fn evaluate(candidate: &str, max_score: f64) -> Evaluation {
        let keywords = derive_keywords(REFERENCE);
        AnswerEvaluator::new().evaluate(candidate, REFERENCE, &keywords, max_score)
    }

    #[test]
    fn blank_candidate_scores_zero() {
        for candidate in ["", "   ", "\n\t"] {
            assert_eq!(evaluate(candidate, 5.0), Evaluation::zero(NO_ANSWER_FEEDBACK));
        }
    }

    #[test]
    fn blank_reference_scores_zero() {
        let result = AnswerEvaluator::new().evaluate("an answer", "  ", &[], 5.0);
        assert_eq!(result, Evaluation::zero(NO_REFERENCE_FEEDBACK));
    }

    #[test]
    fn reference_as_its_own_answer_gets_full_marks() {
        let result = evaluate(REFERENCE, 5.0);
        assert_eq!(result.score, 5.0);
        assert!(result.feedback.starts_with("✓ Excellent answer!"));
        assert!(!result.feedback.contains("Missing"));
    }

    #[test]
    fn stop_word_keywords_do_not_cost_a_self_answer_marks() {
        let reference = "Mitosis is the process through which cells divide";
        let keywords = derive_keywords(reference);

        let result = AnswerEvaluator::new().evaluate(reference, reference, &keywords, 10.0);

        assert_eq!(result.keyword_match.ratio, 1.0);
        assert_eq!(result.score, 10.0);
    }

    #[test]
    fn partial_answer_blends_keywords_and_similarity() {
        let candidate = "Plants use photosynthesis to convert sunlight into energy";
        let sim = similarity(candidate, REFERENCE);
        let expected = round2((0.6 * 0.8 + 0.4 * sim) * 10.0);

        let result = evaluate(candidate, 10.0);

        assert_eq!(result.keyword_match.ratio, 0.8);
        assert_eq!(result.similarity, sim);
        assert_eq!(result.score, expected);
        assert!(result.feedback.contains("Missing key concepts: chemical."));
    }

    #[test]
    fn non_positive_max_score_falls_back_to_default() {
        let result = evaluate(REFERENCE, 0.0);
        assert_eq!(result.score, DEFAULT_MAX_SCORE);
        let result = evaluate(REFERENCE, -3.0);
        assert_eq!(result.score, DEFAULT_MAX_SCORE);
    }

    #[test]
    fn score_stays_within_bounds() {
        for candidate in [
            "volcanoes erupt",
            "energy energy energy energy",
            REFERENCE,
            "light",
            "Photosynthesis converts light energy into chemical energy and more energy",
        ] {
            for max_score in [1.0, 2.5, 7.0, 100.0] {
                let score = evaluate(candidate, max_score).score;
                assert!(score >= 0.0 && score <= max_score, "{candidate}: {score}/{max_score}");
            }
        }
    }

    #[test]
    fn unrelated_answer_gets_critical_feedback() {
        let result = evaluate("volcanoes erupt molten rock", 5.0);
        assert_eq!(result.score, 0.0);
        assert_eq!(
            result.feedback,
            "✗ Your answer needs significant improvement. \
             Missing 5 key concepts. Consider including: Photosynthesis, converts, light... \
             Your answer differs significantly from the expected response. Review the model answer. \
             Consider elaborating further on your answer."
        );
    }
}
