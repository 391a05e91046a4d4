use crate::scoring::text::word_count;

/// Inputs to the feedback rules for one graded answer.
#[derive(Debug, Clone, Copy)]
pub struct FeedbackInput<'a> {
    pub candidate: &'a str,
    pub reference: &'a str,
    pub matched_keywords: &'a [String],
    pub all_keywords: &'a [String],
    pub similarity: f64,
    pub score: f64,
    pub max_score: f64,
}

/// Joins the sentences of the four feedback rules in fixed order.
pub fn compose_feedback(input: &FeedbackInput<'_>) -> String {
    [
        Some(score_band(input.score, input.max_score)),
        missing_keywords(input.matched_keywords, input.all_keywords),
        Some(similarity_band(input.similarity).to_string()),
        length_band(input.candidate, input.reference).map(str::to_string),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ")
}

fn score_band(score: f64, max_score: f64) -> String {
    let percentage = if max_score > 0.0 {
        score / max_score * 100.0
    } else {
        0.0
    };
    let sentence = if percentage >= 80.0 {
        "✓ Excellent answer! You've covered the main points well."
    } else if percentage >= 60.0 {
        "✓ Good answer, but there's room for improvement."
    } else if percentage >= 40.0 {
        "△ Your answer is partially correct."
    } else {
        "✗ Your answer needs significant improvement."
    };
    sentence.to_string()
}

fn missing_keywords(matched: &[String], all: &[String]) -> Option<String> {
    let missing: Vec<&str> = all
        .iter()
        .filter(|keyword| !matched.contains(keyword))
        .map(String::as_str)
        .collect();
    match missing.len() {
        0 => None,
        1 | 2 => Some(format!("Missing key concepts: {}.", missing.join(", "))),
        n => Some(format!(
            "Missing {n} key concepts. Consider including: {}...",
            missing[..3].join(", ")
        )),
    }
}

fn similarity_band(similarity: f64) -> &'static str {
    if similarity < 0.3 {
        "Your answer differs significantly from the expected response. Review the model answer."
    } else if similarity < 0.5 {
        "Your answer partially addresses the question. Add more relevant details."
    } else if similarity < 0.7 {
        "Your answer aligns fairly well with the expected response."
    } else {
        "Your answer aligns very well with the expected response."
    }
}

fn length_band(candidate: &str, reference: &str) -> Option<&'static str> {
    let candidate_words = word_count(candidate) as f64;
    let reference_words = word_count(reference) as f64;
    if candidate_words < reference_words * 0.3 {
        Some("Your answer is too brief. Provide more detailed explanation.")
    } else if candidate_words < reference_words * 0.6 {
        Some("Consider elaborating further on your answer.")
    } else if candidate_words > reference_words * 2.5 {
        Some("Your answer is unnecessarily long. Be more concise.")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn full_marks_with_all_keywords_gets_two_sentences() {
        let keywords = words(&["alpha", "gamma"]);
        let feedback = compose_feedback(&FeedbackInput {
            candidate: "alpha beta gamma",
            reference: "alpha beta gamma",
            matched_keywords: &keywords,
            all_keywords: &keywords,
            similarity: 1.0,
            score: 5.0,
            max_score: 5.0,
        });
        assert_eq!(
            feedback,
            "✓ Excellent answer! You've covered the main points well. \
             Your answer aligns very well with the expected response."
        );
    }

    #[test]
    fn lists_up_to_two_missing_keywords() {
        let all = words(&["alpha", "beta", "gamma"]);
        let matched = words(&["beta"]);
        let sentence = missing_keywords(&matched, &all).unwrap();
        assert_eq!(sentence, "Missing key concepts: alpha, gamma.");
    }

    #[test]
    fn counts_and_previews_three_or_more_missing_keywords() {
        let all = words(&["a1", "b2", "c3", "d4", "e5"]);
        let sentence = missing_keywords(&[], &all).unwrap();
        assert_eq!(
            sentence,
            "Missing 5 key concepts. Consider including: a1, b2, c3..."
        );
    }

    #[test]
    fn score_bands_use_percentage_thresholds() {
        assert!(score_band(8.0, 10.0).starts_with("✓ Excellent"));
        assert!(score_band(6.0, 10.0).starts_with("✓ Good"));
        assert!(score_band(4.0, 10.0).starts_with("△"));
        assert!(score_band(3.99, 10.0).starts_with("✗"));
    }

    #[test]
    fn similarity_bands() {
        assert!(similarity_band(0.29).contains("differs significantly"));
        assert!(similarity_band(0.3).contains("partially addresses"));
        assert!(similarity_band(0.5).contains("fairly well"));
        assert!(similarity_band(0.7).contains("very well"));
    }

    #[test]
    fn length_bands_compare_word_counts() {
        let reference = "one two three four five six seven eight nine ten";
        assert_eq!(
            length_band("one two", reference),
            Some("Your answer is too brief. Provide more detailed explanation.")
        );
        assert_eq!(
            length_band("one two three four five", reference),
            Some("Consider elaborating further on your answer.")
        );
        assert_eq!(length_band(reference, reference), None);
        let long = [reference; 3].join(" ");
        assert_eq!(
            length_band(&long, reference),
            Some("Your answer is unnecessarily long. Be more concise.")
        );
    }
}
