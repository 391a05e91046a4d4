use std::cmp::Ordering;
use std::collections::BTreeMap;

use image::GrayImage;
use serde::{Deserialize, Serialize};

use crate::core::geometry::BBox;

/// One entry of the question configuration handed in by the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestionSpec {
    pub question_id: String,
    pub total_marks: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl QuestionSpec {
    pub fn new(question_id: impl Into<String>, total_marks: f64) -> Self {
        Self {
            question_id: question_id.into(),
            total_marks,
            question_type: None,
            details: None,
        }
    }
}

/// A horizontal slice of a preprocessed page presumed to hold one answer.
#[derive(Debug, Clone)]
pub struct Region {
    pub question_id: String,
    pub image: GrayImage,
    pub bbox: BBox,
}

/// Question id key ordered naturally, so `q2` sorts before `q10`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub String);

impl QuestionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn split_numeric_suffix(&self) -> (&str, Option<u64>) {
        let digits_start = self
            .0
            .char_indices()
            .rev()
            .take_while(|(_, c)| c.is_ascii_digit())
            .last()
            .map(|(idx, _)| idx);
        match digits_start {
            Some(idx) => (&self.0[..idx], self.0[idx..].parse().ok()),
            None => (&self.0, None),
        }
    }
}

impl From<&str> for QuestionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for QuestionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Ord for QuestionId {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a_prefix, a_num) = self.split_numeric_suffix();
        let (b_prefix, b_num) = other.split_numeric_suffix();
        a_prefix
            .cmp(b_prefix)
            .then_with(|| a_num.cmp(&b_num))
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for QuestionId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Recognized text per question for one processed document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractedAnswers {
    answers: BTreeMap<QuestionId, String>,
}

impl ExtractedAnswers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `text` under `question_id`, replacing text from an earlier page.
    pub fn insert(&mut self, question_id: impl Into<QuestionId>, text: impl Into<String>) {
        self.answers.insert(question_id.into(), text.into());
    }

    pub fn get(&self, question_id: &str) -> Option<&str> {
        self.answers
            .get(&QuestionId::from(question_id))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.answers
            .iter()
            .map(|(id, text)| (id.as_str(), text.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceAnswer {
    pub reference_text: String,
    pub keywords: Vec<String>,
    pub max_score: f64,
}

/// Expected answers built from the answer key; immutable once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceModel {
    answers: BTreeMap<QuestionId, ReferenceAnswer>,
}

impl ReferenceModel {
    pub fn from_answers(answers: impl IntoIterator<Item = (String, ReferenceAnswer)>) -> Self {
        Self {
            answers: answers
                .into_iter()
                .map(|(id, answer)| (QuestionId(id), answer))
                .collect(),
        }
    }

    pub fn get(&self, question_id: &str) -> Option<&ReferenceAnswer> {
        self.answers.get(&QuestionId::from(question_id))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub recognized_text: String,
    pub reference_text: String,
    pub score: f64,
    pub max_score: f64,
    pub feedback: String,
    pub matched_keywords: Vec<String>,
    pub total_keywords: usize,
    pub match_ratio: f64,
    pub all_keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionSpec>,
}

impl EvaluationResult {
    pub const NOT_IN_KEY_REFERENCE: &'static str = "Not in answer key";
    pub const NOT_IN_KEY_FEEDBACK: &'static str = "Question not found in answer key";

    /// Zero result for a question the answer key does not cover.
    pub fn not_in_answer_key(recognized_text: impl Into<String>) -> Self {
        Self {
            recognized_text: recognized_text.into(),
            reference_text: Self::NOT_IN_KEY_REFERENCE.to_string(),
            score: 0.0,
            max_score: 0.0,
            feedback: Self::NOT_IN_KEY_FEEDBACK.to_string(),
            matched_keywords: Vec::new(),
            total_keywords: 0,
            match_ratio: 0.0,
            all_keywords: Vec::new(),
            question: None,
        }
    }

    pub fn percentage(&self) -> f64 {
        if self.max_score > 0.0 {
            self.score / self.max_score * 100.0
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub results: BTreeMap<QuestionId, EvaluationResult>,
    pub total_score: f64,
    pub max_score_total: f64,
    pub percentage: f64,
}

impl EvaluationReport {
    /// Builds a report; only results backed by the answer key count towards the totals.
    ///
    /// Totals and percentage are rounded to two decimals.
    pub fn from_results(results: BTreeMap<QuestionId, EvaluationResult>, evaluated: &[QuestionId]) -> Self {
        let (total_score, max_score_total) = evaluated
            .iter()
            .filter_map(|id| results.get(id))
            .fold((0.0, 0.0), |(score, max), r| (score + r.score, max + r.max_score));
        let percentage = if max_score_total > 0.0 {
            total_score / max_score_total * 100.0
        } else {
            0.0
        };
        Self {
            results,
            total_score: round2(total_score),
            max_score_total: round2(max_score_total),
            percentage: round2(percentage),
        }
    }

    pub fn get(&self, question_id: &str) -> Option<&EvaluationResult> {
        self.results.get(&QuestionId::from(question_id))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EvaluationResult)> {
        self.results.iter().map(|(id, r)| (id.as_str(), r))
    }
}

/// Rounds half away from zero to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
