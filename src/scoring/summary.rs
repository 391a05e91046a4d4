use serde::{Deserialize, Serialize};

use crate::core::model::EvaluationReport;

/// Questions at or above this percentage count as passed.
pub const PASS_PERCENTAGE: f64 = 60.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRow {
    pub question_id: String,
    pub score: f64,
    pub max_score: f64,
    pub percentage: f64,
    /// `matched/total`, e.g. `3/5`.
    pub keywords_matched: String,
}

/// Render-free statistics over a finished report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub rows: Vec<QuestionRow>,
    pub total_score: f64,
    pub max_score: f64,
    pub percentage: f64,
    pub highest_scoring_question: Option<String>,
    pub lowest_scoring_question: Option<String>,
    pub pass_rate: f64,
}

impl PerformanceSummary {
    pub fn from_report(report: &EvaluationReport) -> Self {
        let rows: Vec<QuestionRow> = report
            .iter()
            .map(|(id, result)| QuestionRow {
                question_id: id.to_string(),
                score: result.score,
                max_score: result.max_score,
                percentage: result.percentage(),
                keywords_matched: format!(
                    "{}/{}",
                    result.matched_keywords.len(),
                    result.total_keywords
                ),
            })
            .collect();

        let highest_scoring_question = pick_row(&rows, |candidate, best| candidate > best);
        let lowest_scoring_question = pick_row(&rows, |candidate, best| candidate < best);
        let pass_rate = if rows.is_empty() {
            0.0
        } else {
            let passed = rows
                .iter()
                .filter(|row| row.percentage >= PASS_PERCENTAGE)
                .count();
            passed as f64 / rows.len() as f64 * 100.0
        };

        Self {
            rows,
            total_score: report.total_score,
            max_score: report.max_score_total,
            percentage: report.percentage,
            highest_scoring_question,
            lowest_scoring_question,
            pass_rate,
        }
    }
}

/// First row whose percentage beats every earlier one under `better`.
fn pick_row(rows: &[QuestionRow], better: impl Fn(f64, f64) -> bool) -> Option<String> {
    let mut best: Option<&QuestionRow> = None;
    for row in rows {
        match best {
            Some(current) if !better(row.percentage, current.percentage) => {}
            _ => best = Some(row),
        }
    }
    best.map(|row| row.question_id.clone())
}
