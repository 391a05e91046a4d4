use std::fs;
use std::path::PathBuf;

use anyhow::Result;

use crate::core::model::{EvaluationReport, EvaluationResult};
use crate::export::Exporter;
use crate::scoring::PerformanceSummary;

#[derive(Debug, Clone)]
pub struct TextExporter {
    out_dir: PathBuf,
}

impl TextExporter {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }

    fn format_result(question_id: &str, result: &EvaluationResult) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "=== {question_id}: {:.2}/{:.2} ({:.1}%) ===\n",
            result.score,
            result.max_score,
            result.percentage()
        ));
        out.push_str(&format!(
            "Keywords: {}/{} [{}]\n",
            result.matched_keywords.len(),
            result.total_keywords,
            result.matched_keywords.join(", ")
        ));
        out.push_str(&format!("Answer: {}\n", single_line(&result.recognized_text)));
        out.push_str(&format!("Expected: {}\n", single_line(&result.reference_text)));
        out.push_str(&format!("Feedback: {}\n", result.feedback));
        out
    }

    pub fn render(report: &EvaluationReport) -> String {
        let summary = PerformanceSummary::from_report(report);
        let mut text = String::new();
        text.push_str(&format!(
            "Total: {:.2}/{:.2} ({:.1}%)\n",
            report.total_score, report.max_score_total, report.percentage
        ));
        text.push_str(&format!("Pass rate: {:.1}%\n", summary.pass_rate));
        if let (Some(high), Some(low)) = (
            &summary.highest_scoring_question,
            &summary.lowest_scoring_question,
        ) {
            text.push_str(&format!("Strongest: {high}  Weakest: {low}\n"));
        }
        text.push('\n');

        for (question_id, result) in report.iter() {
            text.push_str(&Self::format_result(question_id, result));
            text.push('\n');
        }
        text
    }
}

impl Exporter for TextExporter {
    fn export(&self, report: &EvaluationReport) -> Result<()> {
        fs::create_dir_all(&self.out_dir)?;
        fs::write(self.out_dir.join("report.txt"), Self::render(report))?;
        Ok(())
    }
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
