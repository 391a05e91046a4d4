use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use anyhow::Result as AnyResult;
use tracing::{info, warn};

use crate::core::config::GraderConfig;
use crate::core::error::{DocumentRole, GradeError, Result};
use crate::core::model::{
    EvaluationReport, EvaluationResult, ExtractedAnswers, QuestionId, QuestionSpec,
    ReferenceAnswer, ReferenceModel,
};
use crate::export::{Exporter, JsonExporter, TextExporter};
use crate::ocr::{
    AnswerExtractor, DocumentLoader, PageRenderer, Preprocessor, TesseractRecognizer,
    TextRecognizer,
};
use crate::scoring::{derive_keywords, AnswerEvaluator};

/// Max score for an answer-key question the configuration does not mention.
const UNCONFIGURED_MAX_SCORE: f64 = 1.0;

/// Grades a student sheet against an answer key.
#[derive(Debug, Clone)]
pub struct Grader<R> {
    extractor: AnswerExtractor<R>,
    evaluator: AnswerEvaluator,
}

impl Grader<TesseractRecognizer> {
    /// Grader backed by the Tesseract and pdftoppm executables named in `config`.
    pub fn from_config(config: &GraderConfig) -> Result<Self> {
        let recognizer = TesseractRecognizer::new(&config.backend);
        Self::with_recognizer(config, recognizer)
    }
}

impl<R: TextRecognizer> Grader<R> {
    pub fn with_recognizer(config: &GraderConfig, recognizer: R) -> Result<Self> {
        let renderer = PageRenderer::new(config.backend.renderer_path.clone(), config.dpi);
        let extractor = AnswerExtractor::new(
            DocumentLoader::new(renderer),
            Preprocessor::new(config.preprocess)?,
            recognizer,
        );
        Ok(Self {
            extractor,
            evaluator: AnswerEvaluator::new(),
        })
    }

    pub fn extractor(&self) -> &AnswerExtractor<R> {
        &self.extractor
    }

    pub fn evaluate_submission(
        &self,
        answer_key: &Path,
        student_sheet: &Path,
        questions: &[QuestionSpec],
    ) -> Result<EvaluationReport> {
        validate_questions(questions)?;
        let region_count = questions.len();

        let key_answers = self
            .extractor
            .extract_answers(answer_key, region_count)
            .map_err(|err| err.in_document(DocumentRole::AnswerKey))?;
        let reference = build_reference_model(&key_answers, questions);

        let student_answers = self
            .extractor
            .extract_answers(student_sheet, region_count)
            .map_err(|err| err.in_document(DocumentRole::StudentSheet))?;

        let report = self.grade(&student_answers, &reference, questions);
        info!(
            total_score = report.total_score,
            max_score_total = report.max_score_total,
            percentage = report.percentage,
            "evaluation complete"
        );
        Ok(report)
    }

    /// Scores already-extracted student answers against a reference model.
    pub fn grade(
        &self,
        student: &ExtractedAnswers,
        reference: &ReferenceModel,
        questions: &[QuestionSpec],
    ) -> EvaluationReport {
        let mut results = BTreeMap::new();
        let mut evaluated = Vec::new();

        for (question_id, text) in student.iter() {
            let Some(model) = reference.get(question_id) else {
                warn!(question_id, "question not found in answer key");
                results.insert(
                    QuestionId::from(question_id),
                    EvaluationResult::not_in_answer_key(text),
                );
                continue;
            };

            let evaluation =
                self.evaluator
                    .evaluate(text, &model.reference_text, &model.keywords, model.max_score);

            let id = QuestionId::from(question_id);
            results.insert(
                id.clone(),
                EvaluationResult {
                    recognized_text: text.to_string(),
                    reference_text: model.reference_text.clone(),
                    score: evaluation.score,
                    max_score: model.max_score,
                    feedback: evaluation.feedback,
                    total_keywords: model.keywords.len(),
                    matched_keywords: evaluation.keyword_match.matched,
                    match_ratio: evaluation.keyword_match.ratio,
                    all_keywords: model.keywords.clone(),
                    question: find_question(questions, question_id).cloned(),
                },
            );
            evaluated.push(id);
        }

        EvaluationReport::from_results(results, &evaluated)
    }
}

/// Reference answers, derived keywords and max score per answer-key question.
pub fn build_reference_model(key: &ExtractedAnswers, questions: &[QuestionSpec]) -> ReferenceModel {
    ReferenceModel::from_answers(key.iter().map(|(question_id, text)| {
        let max_score = find_question(questions, question_id)
            .map(|q| q.total_marks)
            .unwrap_or(UNCONFIGURED_MAX_SCORE);
        (
            question_id.to_string(),
            ReferenceAnswer {
                reference_text: text.to_string(),
                keywords: derive_keywords(text),
                max_score,
            },
        )
    }))
}

pub fn validate_questions(questions: &[QuestionSpec]) -> Result<()> {
    if questions.is_empty() {
        return Err(GradeError::InvalidConfiguration(
            "question list is empty".to_string(),
        ));
    }
    let mut seen = HashSet::new();
    for question in questions {
        if !seen.insert(question.question_id.as_str()) {
            return Err(GradeError::InvalidConfiguration(format!(
                "duplicate question id {}",
                question.question_id
            )));
        }
        if !(question.total_marks.is_finite() && question.total_marks > 0.0) {
            return Err(GradeError::InvalidConfiguration(format!(
                "question {} has non-positive total marks {}",
                question.question_id, question.total_marks
            )));
        }
    }
    Ok(())
}

fn find_question<'a>(questions: &'a [QuestionSpec], question_id: &str) -> Option<&'a QuestionSpec> {
    questions.iter().find(|q| q.question_id == question_id)
}

pub fn export_report(report: &EvaluationReport, output: &Path) -> AnyResult<()> {
    let json_exporter = JsonExporter::new(output.to_path_buf());
    json_exporter.export(report)?;

    let text_exporter = TextExporter::new(output.to_path_buf());
    text_exporter.export(report)?;

    Ok(())
}
