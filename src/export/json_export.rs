use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use crate::core::model::EvaluationReport;
use crate::export::Exporter;
use crate::scoring::PerformanceSummary;

#[derive(Debug, Clone)]
pub struct JsonExporter {
    out_dir: PathBuf,
}

impl JsonExporter {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }
}

#[derive(Serialize)]
struct ReportDocument<'a> {
    report: &'a EvaluationReport,
    summary: PerformanceSummary,
}

impl Exporter for JsonExporter {
    fn export(&self, report: &EvaluationReport) -> Result<()> {
        fs::create_dir_all(&self.out_dir)?;
        let path = self.out_dir.join("report.json");
        let document = ReportDocument {
            report,
            summary: PerformanceSummary::from_report(report),
        };
        let data = serde_json::to_string_pretty(&document)?;
        fs::write(path, data)?;
        Ok(())
    }
}
