use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use markscan::core::config::{BackendConfig, GraderConfig, PreprocessConfig};
use markscan::pipeline::{export_report, Grader};
use markscan::scoring::PerformanceSummary;
use markscan::QuestionSpec;

#[derive(Parser, Debug)]
#[command(name = "markscan")]
#[command(version, about = "Grade scanned answer sheets against an answer key", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Debug)]
struct BackendArgs {
    /// Tesseract executable
    #[arg(long, env = "MARKSCAN_TESSERACT", default_value = "tesseract")]
    tesseract: PathBuf,

    /// pdftoppm executable used to rasterize PDFs
    #[arg(long, env = "MARKSCAN_PDFTOPPM", default_value = "pdftoppm")]
    pdftoppm: PathBuf,

    /// Recognition languages, '+'-separated (e.g. eng+hin)
    #[arg(long, env = "MARKSCAN_LANG", default_value = "eng")]
    lang: String,

    /// Rendering DPI for PDF pages
    #[arg(long, default_value_t = 200)]
    dpi: u32,

    /// Radius of the noise-removing opening (0 keeps a 1x1 element)
    #[arg(long, default_value_t = 0)]
    open_radius: u8,

    /// Radius of the stroke-thickening dilation
    #[arg(long, default_value_t = 0)]
    dilate_radius: u8,
}

impl BackendArgs {
    fn grader_config(&self) -> GraderConfig {
        let backend = BackendConfig::default()
            .with_recognizer(self.tesseract.clone())
            .with_renderer(self.pdftoppm.clone())
            .with_languages(self.lang.clone());
        GraderConfig::new(backend, self.dpi).with_preprocess(PreprocessConfig {
            opening_radius: self.open_radius,
            dilation_radius: self.dilate_radius,
            ..PreprocessConfig::default()
        })
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Grade a student sheet against an answer key
    Evaluate {
        /// Answer key image or PDF
        #[arg(long)]
        key: PathBuf,

        /// Student answer sheet image or PDF
        #[arg(long)]
        sheet: PathBuf,

        /// JSON array of {"question_id", "total_marks"} entries
        #[arg(long)]
        questions: PathBuf,

        /// Output directory for report.json and report.txt
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        backend: BackendArgs,

        /// Only print the summary line
        #[arg(short, long)]
        quiet: bool,
    },

    /// Print the recognized text per question for one document
    Extract {
        /// Image or PDF to read
        input: PathBuf,

        /// Number of question bands per page
        #[arg(short, long, default_value_t = 5)]
        regions: usize,

        #[command(flatten)]
        backend: BackendArgs,
    },
}

fn main() -> Result<()> {
    markscan::init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Evaluate {
            key,
            sheet,
            questions,
            output,
            backend,
            quiet,
        } => evaluate(key, sheet, questions, output, backend, quiet),
        Commands::Extract {
            input,
            regions,
            backend,
        } => extract(input, regions, backend),
    }
}

fn evaluate(
    key: PathBuf,
    sheet: PathBuf,
    questions: PathBuf,
    output: Option<PathBuf>,
    backend: BackendArgs,
    quiet: bool,
) -> Result<()> {
    ensure_file(&key)?;
    ensure_file(&sheet)?;
    let specs = load_questions(&questions)?;

    let grader = Grader::from_config(&backend.grader_config())?;
    let report = grader
        .evaluate_submission(&key, &sheet, &specs)
        .with_context(|| format!("Failed to grade {}", sheet.display()))?;

    let summary = PerformanceSummary::from_report(&report);
    if !quiet {
        for row in &summary.rows {
            println!(
                "{:<6} {:>6.2}/{:<6.2} {:>5.1}%  keywords {}",
                row.question_id, row.score, row.max_score, row.percentage, row.keywords_matched
            );
        }
    }
    println!(
        "Total: {:.2}/{:.2} ({:.1}%)",
        report.total_score, report.max_score_total, report.percentage
    );

    if let Some(output_dir) = output {
        export_report(&report, &output_dir)
            .with_context(|| format!("Failed to export to: {}", output_dir.display()))?;
        if !quiet {
            println!("[✓] Report saved to: {}", output_dir.display());
        }
    }

    Ok(())
}

fn extract(input: PathBuf, regions: usize, backend: BackendArgs) -> Result<()> {
    ensure_file(&input)?;
    let grader = Grader::from_config(&backend.grader_config())?;
    let answers = grader
        .extractor()
        .extract_answers(&input, regions)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    for (question_id, text) in answers.iter() {
        println!("[{question_id}]");
        println!("{text}\n");
    }
    Ok(())
}

fn ensure_file(path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("Input file does not exist: {}", path.display());
    }
    if !path.is_file() {
        anyhow::bail!("Input is not a file: {}", path.display());
    }
    Ok(())
}

fn load_questions(path: &Path) -> Result<Vec<QuestionSpec>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read question file: {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Invalid question file: {}", path.display()))
}
