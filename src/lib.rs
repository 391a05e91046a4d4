pub mod core;
pub mod export;
pub mod ocr;
pub mod pipeline;
pub mod scoring;

pub use crate::core::model::{EvaluationReport, EvaluationResult, ExtractedAnswers, QuestionSpec};
pub use crate::core::{BackendConfig, GradeError, GraderConfig};
pub use pipeline::Grader;

/// Installs the global `tracing` subscriber; `RUST_LOG` selects verbosity.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
