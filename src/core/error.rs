//! Error taxonomy for the grading core.
//!
//! Document-level failures propagate to the caller tagged with the document
//! that caused them. `Recognition` and `Vectorization` are produced by the
//! backends but absorbed by their callers, which fall back to empty text and
//! a zero similarity respectively.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = GradeError> = std::result::Result<T, E>;

/// Which of the two submitted documents an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentRole {
    AnswerKey,
    StudentSheet,
}

impl fmt::Display for DocumentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentRole::AnswerKey => write!(f, "answer key"),
            DocumentRole::StudentSheet => write!(f, "student sheet"),
        }
    }
}

#[derive(Debug, Error)]
pub enum GradeError {
    /// Malformed, unreadable or zero-sized raster.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    #[error("unsupported document format: {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Recognition backend failed on a single region.
    #[error("recognition failed: {0}")]
    Recognition(String),

    /// TF-IDF space could not be built (e.g. empty vocabulary).
    #[error("vectorization failed: {0}")]
    Vectorization(String),

    #[error("failed to render {}: {message}", path.display())]
    Render { path: PathBuf, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to process {role}: {source}")]
    Document {
        role: DocumentRole,
        #[source]
        source: Box<GradeError>,
    },
}

impl GradeError {
    pub fn in_document(self, role: DocumentRole) -> Self {
        GradeError::Document {
            role,
            source: Box::new(self),
        }
    }

    /// Role of the document that caused this error, if it is document-level.
    pub fn document_role(&self) -> Option<DocumentRole> {
        match self {
            GradeError::Document { role, .. } => Some(*role),
            _ => None,
        }
    }
}

impl From<image::ImageError> for GradeError {
    fn from(err: image::ImageError) -> Self {
        GradeError::InvalidImage(err.to_string())
    }
}
