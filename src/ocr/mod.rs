pub mod bridge;
pub mod extract;
pub mod loader;
pub mod preprocess;
pub mod recognition;
pub mod renderer;
pub mod segment;

pub use bridge::TesseractRecognizer;
pub use extract::AnswerExtractor;
pub use loader::DocumentLoader;
pub use preprocess::Preprocessor;
pub use recognition::RecognitionStage;
pub use renderer::PageRenderer;

use image::GrayImage;

use crate::core::error::Result;

/// Text recognition backend for a single region image.
///
/// Implementations report failures as `GradeError::Recognition`; the
/// recognition stage decides how to recover.
pub trait TextRecognizer {
    fn recognize(&self, region: &GrayImage) -> Result<String>;
}

impl<T: TextRecognizer + ?Sized> TextRecognizer for &T {
    fn recognize(&self, region: &GrayImage) -> Result<String> {
        (**self).recognize(region)
    }
}

impl<T: TextRecognizer + ?Sized> TextRecognizer for Box<T> {
    fn recognize(&self, region: &GrayImage) -> Result<String> {
        (**self).recognize(region)
    }
}
