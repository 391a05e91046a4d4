use tracing::warn;

use crate::core::model::Region;
use crate::ocr::TextRecognizer;

/// Wraps a recognition backend so that one unreadable region never aborts a
/// document: backend errors become empty text.
#[derive(Debug, Clone)]
pub struct RecognitionStage<R> {
    backend: R,
}

impl<R: TextRecognizer> RecognitionStage<R> {
    pub fn new(backend: R) -> Self {
        Self { backend }
    }

    pub fn recognize(&self, region: &Region) -> String {
        if region.bbox.is_empty() {
            return String::new();
        }
        match self.backend.recognize(&region.image) {
            Ok(text) => text.trim().to_string(),
            Err(err) => {
                warn!(question_id = %region.question_id, error = %err, "recognition failed, using empty text");
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GrayImage;

    use crate::core::error::{GradeError, Result};
    use crate::core::geometry::BBox;

    struct Fixed(Result<String, String>);

    impl TextRecognizer for Fixed {
        fn recognize(&self, _region: &GrayImage) -> Result<String> {
            self.0.clone().map_err(GradeError::Recognition)
        }
    }

    fn region(height: u32) -> Region {
        Region {
            question_id: "q1".to_string(),
            image: GrayImage::new(10, height),
            bbox: BBox::band(10, 0, height),
        }
    }

    #[test]
    fn trims_recognized_text() {
        let stage = RecognitionStage::new(Fixed(Ok("  answer text \n\x0c".to_string())));
        assert_eq!(stage.recognize(&region(5)), "answer text");
    }

    #[test]
    fn backend_failure_becomes_empty_text() {
        let stage = RecognitionStage::new(Fixed(Err("engine crashed".to_string())));
        assert_eq!(stage.recognize(&region(5)), "");
    }

    #[test]
    fn empty_region_skips_backend() {
        let stage = RecognitionStage::new(Fixed(Ok("should not appear".to_string())));
        assert_eq!(stage.recognize(&region(0)), "");
    }
}
