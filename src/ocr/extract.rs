use std::path::Path;

use image::DynamicImage;
use tracing::{debug, info};

use crate::core::error::Result;
use crate::core::model::ExtractedAnswers;
use crate::ocr::loader::DocumentLoader;
use crate::ocr::preprocess::Preprocessor;
use crate::ocr::recognition::RecognitionStage;
use crate::ocr::segment::segment;
use crate::ocr::TextRecognizer;

/// Load → preprocess → segment → recognize, over every page of a document.
#[derive(Debug, Clone)]
pub struct AnswerExtractor<R> {
    loader: DocumentLoader,
    preprocessor: Preprocessor,
    recognition: RecognitionStage<R>,
}

impl<R: TextRecognizer> AnswerExtractor<R> {
    pub fn new(loader: DocumentLoader, preprocessor: Preprocessor, recognizer: R) -> Self {
        Self {
            loader,
            preprocessor,
            recognition: RecognitionStage::new(recognizer),
        }
    }

    pub fn extract_answers(&self, path: &Path, region_count: usize) -> Result<ExtractedAnswers> {
        let pages = self.loader.load(path)?;
        info!(path = %path.display(), pages = pages.len(), region_count, "extracting answers");
        self.extract_from_pages(&pages, region_count)
    }

    /// Later pages replace earlier text for the same question id.
    pub fn extract_from_pages(
        &self,
        pages: &[DynamicImage],
        region_count: usize,
    ) -> Result<ExtractedAnswers> {
        let mut answers = ExtractedAnswers::new();
        for (page_idx, page) in pages.iter().enumerate() {
            let binary = self.preprocessor.preprocess(page)?;
            for region in segment(&binary, region_count)? {
                let text = self.recognition.recognize(&region);
                debug!(page_idx, question_id = %region.question_id, chars = text.len(), "recognized region");
                answers.insert(region.question_id, text);
            }
        }
        Ok(answers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::path::PathBuf;

    use image::{GrayImage, Luma};
    use pretty_assertions::assert_eq;

    use crate::core::error::GradeError;
    use crate::ocr::renderer::PageRenderer;

    /// Returns "page<N> <height>" for the N-th call in a page of `per_page` regions.
    struct Counting {
        calls: Cell<usize>,
        per_page: usize,
    }

    impl TextRecognizer for Counting {
        fn recognize(&self, region: &GrayImage) -> crate::core::error::Result<String> {
            let call = self.calls.get();
            self.calls.set(call + 1);
            Ok(format!(" page{} {} ", call / self.per_page + 1, region.height()))
        }
    }

    fn extractor(per_page: usize) -> AnswerExtractor<Counting> {
        AnswerExtractor::new(
            DocumentLoader::new(PageRenderer::new(PathBuf::from("pdftoppm"), 200)),
            Preprocessor::default(),
            Counting {
                calls: Cell::new(0),
                per_page,
            },
        )
    }

    fn blank_page(height: u32) -> DynamicImage {
        DynamicImage::ImageLuma8(GrayImage::from_pixel(20, height, Luma([255])))
    }

    #[test]
    fn recognizes_every_region() {
        let answers = extractor(3)
            .extract_from_pages(&[blank_page(31)], 3)
            .unwrap();
        let collected: Vec<(&str, &str)> = answers.iter().collect();
        assert_eq!(
            collected,
            vec![("q1", "page1 10"), ("q2", "page1 10"), ("q3", "page1 11")]
        );
    }

    #[test]
    fn later_page_overwrites_earlier_page() {
        let answers = extractor(2)
            .extract_from_pages(&[blank_page(20), blank_page(40)], 2)
            .unwrap();
        assert_eq!(answers.len(), 2);
        assert_eq!(answers.get("q1"), Some("page2 20"));
        assert_eq!(answers.get("q2"), Some("page2 20"));
    }

    #[test]
    fn extracts_from_image_file() -> crate::core::error::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("key.png");
        GrayImage::from_pixel(20, 50, Luma([255])).save(&path)?;

        let answers = extractor(5).extract_answers(&path, 5)?;
        assert_eq!(answers.len(), 5);
        assert_eq!(answers.get("q5"), Some("page1 10"));
        Ok(())
    }

    #[test]
    fn zero_regions_fails_before_recognition() {
        let err = extractor(1)
            .extract_from_pages(&[blank_page(10)], 0)
            .unwrap_err();
        assert!(matches!(err, GradeError::InvalidConfiguration(_)));
    }
}
