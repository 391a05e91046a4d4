use std::path::PathBuf;
use std::process::Command;

use image::{GrayImage, ImageFormat};

use crate::core::config::BackendConfig;
use crate::core::error::{GradeError, Result};
use crate::ocr::TextRecognizer;

/// LSTM engine only.
const ENGINE_MODE: &str = "3";
/// Treat each region as a single uniform block of text.
const PAGE_SEGMENTATION_MODE: &str = "6";

/// Runs the Tesseract executable on one region at a time.
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    executable: PathBuf,
    languages: String,
}

impl TesseractRecognizer {
    pub fn new(backend: &BackendConfig) -> Self {
        Self {
            executable: backend.recognizer_path.clone(),
            languages: backend.languages.clone(),
        }
    }

    fn command_for(&self, image_path: &std::path::Path) -> Command {
        let mut command = Command::new(&self.executable);
        command
            .arg(image_path)
            .arg("stdout")
            .arg("--oem")
            .arg(ENGINE_MODE)
            .arg("--psm")
            .arg(PAGE_SEGMENTATION_MODE)
            .arg("-l")
            .arg(&self.languages);
        command
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize(&self, region: &GrayImage) -> Result<String> {
        let input = tempfile::Builder::new()
            .prefix("markscan-region")
            .suffix(".png")
            .tempfile()
            .map_err(|err| GradeError::Recognition(format!("scratch file: {err}")))?;
        region
            .save_with_format(input.path(), ImageFormat::Png)
            .map_err(|err| GradeError::Recognition(format!("encode region: {err}")))?;

        let output = self
            .command_for(input.path())
            .output()
            .map_err(|err| {
                GradeError::Recognition(format!(
                    "failed to invoke {}: {err}",
                    self.executable.display()
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GradeError::Recognition(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn builds_fixed_mode_invocation() {
        let backend = BackendConfig::default().with_languages("eng+hin".to_string());
        let recognizer = TesseractRecognizer::new(&backend);
        let command = recognizer.command_for(std::path::Path::new("region.png"));
        let args: Vec<String> = command
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec!["region.png", "stdout", "--oem", "3", "--psm", "6", "-l", "eng+hin"]
        );
    }

    #[test]
    fn missing_executable_reports_recognition_error() {
        let backend =
            BackendConfig::default().with_recognizer(PathBuf::from("/nonexistent/tesseract"));
        let recognizer = TesseractRecognizer::new(&backend);
        let err = recognizer
            .recognize(&GrayImage::from_pixel(4, 4, Luma([255])))
            .unwrap_err();
        assert!(matches!(err, GradeError::Recognition(_)));
    }
}
