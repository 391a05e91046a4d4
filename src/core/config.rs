use std::path::PathBuf;

use crate::core::error::{GradeError, Result};

/// External executables used by the recognition stage and document loader.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendConfig {
    pub recognizer_path: PathBuf,
    pub renderer_path: PathBuf,
    /// Tesseract language set, `+`-separated (e.g. `eng+hin`).
    pub languages: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            recognizer_path: PathBuf::from("tesseract"),
            renderer_path: PathBuf::from("pdftoppm"),
            languages: "eng".to_string(),
        }
    }
}

impl BackendConfig {
    pub fn with_recognizer(mut self, path: PathBuf) -> Self {
        self.recognizer_path = path;
        self
    }

    pub fn with_renderer(mut self, path: PathBuf) -> Self {
        self.renderer_path = path;
        self
    }

    pub fn with_languages(mut self, languages: String) -> Self {
        self.languages = languages;
        self
    }
}

/// Binarization and morphology parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreprocessConfig {
    /// Gaussian sigma of the local-mean window; 2.0 matches an 11px window.
    pub window_sigma: f32,
    /// Subtracted from the local mean before thresholding.
    pub bias: i16,
    /// Radius of the opening element applied to ink pixels; 0 is a 1x1 element.
    pub opening_radius: u8,
    pub dilation_radius: u8,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            window_sigma: 2.0,
            bias: 2,
            opening_radius: 0,
            dilation_radius: 0,
        }
    }
}

impl PreprocessConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.window_sigma.is_finite() && self.window_sigma > 0.0) {
            return Err(GradeError::InvalidConfiguration(format!(
                "threshold window sigma must be positive, got {}",
                self.window_sigma
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraderConfig {
    pub backend: BackendConfig,
    pub preprocess: PreprocessConfig,
    /// Rendering resolution for paginated documents.
    pub dpi: u32,
}

impl Default for GraderConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            preprocess: PreprocessConfig::default(),
            dpi: 200,
        }
    }
}

impl GraderConfig {
    pub fn new(backend: BackendConfig, dpi: u32) -> Self {
        Self {
            backend,
            dpi,
            ..Self::default()
        }
    }

    pub fn with_preprocess(mut self, preprocess: PreprocessConfig) -> Self {
        self.preprocess = preprocess;
        self
    }
}
