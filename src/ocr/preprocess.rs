use image::{DynamicImage, GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::{dilate, open};
use tracing::debug;

use crate::core::config::PreprocessConfig;
use crate::core::error::{GradeError, Result};

const WHITE: u8 = 255;
const BLACK: u8 = 0;

/// Normalizes a raw page for recognition: grayscale, local adaptive
/// threshold, then ink-side opening and dilation.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    config: PreprocessConfig,
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self {
            config: PreprocessConfig::default(),
        }
    }
}

impl Preprocessor {
    pub fn new(config: PreprocessConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn preprocess(&self, raw: &DynamicImage) -> Result<GrayImage> {
        if raw.width() == 0 || raw.height() == 0 {
            return Err(GradeError::InvalidImage(format!(
                "page has invalid dimensions {}x{}",
                raw.width(),
                raw.height()
            )));
        }

        let gray = raw.to_luma8();
        let binary = adaptive_threshold(&gray, self.config.window_sigma, self.config.bias);
        let cleaned = self.clean_ink(binary);
        debug!(
            width = cleaned.width(),
            height = cleaned.height(),
            "preprocessed page"
        );
        Ok(cleaned)
    }

    fn clean_ink(&self, binary: GrayImage) -> GrayImage {
        let PreprocessConfig {
            opening_radius,
            dilation_radius,
            ..
        } = self.config;
        if opening_radius == 0 && dilation_radius == 0 {
            return binary;
        }

        // imageproc morphology treats non-zero pixels as foreground, so work on
        // an inverted mask where ink is white.
        let mut ink = invert(&binary);
        if opening_radius > 0 {
            ink = open(&ink, Norm::LInf, opening_radius);
        }
        if dilation_radius > 0 {
            ink = dilate(&ink, Norm::LInf, dilation_radius);
        }
        invert(&ink)
    }
}

/// Pixel becomes white iff it is brighter than its Gaussian-weighted
/// neighbourhood mean minus `bias`.
pub fn adaptive_threshold(gray: &GrayImage, sigma: f32, bias: i16) -> GrayImage {
    let local_mean = gaussian_blur_f32(gray, sigma);
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        let value = gray.get_pixel(x, y).0[0] as i16;
        let threshold = local_mean.get_pixel(x, y).0[0] as i16 - bias;
        if value > threshold {
            Luma([WHITE])
        } else {
            Luma([BLACK])
        }
    })
}

fn invert(image: &GrayImage) -> GrayImage {
    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        pixel.0[0] = WHITE - pixel.0[0];
    }
    out
}
