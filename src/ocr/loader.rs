use std::path::Path;

use image::DynamicImage;
use tracing::debug;

use crate::core::error::{GradeError, Result};
use crate::ocr::renderer::PageRenderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Raster,
    Pdf,
}

impl DocumentKind {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("png" | "jpg" | "jpeg" | "tif" | "tiff") => Ok(DocumentKind::Raster),
            Some("pdf") => Ok(DocumentKind::Pdf),
            _ => Err(GradeError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Turns a document path into its pages, in order.
#[derive(Debug, Clone)]
pub struct DocumentLoader {
    renderer: PageRenderer,
}

impl DocumentLoader {
    pub fn new(renderer: PageRenderer) -> Self {
        Self { renderer }
    }

    pub fn load(&self, path: &Path) -> Result<Vec<DynamicImage>> {
        let pages = match DocumentKind::from_path(path)? {
            DocumentKind::Raster => vec![load_raster(path)?],
            DocumentKind::Pdf => self.renderer.render_document(path)?,
        };
        debug!(path = %path.display(), pages = pages.len(), "loaded document");
        Ok(pages)
    }
}

fn load_raster(path: &Path) -> Result<DynamicImage> {
    image::open(path)
        .map_err(|err| GradeError::InvalidImage(format!("{}: {err}", path.display())))
}
