use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use image::DynamicImage;
use tracing::debug;

use crate::core::error::{GradeError, Result};

/// Rasterizes every page of a PDF through `pdftoppm`.
#[derive(Debug, Clone)]
pub struct PageRenderer {
    renderer_path: PathBuf,
    dpi: u32,
}

impl PageRenderer {
    pub fn new(renderer_path: PathBuf, dpi: u32) -> Self {
        Self { renderer_path, dpi }
    }

    /// Renders all pages into a scratch directory and decodes them in page order.
    pub fn render_document(&self, pdf_path: &Path) -> Result<Vec<DynamicImage>> {
        let scratch = tempfile::Builder::new().prefix("markscan-render").tempdir()?;
        let prefix = scratch.path().join("page");

        let output = Command::new(&self.renderer_path)
            .arg("-png")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg(pdf_path)
            .arg(&prefix)
            .output()
            .map_err(|err| GradeError::Render {
                path: pdf_path.to_path_buf(),
                message: format!(
                    "failed to invoke {}: {err}; is poppler-utils installed?",
                    self.renderer_path.display()
                ),
            })?;

        if !output.status.success() {
            return Err(GradeError::Render {
                path: pdf_path.to_path_buf(),
                message: format!(
                    "renderer exited with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        let pages = rendered_pages(scratch.path())?;
        if pages.is_empty() {
            return Err(GradeError::Render {
                path: pdf_path.to_path_buf(),
                message: "renderer produced no pages".to_string(),
            });
        }
        debug!(pages = pages.len(), dpi = self.dpi, "rendered pdf");

        pages
            .iter()
            .map(|(_, path)| image::open(path).map_err(GradeError::from))
            .collect()
    }
}

/// Lists `page-<n>.png` files sorted by page number. pdftoppm zero-pads the
/// number according to the page count, so sort numerically rather than by name.
fn rendered_pages(dir: &Path) -> Result<Vec<(u32, PathBuf)>> {
    let mut pages = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if let Some(number) = page_number(&path) {
            pages.push((number, path));
        }
    }
    pages.sort_by_key(|(number, _)| *number);
    Ok(pages)
}

fn page_number(path: &Path) -> Option<u32> {
    if path.extension()?.to_str()? != "png" {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    stem.strip_prefix("page-")?.parse().ok()
}
