use image::imageops::crop_imm;
use image::GrayImage;

use crate::core::error::{GradeError, Result};
use crate::core::geometry::BBox;
use crate::core::model::Region;

/// Splits a page into `region_count` full-width bands, `q1` at the top.
///
/// Band height is `height / region_count`; leftover rows go to the last band,
/// so the bands always tile `[0, height)` exactly.
pub fn segment(image: &GrayImage, region_count: usize) -> Result<Vec<Region>> {
    let bands = band_boxes(image.width(), image.height(), region_count)?;
    Ok(bands
        .into_iter()
        .enumerate()
        .map(|(idx, bbox)| Region {
            question_id: question_id(idx),
            image: crop_imm(image, bbox.x0, bbox.y0, bbox.width(), bbox.height()).to_image(),
            bbox,
        })
        .collect())
}

pub fn band_boxes(width: u32, height: u32, region_count: usize) -> Result<Vec<BBox>> {
    if region_count == 0 {
        return Err(GradeError::InvalidConfiguration(
            "region count must be positive".to_string(),
        ));
    }
    let count = u32::try_from(region_count).map_err(|_| {
        GradeError::InvalidConfiguration(format!("region count {region_count} is too large"))
    })?;

    let band_height = height / count;
    Ok((0..count)
        .map(|i| {
            let y0 = i * band_height;
            let y1 = if i + 1 == count { height } else { y0 + band_height };
            BBox::band(width, y0, y1)
        })
        .collect())
}

pub fn question_id(index: usize) -> String {
    format!("q{}", index + 1)
}
