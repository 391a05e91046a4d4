use serde::{Deserialize, Serialize};

/// Pixel rectangle, half-open on both axes: `[x0, x1) × [y0, y1)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BBox {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl BBox {
    pub fn new(x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> u32 {
        self.x1.saturating_sub(self.x0)
    }

    pub fn height(&self) -> u32 {
        self.y1.saturating_sub(self.y0)
    }

    pub fn area(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.area() == 0
    }

    /// Full-width horizontal band covering rows `[y0, y1)`.
    pub fn band(width: u32, y0: u32, y1: u32) -> Self {
        Self::new(0, y0, width, y1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn band_spans_full_width() {
        let band = BBox::band(100, 20, 70);
        assert_eq!(band, BBox::new(0, 20, 100, 70));
        assert_eq!(band.width(), 100);
        assert_eq!(band.height(), 50);
        assert_eq!(band.area(), 5000);
    }

    #[test]
    fn zero_height_band_is_empty() {
        let band = BBox::band(100, 7, 7);
        assert!(band.is_empty());
        assert_eq!(band.height(), 0);
    }
}
