//! Layout config – the frozen result of the layout engine for one run.
//!
//! The paginator holds a [`Layout`] read-only while it walks the image
//! stream. It is also what `--dump-layout` prints.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::layout::{compute_cutlines, compute_grid, CutLine, GridGeometry};
use crate::model::{CutlineSpec, CutlineStyle, ImageSize, PageSpec};

/// Grid and cut-guide geometry for one (page, card size) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Page width in inches.
    pub page_width: f64,
    /// Page height in inches.
    pub page_height: f64,
    pub image: ImageSize,
    pub grid: GridGeometry,
    /// How `cutlines` are to be read: segments or rectangles.
    pub style: CutlineStyle,
    pub cutlines: Vec<CutLine>,
}

impl Layout {
    /// Run the layout engine from scratch.
    pub fn compute(page: &PageSpec, cutline: &CutlineSpec, image: ImageSize) -> Result<Self> {
        let grid = compute_grid(page, image)?;
        let cutlines = compute_cutlines(page, cutline, &grid, image);
        Ok(Self {
            page_width: page.width,
            page_height: page.height,
            image,
            grid,
            style: cutline.style,
            cutlines,
        })
    }

    pub fn cards_per_page(&self) -> usize {
        self.grid.cards_per_page()
    }

    /// Number of pages needed for `images` cards.
    pub fn page_count(&self, images: usize) -> usize {
        images.div_ceil(self.cards_per_page())
    }

    /// Serialise to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialise from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::model::{CutlineLayer, PageMode};

    fn letter_layout() -> Layout {
        let page = PageSpec {
            width: 8.0,
            height: 11.0,
            margin_x: 0.25,
            margin_y: 0.5,
            mode: PageMode::Full,
            registration: false,
        };
        let cutline = CutlineSpec {
            color: Rgba::BLACK,
            width: 0.01,
            dashed: true,
            trim_offset_x: 0.0,
            trim_offset_y: 0.0,
            round_corner: 0.0,
            layer: CutlineLayer::Top,
            style: CutlineStyle::Cutthrough,
        };
        Layout::compute(&page, &cutline, ImageSize::new(2.5, 2.5)).unwrap()
    }

    #[test]
    fn page_count_rounds_up() {
        let layout = letter_layout();
        assert_eq!(layout.cards_per_page(), 12);
        assert_eq!(layout.page_count(0), 0);
        assert_eq!(layout.page_count(12), 1);
        assert_eq!(layout.page_count(13), 2);
    }

    #[test]
    fn json_survives_a_trip() {
        let layout = letter_layout();
        let json = layout.to_json().unwrap();
        assert!(json.contains("\"card_count_x\": 3"));
        assert!(json.contains("\"style\": \"cutthrough\""));
        assert_eq!(Layout::from_json(&json).unwrap(), layout);
    }
}
