//! Layout engine – fits a uniform card size onto a page and computes the cut
//! guides for it.
//!
//! Everything here is a pure function of its inputs: identical page, cutline
//! and image settings always produce identical geometry. Coordinates are in
//! inches with the origin at the top-left corner of the page.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StitchError};
use crate::model::{
    Axis, CutlineSpec, CutlineStyle, ImageSize, PageSpec, RegistrationKind, RegistrationSpec,
};

/// Slack added before flooring the card count so that a region which is an
/// exact multiple of the card size is not lost to binary rounding.
const FIT_EPSILON: f64 = 1e-9;

/// Circle radius of a crosshair mark, relative to the mark size.
const CROSSHAIR_CIRCLE_RATIO: f64 = 0.35;

/// How many cards fit on a page and where the grid starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridGeometry {
    pub card_count_x: u32,
    pub card_count_y: u32,
    /// Configured margin plus half of the space the grid leaves unused.
    pub centering_margin_x: f64,
    pub centering_margin_y: f64,
}

impl GridGeometry {
    pub fn cards_per_page(&self) -> usize {
        self.card_count_x as usize * self.card_count_y as usize
    }
}

/// A cut guide. For cut-through guides this is a line segment from
/// `(x0, y0)` to `(x1, y1)`; for inset guides it is the rectangle with those
/// opposite corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CutLine {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl CutLine {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn is_vertical(&self) -> bool {
        self.x0 == self.x1
    }

    pub fn is_horizontal(&self) -> bool {
        self.y0 == self.y1
    }
}

/// Compute grid capacity and centering margins for one card size.
///
/// Fails with [`StitchError::ImageTooLarge`] when not even a single card fits
/// on either axis.
pub fn compute_grid(page: &PageSpec, image: ImageSize) -> Result<GridGeometry> {
    let (card_count_x, centering_margin_x) =
        fit_axis(Axis::X, page.region_x(), image.width, page.margin_x)?;
    let (card_count_y, centering_margin_y) =
        fit_axis(Axis::Y, page.region_y(), image.height, page.margin_y)?;

    let grid = GridGeometry {
        card_count_x,
        card_count_y,
        centering_margin_x,
        centering_margin_y,
    };
    log::debug!(
        "grid {}x{} cards, centering margin ({:.4}in, {:.4}in)",
        grid.card_count_x,
        grid.card_count_y,
        grid.centering_margin_x,
        grid.centering_margin_y
    );
    Ok(grid)
}

fn fit_axis(axis: Axis, region: f64, extent: f64, margin: f64) -> Result<(u32, f64)> {
    let count = if extent > 0.0 && region > 0.0 {
        (region / extent + FIT_EPSILON).floor()
    } else {
        0.0
    };
    if count < 1.0 {
        return Err(StitchError::ImageTooLarge {
            axis,
            image: extent,
            region,
        });
    }
    let remainder = (region - count * extent).max(0.0);
    Ok((count as u32, remainder / 2.0 + margin))
}

/// Compute the ordered cut guides for the chosen style.
///
/// Both styles use the centering margin as the grid origin.
pub fn compute_cutlines(
    page: &PageSpec,
    cutline: &CutlineSpec,
    grid: &GridGeometry,
    image: ImageSize,
) -> Vec<CutLine> {
    if cutline.trim_offset_x * 2.0 >= image.width || cutline.trim_offset_y * 2.0 >= image.height {
        log::warn!(
            "trim offset ({:.4}in, {:.4}in) meets or exceeds half the card size ({:.4}in, {:.4}in)",
            cutline.trim_offset_x,
            cutline.trim_offset_y,
            image.width,
            image.height
        );
    }

    let lines = match cutline.style {
        CutlineStyle::Cutthrough => cutthrough(page, cutline, grid, image),
        CutlineStyle::Inset => inset(cutline, grid, image),
    };
    log::debug!("{:?} style produced {} cut guides", cutline.style, lines.len());
    lines
}

/// Guide positions along one axis.
///
/// A zero trim gives a clean cut: one leading guide at the grid origin plus
/// one at the far edge of every cell. A non-zero trim gives two guides per
/// cell, each pulled inwards by the trim.
fn guide_positions(origin: f64, count: u32, extent: f64, trim: f64) -> Vec<f64> {
    let mut positions = Vec::with_capacity(count as usize * 2);
    let mut start = origin;
    if trim == 0.0 {
        positions.push(start);
    }
    for _ in 0..count {
        let end = start + extent;
        if trim == 0.0 {
            positions.push(end);
        } else {
            positions.push(start + trim);
            positions.push(end - trim);
        }
        start = end;
    }
    positions
}

fn cutthrough(
    page: &PageSpec,
    cutline: &CutlineSpec,
    grid: &GridGeometry,
    image: ImageSize,
) -> Vec<CutLine> {
    let vertical = guide_positions(
        grid.centering_margin_x,
        grid.card_count_x,
        image.width,
        cutline.trim_offset_x,
    )
    .into_iter()
    .map(|x| CutLine::new(x, 0.0, x, page.height));

    let horizontal = guide_positions(
        grid.centering_margin_y,
        grid.card_count_y,
        image.height,
        cutline.trim_offset_y,
    )
    .into_iter()
    .map(|y| CutLine::new(0.0, y, page.width, y));

    vertical.chain(horizontal).collect()
}

fn inset(cutline: &CutlineSpec, grid: &GridGeometry, image: ImageSize) -> Vec<CutLine> {
    let trim_x = cutline.trim_offset_x;
    let trim_y = cutline.trim_offset_y;
    let mut rects = Vec::with_capacity(grid.cards_per_page());

    let mut top = grid.centering_margin_y;
    for _ in 0..grid.card_count_y {
        let mut left = grid.centering_margin_x;
        for _ in 0..grid.card_count_x {
            rects.push(CutLine::new(
                left + trim_x,
                top + trim_y,
                left + image.width - trim_x,
                top + image.height - trim_y,
            ));
            left += image.width;
        }
        top += image.height;
    }
    rects
}

/// Resolved registration-mark geometry in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RegistrationMark {
    /// Two strokes crossing at `center`, each `size` long, plus a circle.
    Crosshair {
        vertical: CutLine,
        horizontal: CutLine,
        center: (f64, f64),
        radius: f64,
    },
    /// A filled square with its top-left corner at `(x, y)`.
    Square { x: f64, y: f64, size: f64 },
}

impl RegistrationMark {
    pub fn from_spec(spec: &RegistrationSpec) -> Self {
        match spec.kind {
            RegistrationKind::Crosshair => {
                let half = spec.size / 2.0;
                let cx = spec.x_pos + half;
                let cy = spec.y_pos + half;
                RegistrationMark::Crosshair {
                    vertical: CutLine::new(cx, spec.y_pos, cx, spec.y_pos + spec.size),
                    horizontal: CutLine::new(spec.x_pos, cy, spec.x_pos + spec.size, cy),
                    center: (cx, cy),
                    radius: spec.size * CROSSHAIR_CIRCLE_RATIO,
                }
            }
            RegistrationKind::Square => RegistrationMark::Square {
                x: spec.x_pos,
                y: spec.y_pos,
                size: spec.size,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::model::{CutlineLayer, PageMode};

    fn page(width: f64, height: f64, margin_x: f64, margin_y: f64) -> PageSpec {
        PageSpec {
            width,
            height,
            margin_x,
            margin_y,
            mode: PageMode::Full,
            registration: false,
        }
    }

    fn cutline(style: CutlineStyle, trim_x: f64, trim_y: f64) -> CutlineSpec {
        CutlineSpec {
            color: Rgba::BLACK,
            width: 0.01,
            dashed: false,
            trim_offset_x: trim_x,
            trim_offset_y: trim_y,
            round_corner: 0.0,
            layer: CutlineLayer::Top,
            style,
        }
    }

    #[test]
    fn exact_fit_keeps_configured_margin() {
        let page = page(8.0, 11.0, 0.25, 0.5);
        let grid = compute_grid(&page, ImageSize::new(2.5, 2.5)).unwrap();
        assert_eq!(grid.card_count_x, 3);
        assert_eq!(grid.card_count_y, 4);
        assert_eq!(grid.centering_margin_x, 0.25);
        assert_eq!(grid.centering_margin_y, 0.5);
    }

    #[test]
    fn leftover_space_is_split_evenly() {
        // region 8.0 x 10.0, cards 3 x 3 → 2 columns (2in spare), 3 rows (1in spare)
        let page = page(8.5, 11.0, 0.25, 0.5);
        let grid = compute_grid(&page, ImageSize::new(3.0, 3.0)).unwrap();
        assert_eq!((grid.card_count_x, grid.card_count_y), (2, 3));
        assert!((grid.centering_margin_x - 1.25).abs() < 1e-12);
        assert!((grid.centering_margin_y - 1.0).abs() < 1e-12);
        assert_eq!(grid.cards_per_page(), 6);
    }

    #[test]
    fn metric_page_fits_poker_cards() {
        // A4 with 3mm margins and 63x88mm cards: 3x3 grid.
        let mm = |v: f64| v / 25.4;
        let page = page(mm(210.0), mm(297.0), mm(3.0), mm(3.0));
        let grid = compute_grid(&page, ImageSize::new(mm(63.0), mm(88.0))).unwrap();
        assert_eq!((grid.card_count_x, grid.card_count_y), (3, 3));
        assert!((grid.centering_margin_x - mm(10.5)).abs() < 1e-9);
        assert!((grid.centering_margin_y - mm(16.5)).abs() < 1e-9);
    }

    #[test]
    fn oversized_image_is_rejected() {
        let page = page(8.0, 11.0, 0.25, 0.25);
        let err = compute_grid(&page, ImageSize::new(7.6, 2.0)).unwrap_err();
        assert!(matches!(err, StitchError::ImageTooLarge { axis: Axis::X, .. }));
        let err = compute_grid(&page, ImageSize::new(2.0, 10.6)).unwrap_err();
        assert!(matches!(err, StitchError::ImageTooLarge { axis: Axis::Y, .. }));
    }

    #[test]
    fn margins_wider_than_page_are_rejected() {
        let page = page(4.0, 4.0, 2.5, 0.0);
        assert!(compute_grid(&page, ImageSize::new(1.0, 1.0)).is_err());
    }

    #[test]
    fn grid_is_deterministic() {
        let page = page(8.27, 11.69, 0.12, 0.12);
        let image = ImageSize::from_pixels(744, 1039, 300);
        let a = compute_grid(&page, image).unwrap();
        let b = compute_grid(&page, image).unwrap();
        assert_eq!(a.centering_margin_x.to_bits(), b.centering_margin_x.to_bits());
        assert_eq!(a.centering_margin_y.to_bits(), b.centering_margin_y.to_bits());
        assert_eq!(a, b);
    }

    #[test]
    fn clean_cutthrough_includes_leading_guide() {
        let page = page(8.0, 11.0, 0.25, 0.5);
        let image = ImageSize::new(2.5, 2.5);
        let grid = compute_grid(&page, image).unwrap();
        let lines = compute_cutlines(&page, &cutline(CutlineStyle::Cutthrough, 0.0, 0.0), &grid, image);

        let xs: Vec<f64> = lines.iter().filter(|l| l.is_vertical()).map(|l| l.x0).collect();
        assert_eq!(xs, vec![0.25, 2.75, 5.25, 7.75]);
        let ys: Vec<f64> = lines.iter().filter(|l| l.is_horizontal()).map(|l| l.y0).collect();
        assert_eq!(ys, vec![0.5, 3.0, 5.5, 8.0, 10.5]);

        for line in lines.iter().filter(|l| l.is_vertical()) {
            assert_eq!((line.y0, line.y1), (0.0, 11.0));
        }
        for line in lines.iter().filter(|l| l.is_horizontal()) {
            assert_eq!((line.x0, line.x1), (0.0, 8.0));
        }
    }

    #[test]
    fn trimmed_cutthrough_emits_two_guides_per_cell() {
        let page = page(8.0, 11.0, 0.25, 0.5);
        let image = ImageSize::new(2.5, 2.5);
        let grid = compute_grid(&page, image).unwrap();
        let lines = compute_cutlines(&page, &cutline(CutlineStyle::Cutthrough, 0.125, 0.125), &grid, image);

        let xs: Vec<f64> = lines.iter().filter(|l| l.is_vertical()).map(|l| l.x0).collect();
        assert_eq!(xs.len(), 6);
        assert_eq!(xs, vec![0.375, 2.625, 2.875, 5.125, 5.375, 7.625]);
        let ys = lines.iter().filter(|l| l.is_horizontal()).count();
        assert_eq!(ys, 8);
    }

    #[test]
    fn trim_is_evaluated_per_axis() {
        let page = page(8.0, 11.0, 0.25, 0.5);
        let image = ImageSize::new(2.5, 2.5);
        let grid = compute_grid(&page, image).unwrap();
        let lines = compute_cutlines(&page, &cutline(CutlineStyle::Cutthrough, 0.125, 0.0), &grid, image);

        // trimmed x axis: 2 per column, clean y axis: leading + 1 per row
        assert_eq!(lines.iter().filter(|l| l.is_vertical()).count(), 6);
        assert_eq!(lines.iter().filter(|l| l.is_horizontal()).count(), 5);
        // vertical guides come first
        assert!(lines[..6].iter().all(CutLine::is_vertical));
    }

    #[test]
    fn inset_draws_one_rectangle_per_card_row_major() {
        let page = page(8.0, 11.0, 0.25, 0.5);
        let image = ImageSize::new(2.5, 2.5);
        let grid = compute_grid(&page, image).unwrap();
        let rects = compute_cutlines(&page, &cutline(CutlineStyle::Inset, 0.125, 0.25), &grid, image);

        assert_eq!(rects.len(), grid.cards_per_page());
        for rect in &rects {
            assert!((rect.width() - 2.25).abs() < 1e-12);
            assert!((rect.height() - 2.0).abs() < 1e-12);
        }
        assert_eq!(rects[0], CutLine::new(0.375, 0.75, 2.625, 2.75));
        // second rectangle moves right along the first row
        assert_eq!(rects[1].y0, rects[0].y0);
        assert!(rects[1].x0 > rects[0].x0);
        // fourth rectangle starts the second row
        assert_eq!(rects[3].x0, rects[0].x0);
        assert_eq!(rects[3].y0, 3.25);
    }

    #[test]
    fn inset_uses_centering_margin() {
        let page = page(8.5, 11.0, 0.25, 0.5);
        let image = ImageSize::new(3.0, 3.0);
        let grid = compute_grid(&page, image).unwrap();
        let rects = compute_cutlines(&page, &cutline(CutlineStyle::Inset, 0.0, 0.0), &grid, image);
        assert_eq!(rects[0].x0, grid.centering_margin_x);
        assert_eq!(rects[0].y0, grid.centering_margin_y);
    }

    #[test]
    fn crosshair_geometry() {
        let spec = RegistrationSpec {
            kind: RegistrationKind::Crosshair,
            x_pos: 1.0,
            y_pos: 2.0,
            size: 0.5,
        };
        match RegistrationMark::from_spec(&spec) {
            RegistrationMark::Crosshair {
                vertical,
                horizontal,
                center,
                radius,
            } => {
                assert_eq!(center, (1.25, 2.25));
                assert_eq!(vertical, CutLine::new(1.25, 2.0, 1.25, 2.5));
                assert_eq!(horizontal, CutLine::new(1.0, 2.25, 1.5, 2.25));
                assert!((radius - 0.175).abs() < 1e-12);
            }
            other => panic!("expected crosshair, got {other:?}"),
        }
    }

    #[test]
    fn square_geometry_at_origin() {
        let size = 10.0 / 25.4;
        let spec = RegistrationSpec {
            kind: RegistrationKind::Square,
            x_pos: 0.0,
            y_pos: 0.0,
            size,
        };
        assert_eq!(
            RegistrationMark::from_spec(&spec),
            RegistrationMark::Square { x: 0.0, y: 0.0, size }
        );
    }
}
