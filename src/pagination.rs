//! Pagination – walks the image stream into grid slots and drives a drawing
//! surface page by page.
//!
//! Per page the call order is fixed:
//!
//! 1. `initialize_page`
//! 2. cutlines, when the cutline layer is `bottom`
//! 3. one `draw_image` per card
//! 4. cutlines, when the cutline layer is `top`
//! 5. `draw_registration`, when registration marks are enabled
//! 6. `render_page`
//!
//! A page is finalised as soon as its grid is full, and a partially filled
//! last page is finalised when the stream ends. An empty stream produces no
//! page at all.

use crate::error::Result;
use crate::layout::{CutLine, RegistrationMark};
use crate::layout_config::Layout;
use crate::model::{CutlineLayer, CutlineSpec, PageSpec, RegistrationSpec};

/// Where one card goes on the page, in inches from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// The drawing operations a page backend has to provide.
pub trait Surface {
    /// Image handle accepted by [`Surface::draw_image`].
    type Image;

    /// Start a fresh page.
    fn initialize_page(&mut self) -> Result<()>;

    fn draw_image(&mut self, image: &Self::Image, placement: Placement) -> Result<()>;

    /// Draw the whole cutline set. `spec.style` says whether the set holds
    /// line segments or rectangles.
    fn draw_cutlines(&mut self, cutlines: &[CutLine], spec: &CutlineSpec) -> Result<()>;

    fn draw_registration(&mut self, mark: &RegistrationMark) -> Result<()>;

    /// Flush the current page to the output.
    fn render_page(&mut self) -> Result<()>;
}

/// Totals for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaginationSummary {
    pub pages: usize,
    pub images: usize,
}

/// Drives one generation run. Holds its inputs read-only; all run state
/// (grid cursor, counters) lives inside [`Paginator::generate`].
#[derive(Debug, Clone, Copy)]
pub struct Paginator<'a> {
    layout: &'a Layout,
    page: &'a PageSpec,
    cutline: &'a CutlineSpec,
    registration: &'a RegistrationSpec,
    right_to_left: bool,
}

impl<'a> Paginator<'a> {
    pub fn new(
        layout: &'a Layout,
        page: &'a PageSpec,
        cutline: &'a CutlineSpec,
        registration: &'a RegistrationSpec,
    ) -> Self {
        Self {
            layout,
            page,
            cutline,
            registration,
            right_to_left: false,
        }
    }

    /// Fill rows from the right-most column leftwards, so a mirrored back
    /// side lines up with its front when printed duplex.
    pub fn right_to_left(mut self, enabled: bool) -> Self {
        self.right_to_left = enabled;
        self
    }

    /// Placement of the card in grid slot `(column, row)`, taking the
    /// layout direction into account.
    pub fn placement(&self, column: u32, row: u32) -> Placement {
        let grid = &self.layout.grid;
        let image = self.layout.image;
        let (origin_x, x_inc) = if self.right_to_left {
            (
                grid.centering_margin_x + image.width * f64::from(grid.card_count_x - 1),
                -image.width,
            )
        } else {
            (grid.centering_margin_x, image.width)
        };
        Placement {
            x: origin_x + x_inc * f64::from(column),
            y: grid.centering_margin_y + image.height * f64::from(row),
            width: image.width,
            height: image.height,
        }
    }

    /// Lay out every image of the stream onto `surface`.
    ///
    /// The stream is consumed strictly in order. The first error, from the
    /// stream or from the surface, aborts the run.
    pub fn generate<S, I>(&self, surface: &mut S, images: I) -> Result<PaginationSummary>
    where
        S: Surface,
        I: IntoIterator<Item = Result<S::Image>>,
    {
        let grid = self.layout.grid;
        let mut summary = PaginationSummary::default();
        let mut x_cnt = 0u32;
        let mut y_cnt = 0u32;

        for image in images {
            let image = image?;

            if x_cnt == 0 && y_cnt == 0 {
                surface.initialize_page()?;
                if self.cutline.layer == CutlineLayer::Bottom {
                    self.draw_cutlines(surface)?;
                }
            }

            if self.page.mode.draws_images() {
                surface.draw_image(&image, self.placement(x_cnt, y_cnt))?;
            }
            summary.images += 1;

            x_cnt += 1;
            if x_cnt >= grid.card_count_x {
                x_cnt = 0;
                y_cnt += 1;
            }
            if y_cnt >= grid.card_count_y {
                y_cnt = 0;
                self.finalize_page(surface, &mut summary)?;
            }
        }

        if x_cnt != 0 || y_cnt != 0 {
            self.finalize_page(surface, &mut summary)?;
        }

        log::info!(
            "laid out {} images on {} pages",
            summary.images,
            summary.pages
        );
        Ok(summary)
    }

    fn draw_cutlines<S: Surface>(&self, surface: &mut S) -> Result<()> {
        if self.page.mode.draws_cutlines() {
            surface.draw_cutlines(&self.layout.cutlines, self.cutline)?;
        }
        Ok(())
    }

    fn finalize_page<S: Surface>(
        &self,
        surface: &mut S,
        summary: &mut PaginationSummary,
    ) -> Result<()> {
        if self.cutline.layer == CutlineLayer::Top {
            self.draw_cutlines(surface)?;
        }
        if self.page.registration {
            surface.draw_registration(&RegistrationMark::from_spec(self.registration))?;
        }
        surface.render_page()?;
        summary.pages += 1;
        log::debug!("flushed page {}", summary.pages);
        Ok(())
    }
}
