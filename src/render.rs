//! PDF surface – draws pages with `printpdf` (v0.8 ops-based API).
//!
//! Layout coordinates are inches from the top-left corner; they are scaled
//! to PDF points and flipped onto PDF's bottom-left origin here. Pages are
//! collected in memory and the document is written once by
//! [`PdfSurface::save`].

use std::collections::HashMap;
use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::fs;
use std::path::{Path, PathBuf};

use printpdf::*;

use crate::catalog::CardImage;
use crate::color::Rgba;
use crate::error::{Result, StitchError};
use crate::layout::{CutLine, RegistrationMark};
use crate::model::{CutlineSpec, CutlineStyle};
use crate::pagination::{Placement, Surface};

/// PDF points per inch.
const PT_PER_INCH: f64 = 72.0;

/// Line segments used to approximate a full circle.
const CIRCLE_SEGMENTS: usize = 72;

/// Line segments used to approximate one rounded corner.
const CORNER_SEGMENTS: usize = 8;

/// Stroke width of registration crosshairs, in points.
const REGISTRATION_STROKE_PT: f32 = 1.0;

/// A printpdf XObject together with the pixel dimensions of the source image.
struct ImageResource {
    xobj_id: XObjectId,
    px_width: u32,
    px_height: u32,
}

pub struct PdfSurface {
    doc: PdfDocument,
    page_width: Mm,
    page_height: Mm,
    page_height_pt: f64,
    ops: Vec<Op>,
    pages: Vec<PdfPage>,
    /// Images are registered once per source file and reused on every page.
    images: HashMap<PathBuf, ImageResource>,
    warnings: Vec<PdfWarnMsg>,
}

impl PdfSurface {
    /// `width` and `height` are the page size in inches.
    pub fn new(title: &str, width: f64, height: f64) -> Self {
        Self {
            doc: PdfDocument::new(title),
            page_width: Mm((width * 25.4) as f32),
            page_height: Mm((height * 25.4) as f32),
            page_height_pt: height * PT_PER_INCH,
            ops: Vec::new(),
            pages: Vec::new(),
            images: HashMap::new(),
            warnings: Vec::new(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Encode the document.
    pub fn into_bytes(mut self) -> Vec<u8> {
        let pages = std::mem::take(&mut self.pages);
        self.doc.with_pages(pages);
        let bytes = self
            .doc
            .save(&PdfSaveOptions::default(), &mut self.warnings);
        for warning in &self.warnings {
            log::debug!("printpdf: {warning:?}");
        }
        bytes
    }

    /// Encode the document and write it to `path`.
    pub fn save(self, path: &Path) -> Result<()> {
        let pages = self.page_count();
        let bytes = self.into_bytes();
        fs::write(path, &bytes).map_err(|e| StitchError::io(path, e))?;
        log::info!(
            "wrote '{}' ({} bytes, {} pages)",
            path.display(),
            bytes.len(),
            pages
        );
        Ok(())
    }

    /// Inches from the top-left corner → PDF point in page space.
    fn point(&self, x: f64, y: f64) -> Point {
        Point {
            x: Pt((x * PT_PER_INCH) as f32),
            y: Pt((self.page_height_pt - y * PT_PER_INCH) as f32),
        }
    }

    fn stroke_path(&mut self, points: &[(f64, f64)], is_closed: bool) {
        let points: Vec<LinePoint> = points
            .iter()
            .map(|&(x, y)| LinePoint {
                p: self.point(x, y),
                bezier: false,
            })
            .collect();
        self.ops.push(Op::DrawLine {
            line: Line { points, is_closed },
        });
    }

    fn fill_path(&mut self, points: &[(f64, f64)]) {
        let points: Vec<LinePoint> = points
            .iter()
            .map(|&(x, y)| LinePoint {
                p: self.point(x, y),
                bezier: false,
            })
            .collect();
        self.ops.push(Op::DrawPolygon {
            polygon: Polygon {
                rings: vec![PolygonRing { points }],
                mode: PaintMode::Fill,
                winding_order: WindingOrder::NonZero,
            },
        });
    }

    fn register_image(&mut self, image: &CardImage) -> Result<()> {
        if self.images.contains_key(&image.path) {
            return Ok(());
        }
        let raw = RawImage::decode_from_bytes(&image.bytes, &mut self.warnings).map_err(|e| {
            StitchError::Pdf(format!("cannot embed '{}': {e}", image.path.display()))
        })?;
        let xobj_id = self.doc.add_image(&raw);
        log::debug!("registered '{}' as PDF image", image.path.display());
        self.images.insert(
            image.path.clone(),
            ImageResource {
                xobj_id,
                px_width: image.width_px,
                px_height: image.height_px,
            },
        );
        Ok(())
    }
}

fn rgb(color: Rgba) -> Color {
    Color::Rgb(Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
        icc_profile: None,
    })
}

/// Outline of a rectangle with circular corners of `radius`, clockwise from
/// the top-left corner. The radius is clamped to half the shorter side.
fn rounded_rect(rect: &CutLine, radius: f64) -> Vec<(f64, f64)> {
    let radius = radius.min(rect.width().abs() / 2.0).min(rect.height().abs() / 2.0);
    // corner centre and start angle (y grows downwards)
    let corners = [
        (rect.x0 + radius, rect.y0 + radius, PI),
        (rect.x1 - radius, rect.y0 + radius, PI + FRAC_PI_2),
        (rect.x1 - radius, rect.y1 - radius, 0.0),
        (rect.x0 + radius, rect.y1 - radius, FRAC_PI_2),
    ];
    let mut points = Vec::with_capacity(4 * (CORNER_SEGMENTS + 1));
    for (cx, cy, start) in corners {
        for step in 0..=CORNER_SEGMENTS {
            let angle = start + FRAC_PI_2 * step as f64 / CORNER_SEGMENTS as f64;
            points.push((cx + radius * angle.cos(), cy + radius * angle.sin()));
        }
    }
    points
}

fn circle(cx: f64, cy: f64, radius: f64) -> Vec<(f64, f64)> {
    (0..CIRCLE_SEGMENTS)
        .map(|step| {
            let angle = TAU * step as f64 / CIRCLE_SEGMENTS as f64;
            (cx + radius * angle.cos(), cy + radius * angle.sin())
        })
        .collect()
}

impl Surface for PdfSurface {
    type Image = CardImage;

    fn initialize_page(&mut self) -> Result<()> {
        // Pages are materialised on render; anything left over is discarded.
        self.ops.clear();
        Ok(())
    }

    fn draw_image(&mut self, image: &CardImage, placement: Placement) -> Result<()> {
        self.register_image(image)?;
        let Some(res) = self.images.get(&image.path) else {
            return Ok(());
        };

        // PDF origin is bottom-left; translate to the image's bottom edge.
        let bottom = self.point(placement.x, placement.y + placement.height);
        let width_pt = (placement.width * PT_PER_INCH) as f32;
        let height_pt = (placement.height * PT_PER_INCH) as f32;

        // At dpi=72 printpdf renders 1 px = 1 pt, so
        // scale = desired_pt / px_dim.
        let scale_x = if res.px_width > 0 {
            width_pt / res.px_width as f32
        } else {
            1.0
        };
        let scale_y = if res.px_height > 0 {
            height_pt / res.px_height as f32
        } else {
            1.0
        };

        self.ops.push(Op::UseXobject {
            id: res.xobj_id.clone(),
            transform: XObjectTransform {
                translate_x: Some(bottom.x),
                translate_y: Some(bottom.y),
                dpi: Some(72.0),
                scale_x: Some(scale_x),
                scale_y: Some(scale_y),
                rotate: None,
            },
        });
        Ok(())
    }

    fn draw_cutlines(&mut self, cutlines: &[CutLine], spec: &CutlineSpec) -> Result<()> {
        self.ops.push(Op::SaveGraphicsState);
        self.ops.push(Op::SetOutlineColor { col: rgb(spec.color) });
        self.ops.push(Op::SetOutlineThickness {
            pt: Pt((spec.width * PT_PER_INCH) as f32),
        });
        if spec.dashed {
            self.ops.push(Op::SetLineDashPattern {
                dash: LineDashPattern {
                    offset: 0,
                    dash_1: Some(4),
                    gap_1: Some(4),
                    ..Default::default()
                },
            });
        }

        match spec.style {
            CutlineStyle::Cutthrough => {
                for line in cutlines {
                    self.stroke_path(&[(line.x0, line.y0), (line.x1, line.y1)], false);
                }
            }
            CutlineStyle::Inset => {
                for rect in cutlines {
                    let outline = if spec.round_corner > 0.0 {
                        rounded_rect(rect, spec.round_corner)
                    } else {
                        vec![
                            (rect.x0, rect.y0),
                            (rect.x1, rect.y0),
                            (rect.x1, rect.y1),
                            (rect.x0, rect.y1),
                        ]
                    };
                    self.stroke_path(&outline, true);
                }
            }
        }

        self.ops.push(Op::RestoreGraphicsState);
        Ok(())
    }

    fn draw_registration(&mut self, mark: &RegistrationMark) -> Result<()> {
        self.ops.push(Op::SaveGraphicsState);
        match *mark {
            RegistrationMark::Crosshair {
                vertical,
                horizontal,
                center,
                radius,
            } => {
                self.ops.push(Op::SetOutlineColor {
                    col: rgb(Rgba::BLACK),
                });
                self.ops.push(Op::SetOutlineThickness {
                    pt: Pt(REGISTRATION_STROKE_PT),
                });
                for stroke in [vertical, horizontal] {
                    self.stroke_path(&[(stroke.x0, stroke.y0), (stroke.x1, stroke.y1)], false);
                }
                self.stroke_path(&circle(center.0, center.1, radius), true);
            }
            RegistrationMark::Square { x, y, size } => {
                self.ops.push(Op::SetFillColor {
                    col: rgb(Rgba::BLACK),
                });
                self.fill_path(&[(x, y), (x + size, y), (x + size, y + size), (x, y + size)]);
            }
        }
        self.ops.push(Op::RestoreGraphicsState);
        Ok(())
    }

    fn render_page(&mut self) -> Result<()> {
        let ops = std::mem::take(&mut self.ops);
        self.pages
            .push(PdfPage::new(self.page_width, self.page_height, ops));
        log::debug!("PDF page {} complete", self.pages.len());
        Ok(())
    }
}
