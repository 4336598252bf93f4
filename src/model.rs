//! Page, cutline and registration settings, already normalised to inches.
//!
//! These are read-only inputs owned by the caller. Both the layout engine
//! and the paginator borrow them for the duration of a run.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::Rgba;

/// What gets drawn on each page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageMode {
    /// Card images and cutlines.
    #[default]
    Full,
    /// Cutlines only (e.g. a sheet for a cutting machine pass).
    Cutline,
    /// Card images only.
    Image,
}

impl PageMode {
    pub fn draws_images(self) -> bool {
        matches!(self, PageMode::Full | PageMode::Image)
    }

    pub fn draws_cutlines(self) -> bool {
        matches!(self, PageMode::Full | PageMode::Cutline)
    }
}

/// Physical page and margins, in inches.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSpec {
    pub width: f64,
    pub height: f64,
    pub margin_x: f64,
    pub margin_y: f64,
    pub mode: PageMode,
    pub registration: bool,
}

impl PageSpec {
    /// Printable extent on the x axis (page width minus both margins).
    pub fn region_x(&self) -> f64 {
        self.width - 2.0 * self.margin_x
    }

    /// Printable extent on the y axis (page height minus both margins).
    pub fn region_y(&self) -> f64 {
        self.height - 2.0 * self.margin_y
    }
}

/// Whether cutlines go under or over the card images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CutlineLayer {
    /// Drawn last on the page, before the flush.
    #[default]
    Top,
    /// Drawn first on the page, before any image.
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CutlineStyle {
    /// Full-length guides for a guillotine or rotary cutter.
    #[default]
    #[serde(alias = "cut-through")]
    Cutthrough,
    /// One rectangle around each card for a cutting machine.
    Inset,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CutlineSpec {
    pub color: Rgba,
    /// Stroke width in inches.
    pub width: f64,
    pub dashed: bool,
    pub trim_offset_x: f64,
    pub trim_offset_y: f64,
    /// Corner radius of inset rectangles, in inches. Zero means square corners.
    pub round_corner: f64,
    pub layer: CutlineLayer,
    pub style: CutlineStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationKind {
    #[default]
    Crosshair,
    Square,
}

/// A fixed reference mark, placed in absolute page coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationSpec {
    pub kind: RegistrationKind,
    pub x_pos: f64,
    pub y_pos: f64,
    pub size: f64,
}

/// Card size in inches. Every image in a run shares exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: f64,
    pub height: f64,
}

impl ImageSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Convert a pixel size at `dpi` pixels per inch.
    pub fn from_pixels(width_px: u32, height_px: u32, dpi: u32) -> Self {
        let dpi = f64::from(dpi);
        Self {
            width: f64::from(width_px) / dpi,
            height: f64::from(height_px) / dpi,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => f.write_str("x"),
            Axis::Y => f.write_str("y"),
        }
    }
}
