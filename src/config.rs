//! Configuration file loading.
//!
//! The file is TOML with `[page]`, `[cutline]`, `[registration]` and `[svg]`
//! sections. Every key is optional. Lengths are written with
//! units (`"210mm"`, `"0.25pp"`) and normalised to inches on load, so the
//! layout engine only ever sees a single linear unit.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::color::Rgba;
use crate::error::{Result, StitchError};
use crate::model::{
    CutlineLayer, CutlineSpec, CutlineStyle, PageMode, PageSpec, RegistrationKind,
    RegistrationSpec,
};
use crate::units::parse_length;

/// Normalised configuration for one stitching run.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Pixels per inch of the source card images.
    pub dpi: u32,
    pub page: PageSpec,
    pub cutline: CutlineSpec,
    pub registration: RegistrationSpec,
    /// Output units per inch of the SVG backend.
    pub svg_page_dpi: u32,
}

impl Config {
    /// Load from a TOML file, or return the defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let text = fs::read_to_string(path).map_err(|e| StitchError::io(path, e))?;
                log::debug!("loaded config from {}", path.display());
                Self::from_toml_str(&text)
            }
            None => RawConfig::default().normalize(),
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(text)?;
        raw.normalize()
    }
}

// ---------------------------------------------------------------------------
// File schema
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    page: RawPage,
    cutline: RawCutline,
    registration: RawRegistration,
    svg: RawSvg,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawPage {
    dpi: u32,
    width: String,
    height: String,
    margin_x: String,
    margin_y: String,
    mode: PageMode,
    registration: bool,
}

impl Default for RawPage {
    fn default() -> Self {
        Self {
            dpi: 300,
            width: "210mm".into(),
            height: "297mm".into(),
            margin_x: "3mm".into(),
            margin_y: "3mm".into(),
            mode: PageMode::Full,
            registration: false,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawCutline {
    color: String,
    width: String,
    dashed: bool,
    trim_offset_x: String,
    trim_offset_y: String,
    round_corner: String,
    layer: CutlineLayer,
    style: CutlineStyle,
}

impl Default for RawCutline {
    fn default() -> Self {
        Self {
            color: "#999999".into(),
            width: "1pp".into(),
            dashed: true,
            trim_offset_x: "0mm".into(),
            trim_offset_y: "0mm".into(),
            round_corner: "0mm".into(),
            layer: CutlineLayer::Top,
            style: CutlineStyle::Cutthrough,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawRegistration {
    #[serde(rename = "type")]
    kind: RegistrationKind,
    x_pos: String,
    y_pos: String,
    size: String,
}

impl Default for RawRegistration {
    fn default() -> Self {
        Self {
            kind: RegistrationKind::Crosshair,
            x_pos: "0mm".into(),
            y_pos: "0mm".into(),
            size: "10mm".into(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawSvg {
    page_dpi: u32,
}

impl Default for RawSvg {
    fn default() -> Self {
        Self { page_dpi: 96 }
    }
}

impl RawConfig {
    fn normalize(self) -> Result<Config> {
        let RawConfig {
            page,
            cutline,
            registration,
            svg,
        } = self;

        for (key, dpi) in [
            ("page.dpi", page.dpi),
            ("svg.page_dpi", svg.page_dpi),
        ] {
            if dpi == 0 {
                return Err(StitchError::InvalidLength {
                    value: key.to_string(),
                    reason: "dpi must be positive".to_string(),
                });
            }
        }

        let page_spec = PageSpec {
            width: parse_length(&page.width)?,
            height: parse_length(&page.height)?,
            margin_x: parse_length(&page.margin_x)?,
            margin_y: parse_length(&page.margin_y)?,
            mode: page.mode,
            registration: page.registration,
        };

        let cutline_spec = CutlineSpec {
            color: Rgba::parse(&cutline.color)?,
            width: parse_length(&cutline.width)?,
            dashed: cutline.dashed,
            trim_offset_x: parse_length(&cutline.trim_offset_x)?,
            trim_offset_y: parse_length(&cutline.trim_offset_y)?,
            round_corner: parse_length(&cutline.round_corner)?,
            layer: cutline.layer,
            style: cutline.style,
        };

        let registration_spec = RegistrationSpec {
            kind: registration.kind,
            x_pos: parse_length(&registration.x_pos)?,
            y_pos: parse_length(&registration.y_pos)?,
            size: parse_length(&registration.size)?,
        };

        Ok(Config {
            dpi: page.dpi,
            page: page_spec,
            cutline: cutline_spec,
            registration: registration_spec,
            svg_page_dpi: svg.page_dpi,
        })
    }
}
