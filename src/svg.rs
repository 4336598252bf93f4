//! SVG surface – writes one standalone SVG document per page.
//!
//! Page `n` of an output named `cards.svg` lands in `cards__page00n.svg`.
//! Card images are embedded as base64 data URIs so every page file is
//! self-contained.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD as BASE64_STD, Engine as _};

use crate::catalog::CardImage;
use crate::error::{Result, StitchError};
use crate::layout::{CutLine, RegistrationMark};
use crate::model::{CutlineSpec, CutlineStyle};
use crate::pagination::{Placement, Surface};

/// Path of page `page` (1-based) for the output path `output`:
/// `{stem}__page{NNN}.{ext}`, with `svg` as the fallback extension.
pub fn page_path(output: &Path, page: usize) -> PathBuf {
    let ext = output
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("svg");
    let stem = output.with_extension("");
    PathBuf::from(format!("{}__page{:03}.{}", stem.display(), page, ext))
}

/// Format a coordinate with at most four decimals and no trailing zeros.
fn num(v: f64) -> String {
    let s = format!("{:.4}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// Page currently being drawn.
#[derive(Debug, Default)]
struct SvgPage {
    path: PathBuf,
    style: String,
    body: String,
}

pub struct SvgSurface {
    output: PathBuf,
    /// Output units (px) per inch.
    scale: f64,
    width_px: f64,
    height_px: f64,
    next_page: usize,
    page: SvgPage,
    written: Vec<PathBuf>,
}

impl SvgSurface {
    /// `width` and `height` are the page size in inches; `page_dpi` is the
    /// number of SVG user units per inch.
    pub fn new(output: &Path, width: f64, height: f64, page_dpi: u32) -> Self {
        let scale = f64::from(page_dpi);
        Self {
            output: output.to_path_buf(),
            scale,
            width_px: width * scale,
            height_px: height * scale,
            next_page: 1,
            page: SvgPage::default(),
            written: Vec::new(),
        }
    }

    /// Files written so far, in page order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    pub fn into_written(self) -> Vec<PathBuf> {
        self.written
    }

    fn px(&self, v: f64) -> String {
        num(v * self.scale)
    }

    fn line(&mut self, line: &CutLine, attrs: &str) {
        let el = format!(
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" {attrs}/>"#,
            self.px(line.x0),
            self.px(line.y0),
            self.px(line.x1),
            self.px(line.y1),
        );
        self.page.body.push_str(&el);
        self.page.body.push('\n');
    }

    fn stylesheet(&self, spec: &CutlineSpec) -> String {
        let stroke = format!(
            "fill: none; stroke: {}; stroke-width: {}; stroke-linecap: butt; \
             stroke-linejoin: miter; stroke-opacity: {};",
            spec.color.to_hex(),
            self.px(spec.width),
            num(f64::from(spec.color.a)),
        );
        format!(
            ".cutline {{ {stroke} }}\n.dashed {{ {stroke} stroke-dasharray: 6, 6; }}\n"
        )
    }

    fn document(&self) -> String {
        let mut doc = String::new();
        doc.push_str("<?xml version=\"1.0\" encoding=\"utf-8\" ?>\n");
        let _ = writeln!(
            doc,
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" version="1.1" width="{0}" height="{1}" viewBox="0 0 {0} {1}">"#,
            num(self.width_px),
            num(self.height_px),
        );
        if !self.page.style.is_empty() {
            let _ = writeln!(
                doc,
                "<defs><style type=\"text/css\"><![CDATA[\n{}]]></style></defs>",
                self.page.style
            );
        }
        doc.push_str(&self.page.body);
        doc.push_str("</svg>\n");
        doc
    }
}

impl Surface for SvgSurface {
    type Image = CardImage;

    fn initialize_page(&mut self) -> Result<()> {
        self.page = SvgPage {
            path: page_path(&self.output, self.next_page),
            ..SvgPage::default()
        };
        self.next_page += 1;
        Ok(())
    }

    fn draw_image(&mut self, image: &CardImage, placement: Placement) -> Result<()> {
        let el = format!(
            r#"<image x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="none" xlink:href="data:{};base64,{}"/>"#,
            self.px(placement.x),
            self.px(placement.y),
            self.px(placement.width),
            self.px(placement.height),
            image.mime_type(),
            BASE64_STD.encode(&image.bytes),
        );
        self.page.body.push_str(&el);
        self.page.body.push('\n');
        Ok(())
    }

    fn draw_cutlines(&mut self, cutlines: &[CutLine], spec: &CutlineSpec) -> Result<()> {
        if self.page.style.is_empty() {
            self.page.style = self.stylesheet(spec);
        }
        let class = if spec.dashed { "dashed" } else { "cutline" };

        match spec.style {
            CutlineStyle::Cutthrough => {
                let attrs = format!(r#"class="{class}""#);
                for line in cutlines {
                    self.line(line, &attrs);
                }
            }
            CutlineStyle::Inset => {
                let radius = self.px(spec.round_corner);
                for rect in cutlines {
                    let el = format!(
                        r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{radius}" ry="{radius}" class="{class}"/>"#,
                        self.px(rect.x0),
                        self.px(rect.y0),
                        self.px(rect.width()),
                        self.px(rect.height()),
                    );
                    self.page.body.push_str(&el);
                    self.page.body.push('\n');
                }
            }
        }
        Ok(())
    }

    fn draw_registration(&mut self, mark: &RegistrationMark) -> Result<()> {
        match *mark {
            RegistrationMark::Crosshair {
                vertical,
                horizontal,
                center,
                radius,
            } => {
                let attrs = r##"stroke="#000000" stroke-width="1" fill="none""##;
                self.line(&vertical, attrs);
                self.line(&horizontal, attrs);
                let el = format!(
                    r#"<circle cx="{}" cy="{}" r="{}" {attrs}/>"#,
                    self.px(center.0),
                    self.px(center.1),
                    self.px(radius),
                );
                self.page.body.push_str(&el);
            }
            RegistrationMark::Square { x, y, size } => {
                let el = format!(
                    r##"<rect x="{}" y="{}" width="{2}" height="{2}" fill="#000000" stroke="none"/>"##,
                    self.px(x),
                    self.px(y),
                    self.px(size),
                );
                self.page.body.push_str(&el);
            }
        }
        self.page.body.push('\n');
        Ok(())
    }

    fn render_page(&mut self) -> Result<()> {
        let path = self.page.path.clone();
        fs::write(&path, self.document()).map_err(|e| StitchError::io(&path, e))?;
        log::info!("wrote '{}'", path.display());
        self.written.push(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::model::CutlineLayer;
    use tempfile::TempDir;

    fn spec(style: CutlineStyle, dashed: bool) -> CutlineSpec {
        CutlineSpec {
            color: Rgba::parse("#999999").unwrap(),
            width: 1.0 / 96.0,
            dashed,
            trim_offset_x: 0.0,
            trim_offset_y: 0.0,
            round_corner: 0.125,
            layer: CutlineLayer::Top,
            style,
        }
    }

    #[test]
    fn page_paths_are_numbered() {
        assert_eq!(
            page_path(Path::new("out/cards.svg"), 1),
            PathBuf::from("out/cards__page001.svg")
        );
        assert_eq!(
            page_path(Path::new("cards"), 12),
            PathBuf::from("cards__page012.svg")
        );
    }

    #[test]
    fn numbers_are_compact() {
        assert_eq!(num(24.0), "24");
        assert_eq!(num(263.999_999_999_999_97), "264");
        assert_eq!(num(0.125), "0.125");
        assert_eq!(num(-0.00001), "0");
    }

    #[test]
    fn cutthrough_page_is_written() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("sheet.svg");
        let mut surface = SvgSurface::new(&output, 8.0, 10.0, 96);
        surface.initialize_page().unwrap();
        surface
            .draw_cutlines(
                &[CutLine::new(0.25, 0.0, 0.25, 10.0)],
                &spec(CutlineStyle::Cutthrough, true),
            )
            .unwrap();
        surface.render_page().unwrap();

        let path = dir.path().join("sheet__page001.svg");
        assert_eq!(surface.written(), &[path.clone()]);
        let text = fs::read_to_string(path).unwrap();
        assert!(text.contains(r#"width="768" height="960""#));
        assert!(text.contains(r#"<line x1="24" y1="0" x2="24" y2="960" class="dashed"/>"#));
        assert!(text.contains("stroke: #999999; stroke-width: 1;"));
        assert!(text.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn inset_rectangles_carry_corner_radius() {
        let dir = TempDir::new().unwrap();
        let mut surface = SvgSurface::new(&dir.path().join("x.svg"), 8.0, 10.0, 96);
        surface.initialize_page().unwrap();
        surface
            .draw_cutlines(
                &[CutLine::new(0.5, 0.5, 3.0, 4.0)],
                &spec(CutlineStyle::Inset, false),
            )
            .unwrap();
        assert!(surface.page.body.contains(
            r#"<rect x="48" y="48" width="240" height="336" rx="12" ry="12" class="cutline"/>"#
        ));
    }

    #[test]
    fn registration_square() {
        let dir = TempDir::new().unwrap();
        let mut surface = SvgSurface::new(&dir.path().join("x.svg"), 8.0, 10.0, 96);
        surface.initialize_page().unwrap();
        surface
            .draw_registration(&RegistrationMark::Square {
                x: 0.0,
                y: 0.0,
                size: 0.5,
            })
            .unwrap();
        assert!(surface
            .page
            .body
            .contains(r##"<rect x="0" y="0" width="48" height="48" fill="#000000""##));
    }

    #[test]
    fn pages_count_up_from_one() {
        let dir = TempDir::new().unwrap();
        let mut surface = SvgSurface::new(&dir.path().join("deck.svg"), 2.0, 2.0, 96);
        for _ in 0..3 {
            surface.initialize_page().unwrap();
            surface.render_page().unwrap();
        }
        let names: Vec<String> = surface
            .into_written()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec!["deck__page001.svg", "deck__page002.svg", "deck__page003.svg"]
        );
    }

    #[test]
    fn unwritable_output_is_an_error() {
        let mut surface =
            SvgSurface::new(Path::new("/nonexistent-dir/deck.svg"), 2.0, 2.0, 96);
        surface.initialize_page().unwrap();
        assert!(matches!(
            surface.render_page(),
            Err(StitchError::Io { .. })
        ));
    }
}
