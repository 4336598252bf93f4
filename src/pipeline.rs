//! Pipeline – ties together config, image catalog, layout, pagination and
//! rendering into a single function call.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::catalog::ImageCatalog;
use crate::config::Config;
use crate::error::Result;
use crate::layout_config::Layout;
use crate::pagination::{PaginationSummary, Paginator};
use crate::render::PdfSurface;
use crate::svg::SvgSurface;

/// Output backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One vector PDF with one page per sheet (default).
    #[default]
    Pdf,
    /// One SVG file per sheet.
    Svg,
}

impl OutputFormat {
    /// Guess from the output file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(|e| e.parse().ok())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "svg" => Ok(Self::Svg),
            other => Err(format!(
                "unsupported output format '{other}', expected 'pdf' or 'svg'"
            )),
        }
    }
}

/// One stitching job.
#[derive(Debug, Clone)]
pub struct StitchRequest {
    pub images: Vec<PathBuf>,
    pub output: PathBuf,
    pub format: OutputFormat,
    pub config: Config,
    /// Lay cards out right-to-left (for mirrored duplex backs).
    pub right_to_left: bool,
}

/// What a job produced.
#[derive(Debug, Clone, PartialEq)]
pub struct StitchSummary {
    pub pages: usize,
    pub images: usize,
    pub cards_per_page: usize,
    /// Files written, in page order (a single file for PDF).
    pub files: Vec<PathBuf>,
}

/// Compute the layout for a catalog without rendering anything.
pub fn compute_layout(config: &Config, catalog: &ImageCatalog) -> Result<Layout> {
    Layout::compute(&config.page, &config.cutline, catalog.image_size())
}

/// Full pipeline: image files → PDF or SVG pages on disk.
pub fn stitch(request: &StitchRequest) -> Result<StitchSummary> {
    let config = &request.config;

    // 1. Validate images
    let catalog = ImageCatalog::open(&request.images, config.dpi)?;

    // 2. Compute layout
    let layout = compute_layout(config, &catalog)?;
    log::info!(
        "{}x{} cards per page, {} pages expected",
        layout.grid.card_count_x,
        layout.grid.card_count_y,
        layout.page_count(catalog.len())
    );

    // 3. Paginate onto the chosen surface
    let paginator = Paginator::new(&layout, &config.page, &config.cutline, &config.registration)
        .right_to_left(request.right_to_left);

    let (summary, files) = match request.format {
        OutputFormat::Pdf => {
            let title = request
                .output
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("pnp-stitch output");
            let mut surface = PdfSurface::new(title, config.page.width, config.page.height);
            let summary = paginator.generate(&mut surface, catalog.images())?;
            surface.save(&request.output)?;
            (summary, vec![request.output.clone()])
        }
        OutputFormat::Svg => {
            let mut surface = SvgSurface::new(
                &request.output,
                config.page.width,
                config.page.height,
                config.svg_page_dpi,
            );
            let summary = paginator.generate(&mut surface, catalog.images())?;
            (summary, surface.into_written())
        }
    };

    let PaginationSummary { pages, images } = summary;
    Ok(StitchSummary {
        pages,
        images,
        cards_per_page: layout.cards_per_page(),
        files,
    })
}
