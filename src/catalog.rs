//! Image catalog – checks that every card image shares one pixel size and
//! streams the images lazily, in order, to the paginator.

use std::fs;
use std::path::{Path, PathBuf};

use image::ImageFormat;

use crate::error::{Result, StitchError};
use crate::model::ImageSize;

/// A loaded card image, ready to be embedded by a drawing surface.
#[derive(Debug, Clone)]
pub struct CardImage {
    pub path: PathBuf,
    /// Encoded file contents (PNG / JPEG).
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
    pub width_px: u32,
    pub height_px: u32,
}

impl CardImage {
    /// Read and sniff one image file.
    pub fn load(path: &Path, (width_px, height_px): (u32, u32)) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| StitchError::io(path, e))?;
        let format = image::guess_format(&bytes).map_err(|source| StitchError::Image {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            bytes,
            format,
            width_px,
            height_px,
        })
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.to_mime_type()
    }
}

/// The validated set of card images for one run.
#[derive(Debug, Clone)]
pub struct ImageCatalog {
    paths: Vec<PathBuf>,
    pixel_size: (u32, u32),
    dpi: u32,
}

impl ImageCatalog {
    /// Probe every file header and check the dimensions agree.
    ///
    /// Only the headers are read here; pixel data is loaded on demand by
    /// [`ImageCatalog::images`].
    pub fn open<P: AsRef<Path>>(paths: &[P], dpi: u32) -> Result<Self> {
        let mut pixel_size: Option<(u32, u32)> = None;
        let mut owned = Vec::with_capacity(paths.len());

        for path in paths {
            let path = path.as_ref();
            let found = image::image_dimensions(path).map_err(|source| StitchError::Image {
                path: path.to_path_buf(),
                source,
            })?;
            match pixel_size {
                None => pixel_size = Some(found),
                Some(expected) if expected != found => {
                    return Err(StitchError::DimensionMismatch {
                        path: path.to_path_buf(),
                        expected,
                        found,
                    });
                }
                Some(_) => {}
            }
            owned.push(path.to_path_buf());
        }

        let pixel_size = pixel_size.ok_or(StitchError::NoImages)?;
        log::info!(
            "{} images at {}x{} px ({} dpi)",
            owned.len(),
            pixel_size.0,
            pixel_size.1,
            dpi
        );
        Ok(Self {
            paths: owned,
            pixel_size,
            dpi,
        })
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn pixel_size(&self) -> (u32, u32) {
        self.pixel_size
    }

    /// The common card size in inches.
    pub fn image_size(&self) -> ImageSize {
        ImageSize::from_pixels(self.pixel_size.0, self.pixel_size.1, self.dpi)
    }

    /// Forward-only stream of loaded images, in input order.
    pub fn images(&self) -> impl Iterator<Item = Result<CardImage>> + '_ {
        self.paths
            .iter()
            .map(move |path| CardImage::load(path, self.pixel_size))
    }
}
