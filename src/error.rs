//! Crate-wide error type.
//!
//! Every failure is fatal: the stitcher is a single-pass batch tool, so
//! errors are raised where they are detected and propagated to the caller
//! untouched. Pages already flushed to disk stay there.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::Axis;

pub type Result<T> = std::result::Result<T, StitchError>;

#[derive(Debug, Error)]
pub enum StitchError {
    #[error("image too large for page: {axis} axis needs {image:.4}in but only {region:.4}in is printable")]
    ImageTooLarge { axis: Axis, image: f64, region: f64 },

    #[error(
        "unmatched dimension in '{}': expected {}x{} px, found {}x{} px",
        path.display(), expected.0, expected.1, found.0, found.1
    )]
    DimensionMismatch {
        path: PathBuf,
        expected: (u32, u32),
        found: (u32, u32),
    },

    #[error("no input images given")]
    NoImages,

    #[error("invalid length '{value}': {reason}")]
    InvalidLength { value: String, reason: String },

    #[error("invalid CSS colour '{0}'")]
    InvalidColor(String),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read image '{}': {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StitchError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
