//! # pnp-stitch – card images → printable sheets
//!
//! This crate lays same-sized card images out on fixed-size pages for print
//! and play, with cut guides and optional registration marks for cutting
//! machines. The pipeline stages are:
//!
//! 1. **Configure** – TOML file → normalised page/cutline/registration specs ([`config`])
//! 2. **Catalog** – validate that all images share one pixel size ([`catalog`])
//! 3. **Layout** – fit the card grid and compute cut guides ([`layout`], [`layout_config`])
//! 4. **Paginate** – place cards row by row and flush full pages ([`pagination`])
//! 5. **Render** – emit a PDF via printpdf ([`render`]) or one SVG per page ([`svg`])
//!
//! All lengths inside the crate are inches.

pub mod catalog;
pub mod color;
pub mod config;
pub mod error;
pub mod layout;
pub mod layout_config;
pub mod model;
pub mod pagination;
pub mod pipeline;
pub mod render;
pub mod svg;
pub mod units;

// Re-exports for convenience
pub use config::Config;
pub use error::{Result, StitchError};
pub use layout_config::Layout;
pub use pipeline::{compute_layout, stitch, OutputFormat, StitchRequest, StitchSummary};
