//! pnp-stitch – lays same-sized card images out on printable sheets.
//!
//! Usage:
//!   pnp-stitch -o cards.pdf [-c stitch.toml] [--rtl] front/*.png
//!
//! The output format follows the extension of `-o` unless `-f` is given.
//! SVG output writes one file per page (`cards__page001.svg`, ...).

use std::{fs, path::PathBuf, process};

use clap::{Parser, ValueEnum};

use pnp_stitch::catalog::ImageCatalog;
use pnp_stitch::config::Config;
use pnp_stitch::pipeline::{compute_layout, stitch, OutputFormat, StitchRequest};
use pnp_stitch::{Result, StitchError};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Pdf,
    Svg,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Pdf => OutputFormat::Pdf,
            Format::Svg => OutputFormat::Svg,
        }
    }
}

#[derive(Parser)]
#[command(name = "pnp-stitch", version, about = "Stitch card images onto printable sheets")]
struct Cli {
    /// Output file (PDF) or page file template (SVG)
    #[arg(short, long)]
    output: PathBuf,

    /// Output format (default: from the output extension, else pdf)
    #[arg(short, long, value_enum)]
    format: Option<Format>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Lay cards out right-to-left (mirrored backs)
    #[arg(short, long)]
    rtl: bool,

    /// Print the computed layout as JSON and exit
    #[arg(long)]
    dump_layout: bool,

    /// Card images, all with the same pixel dimensions
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    if cli.dump_layout {
        let catalog = ImageCatalog::open(&cli.files, config.dpi)?;
        let layout = compute_layout(&config, &catalog)?;
        println!("{}", layout.to_json()?);
        return Ok(());
    }

    let format = cli
        .format
        .map(OutputFormat::from)
        .or_else(|| OutputFormat::from_path(&cli.output))
        .unwrap_or_default();

    // Create output directory if necessary.
    if let Some(parent) = cli.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| StitchError::io(parent, e))?;
        }
    }

    let request = StitchRequest {
        images: cli.files,
        output: cli.output,
        format,
        config,
        right_to_left: cli.rtl,
    };
    let summary = stitch(&request)?;

    eprintln!(
        "Wrote {} image{} on {} page{} ({} per page)",
        summary.images,
        if summary.images == 1 { "" } else { "s" },
        summary.pages,
        if summary.pages == 1 { "" } else { "s" },
        summary.cards_per_page,
    );
    for file in &summary.files {
        eprintln!("  {}", file.display());
    }
    Ok(())
}
