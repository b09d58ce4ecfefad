//! Poster command - scale an image and split it into printable sheets.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use posterkit_core::poster::{self, PosterOptions};
use posterkit_core::PhysicalSize;

use super::load_config;

/// Arguments for the poster command.
#[derive(Args)]
pub struct PosterArgs {
    /// Input image (JPG, PNG, etc.)
    input: PathBuf,

    /// Target width in cm
    #[arg(short = 'w', long = "width")]
    width_cm: f64,

    /// Target height in cm
    #[arg(short = 't', long = "height")]
    height_cm: f64,

    /// Resolution used for scaling [default: 300]
    #[arg(long)]
    dpi: Option<u32>,

    /// Output PDF file (default: <image>_poster.pdf)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub async fn run(args: PosterArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let dpi = args.dpi.unwrap_or(config.poster.dpi);
    let size = PhysicalSize::new(args.width_cm, args.height_cm, dpi)?;
    let options = PosterOptions {
        size,
        sheet: config.poster.sheet(),
        style: config.poster.style(),
    };

    let output = args
        .output
        .unwrap_or_else(|| poster::default_output_path(&args.input));
    info!("Processing file: {}", args.input.display());

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.set_message(format!(
        "Tiling {} at {} x {} cm, {} DPI",
        args.input.display(),
        args.width_cm,
        args.height_cm,
        dpi
    ));
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let result = poster::create_poster(&args.input, &output, &options);
    spinner.finish_and_clear();
    let summary = result?;

    println!(
        "Original image size: {} x {} px",
        summary.source_size.0, summary.source_size.1
    );
    println!(
        "Pages needed: {} x {} = {} sheets of {} x {} cm",
        summary.pages_x,
        summary.pages_y,
        summary.page_count(),
        options.sheet.width_cm,
        options.sheet.height_cm
    );
    println!(
        "{} PDF poster saved as: {} ({:.2}s)",
        style("✓").green(),
        output.display(),
        start.elapsed().as_secs_f64()
    );
    println!("Print every page at 100% scale and assemble using the row/column labels.");

    Ok(())
}
