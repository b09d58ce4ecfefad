//! Pdf command - place an image on a sheet at a fixed print size.

use std::path::{Path, PathBuf};

use clap::Args;
use console::style;

use posterkit_core::print::{self, convert_image_to_pdf};

use super::load_config;

/// Arguments for the pdf command.
#[derive(Args)]
pub struct PdfArgs {
    /// Input image
    input: PathBuf,

    /// Length of the longer side in cm [default: 14]
    #[arg(short, long = "size")]
    size_cm: Option<f64>,

    /// Output PDF file (default: <image>_<size>cm.pdf)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub async fn run(args: PdfArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let mut options = config.print_options();
    if let Some(size_cm) = args.size_cm {
        options.target_size_cm = size_cm;
    }

    let output = args
        .output
        .unwrap_or_else(|| print::default_output_path(&args.input, options.target_size_cm));

    let (width_cm, height_cm) = convert_image_to_pdf(&args.input, &output, &options)?;

    println!("Size in PDF: {:.2} x {:.2} cm", width_cm, height_cm);
    println!("{} PDF successfully created: {}", style("✓").green(), output.display());

    Ok(())
}
