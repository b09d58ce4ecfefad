//! Mask command - apply an edited grayscale mask as alpha channel.

use std::path::PathBuf;

use clap::Args;
use console::style;

use posterkit_core::mask::{self, apply_mask_files};

/// Arguments for the mask command.
#[derive(Args)]
pub struct MaskArgs {
    /// Original image
    image: PathBuf,

    /// Grayscale mask (white = keep, black = transparent)
    mask: PathBuf,

    /// Output PNG file (default: <image>_masked.png)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub async fn run(args: MaskArgs) -> anyhow::Result<()> {
    let output = args
        .output
        .unwrap_or_else(|| mask::default_output_path(&args.image));

    apply_mask_files(&args.image, &args.mask, &output)?;

    println!("{} Mask applied and saved as: {}", style("✓").green(), output.display());
    Ok(())
}
