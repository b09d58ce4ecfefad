//! Remove-bg command - cut the foreground out of an image.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use posterkit_core::files;
use posterkit_core::matte::{self, BackgroundRemover, MatteModel};

use super::load_config;
use super::models::{get_active_model, get_model_dir};

/// Arguments for the remove-bg command.
#[derive(Args)]
pub struct RemoveBgArgs {
    /// Input image
    input: PathBuf,

    /// Output PNG file (default: <image>_no_bg.png)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Segmentation model [default: active model]
    #[arg(short, long)]
    model: Option<MatteModel>,

    /// Explicit path to the ONNX model file
    #[arg(long)]
    model_path: Option<PathBuf>,

    /// Also save the alpha mask as a grayscale PNG for manual editing
    #[arg(long)]
    save_mask: bool,
}

pub async fn run(args: RemoveBgArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;
    files::ensure_exists(&args.input)?;

    let model = match args.model.or_else(get_active_model) {
        Some(model) => model,
        None => config.matte.model()?,
    };

    let model_path = match args.model_path {
        Some(path) => path,
        None => config
            .matte
            .model_dir
            .clone()
            .unwrap_or_else(get_model_dir)
            .join(model.filename()),
    };
    if !model_path.exists() {
        anyhow::bail!(
            "Model file not found: {}. Run 'posterkit models download -m {}' first.",
            model_path.display(),
            model
        );
    }

    let output = args
        .output
        .unwrap_or_else(|| matte::default_output_path(&args.input));
    let mask_output = args.save_mask.then(|| matte::mask_output_path(&output));

    info!("Loading model {} from {}", model, model_path.display());
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.set_message(format!("Removing background with {}", model));
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let threads = config.matte.intra_threads;
    let result = BackgroundRemover::from_model_file_with_threads(&model_path, model, threads)
        .and_then(|remover| {
            matte::remove_background_file(&remover, &args.input, &output, mask_output.as_deref())
        });
    spinner.finish_and_clear();
    result?;

    println!(
        "{} Background removed, saved as: {} ({:.2}s)",
        style("✓").green(),
        output.display(),
        start.elapsed().as_secs_f64()
    );
    if let Some(mask_path) = mask_output {
        println!("{} Mask saved as: {}", style("✓").green(), mask_path.display());
        println!(
            "Edit the mask, then run: posterkit mask {} {}",
            args.input.display(),
            mask_path.display()
        );
    }

    Ok(())
}
