//! CLI application for preparing images for print.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{config, mask, models, pdf, poster, remove_bg};

/// Posterkit - Turn images into printable posters and PDFs
#[derive(Parser)]
#[command(name = "posterkit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scale an image to a physical size and split it into printable sheets
    Poster(poster::PosterArgs),

    /// Place an image on a single sheet at a fixed print size
    Pdf(pdf::PdfArgs),

    /// Apply a grayscale mask as the alpha channel of an image
    Mask(mask::MaskArgs),

    /// Remove the background of an image
    RemoveBg(remove_bg::RemoveBgArgs),

    /// Manage segmentation models
    Models(models::ModelsArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Poster(args) => poster::run(args, config_path).await,
        Commands::Pdf(args) => pdf::run(args, config_path).await,
        Commands::Mask(args) => mask::run(args).await,
        Commands::RemoveBg(args) => remove_bg::run(args, config_path).await,
        Commands::Models(args) => models::run(args).await,
        Commands::Config(args) => config::run(args, config_path).await,
    }
}
