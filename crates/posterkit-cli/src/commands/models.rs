//! Models command - download and manage segmentation models.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};

use posterkit_core::MatteModel;

use super::data_dir;

const RELEASE_URL: &str = "https://github.com/danielgatis/rembg/releases/download/v0.0.0";

/// Arguments for the models command.
#[derive(Args)]
pub struct ModelsArgs {
    #[command(subcommand)]
    command: ModelsCommand,
}

#[derive(Subcommand)]
enum ModelsCommand {
    /// List available models
    List,

    /// Download a model
    Download(DownloadArgs),

    /// Check model status
    Status,

    /// Remove downloaded models
    Clean(CleanArgs),

    /// Set the model used by remove-bg
    Use(UseArgs),
}

#[derive(Args)]
struct DownloadArgs {
    /// Model to download [default: active model]
    #[arg(short, long)]
    model: Option<MatteModel>,

    /// Output directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force re-download even if the file exists
    #[arg(long)]
    force: bool,
}

#[derive(Args)]
struct CleanArgs {
    /// Remove a specific model only
    #[arg(short, long)]
    model: Option<MatteModel>,

    /// Remove all models
    #[arg(long)]
    all: bool,
}

#[derive(Args)]
struct UseArgs {
    /// Model to set as active
    model: MatteModel,
}

/// Download information for a model.
struct ModelInfo {
    size_bytes: u64,
    description: &'static str,
}

fn model_info(model: MatteModel) -> ModelInfo {
    match model {
        MatteModel::U2net => ModelInfo {
            size_bytes: 176_000_000,
            description: "General purpose, best quality",
        },
        MatteModel::U2netp => ModelInfo {
            size_bytes: 4_700_000,
            description: "Lightweight u2net",
        },
        MatteModel::U2netHumanSeg => ModelInfo {
            size_bytes: 176_000_000,
            description: "Human segmentation",
        },
        MatteModel::Silueta => ModelInfo {
            size_bytes: 44_000_000,
            description: "Reduced-size u2net",
        },
        MatteModel::IsnetGeneralUse => ModelInfo {
            size_bytes: 179_000_000,
            description: "IS-Net general use, 1024 px input",
        },
    }
}

fn model_url(model: MatteModel) -> String {
    format!("{}/{}", RELEASE_URL, model.filename())
}

/// Directory holding downloaded model files.
pub fn get_model_dir() -> PathBuf {
    data_dir().join("models")
}

/// Model chosen with `models use`, if any.
pub fn get_active_model() -> Option<MatteModel> {
    let content = fs::read_to_string(data_dir().join("active_model")).ok()?;
    content.trim().parse().ok()
}

fn set_active_model(model: MatteModel) -> anyhow::Result<()> {
    let dir = data_dir();
    fs::create_dir_all(&dir)?;
    fs::write(dir.join("active_model"), model.name())?;
    Ok(())
}

pub async fn run(args: ModelsArgs) -> anyhow::Result<()> {
    match args.command {
        ModelsCommand::List => list_models(),
        ModelsCommand::Download(download_args) => download_model(download_args).await,
        ModelsCommand::Status => check_status(),
        ModelsCommand::Clean(clean_args) => clean_models(clean_args),
        ModelsCommand::Use(use_args) => use_model(use_args),
    }
}

fn list_models() -> anyhow::Result<()> {
    println!("{}", style("Available Models").bold());
    println!();

    let active = get_active_model().unwrap_or_default();

    for model in MatteModel::ALL {
        let info = model_info(model);
        let active_marker = if model == active { " (active)" } else { "" };

        println!(
            "{} {:>10}  {} {}{}",
            style(format!("▸ {:<18}", model)).bold().cyan(),
            format_size(info.size_bytes),
            style(format!("{} px", model.input_size())).dim(),
            info.description,
            style(active_marker).green().bold()
        );
    }

    println!();
    println!("Commands:");
    println!("  posterkit models download -m <model>   Download a model");
    println!("  posterkit models use <model>           Switch active model");

    Ok(())
}

fn use_model(args: UseArgs) -> anyhow::Result<()> {
    let path = get_model_dir().join(args.model.filename());

    if !path.exists() {
        println!("{} {} is not downloaded yet.", style("⚠").yellow(), args.model);
        println!("Run: posterkit models download -m {}", args.model);
        return Ok(());
    }

    set_active_model(args.model)?;
    println!(
        "{} Switched to {}",
        style("✓").green(),
        style(args.model.to_string()).cyan().bold()
    );

    Ok(())
}

async fn download_model(args: DownloadArgs) -> anyhow::Result<()> {
    let model = args.model.or_else(get_active_model).unwrap_or_default();
    let info = model_info(model);

    let output_dir = args.output.unwrap_or_else(get_model_dir);
    fs::create_dir_all(&output_dir)?;
    let path = output_dir.join(model.filename());

    if path.exists() && !args.force {
        let size = fs::metadata(&path)?.len();
        // At least half the expected size, otherwise treat as a broken download.
        if size > info.size_bytes / 2 {
            println!(
                "{} {} (already exists, {})",
                style("✓").green(),
                model.filename(),
                format_size(size)
            );
            return Ok(());
        }
    }

    println!(
        "{} Downloading {} to {}",
        style("ℹ").blue(),
        style(model.to_string()).cyan().bold(),
        output_dir.display()
    );

    let client = reqwest::Client::builder()
        .user_agent(concat!("posterkit-cli/", env!("CARGO_PKG_VERSION")))
        .timeout(std::time::Duration::from_secs(600))
        .build()?;

    let pb = ProgressBar::new(info.size_bytes);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  {spinner:.green} {msg:<24} [{bar:25.cyan/blue}] {bytes}/{total_bytes}")?
            .progress_chars("=>-"),
    );
    pb.set_message(model.filename());

    match download_file(&client, &model_url(model), &path, &pb).await {
        Ok(()) => {
            pb.finish_with_message(format!("{} {}", style("✓").green(), model.filename()));
        }
        Err(e) => {
            pb.finish_with_message(format!("{} {} - {}", style("✗").red(), model.filename(), e));
            anyhow::bail!(
                "Download failed. Retry with: posterkit models download -m {} --force",
                model
            );
        }
    }

    if get_active_model().is_none() {
        set_active_model(model)?;
    } else if get_active_model() != Some(model) {
        println!(
            "{} To use this model, run: posterkit models use {}",
            style("ℹ").blue(),
            model
        );
    }

    Ok(())
}

async fn download_file(
    client: &reqwest::Client,
    url: &str,
    path: &Path,
    pb: &ProgressBar,
) -> anyhow::Result<()> {
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        anyhow::bail!("HTTP {}", response.status());
    }

    if let Some(content_length) = response.content_length() {
        pb.set_length(content_length);
    }

    let temp_path = path.with_extension("tmp");
    let mut file = File::create(&temp_path)?;

    let mut stream = response.bytes_stream();
    let mut downloaded: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk)?;
        downloaded += chunk.len() as u64;
        pb.set_position(downloaded);
    }

    file.flush()?;
    drop(file);

    fs::rename(&temp_path, path)?;

    Ok(())
}

fn check_status() -> anyhow::Result<()> {
    let active = get_active_model().unwrap_or_default();
    let model_dir = get_model_dir();

    println!("{}", style("Model Status").bold());
    println!("Active model: {}", style(active.to_string()).cyan().bold());
    println!("Directory: {}", model_dir.display());
    println!();

    for model in MatteModel::ALL {
        let info = model_info(model);
        let path = model_dir.join(model.filename());

        let (status, size_str) = if path.exists() {
            let size = fs::metadata(&path)?.len();
            if size > info.size_bytes / 2 {
                (style("✓").green(), format_size(size))
            } else {
                (style("⚠").yellow(), format!("{} (incomplete?)", format_size(size)))
            }
        } else {
            (style("✗").red(), "missing".to_string())
        };

        let active_marker = if model == active {
            style(" ◀ active").green().to_string()
        } else {
            String::new()
        };

        println!("    {} {:<24} {:>10}{}", status, model.filename(), size_str, active_marker);
    }

    Ok(())
}

fn clean_models(args: CleanArgs) -> anyhow::Result<()> {
    let models: Vec<MatteModel> = if args.all {
        MatteModel::ALL.to_vec()
    } else if let Some(model) = args.model {
        vec![model]
    } else {
        println!(
            "{} Specify --all to remove all models or -m <model> for a specific one",
            style("ℹ").blue()
        );
        return Ok(());
    };

    let model_dir = get_model_dir();
    let mut total_removed = 0;
    let mut total_freed: u64 = 0;

    for model in models {
        let path = model_dir.join(model.filename());
        if path.exists() {
            let size = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
            fs::remove_file(&path)?;
            total_removed += 1;
            total_freed += size;
            println!("  {} Removed {}", style("✓").green(), model.filename());
        }
    }

    // Leftovers from interrupted downloads.
    if let Ok(entries) = fs::read_dir(&model_dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|e| e == "tmp") {
                let _ = fs::remove_file(&path);
            }
        }
    }

    if total_removed > 0 {
        println!();
        println!(
            "{} Removed {} files, freed {}",
            style("✓").green(),
            total_removed,
            format_size(total_freed)
        );
    } else {
        println!("{} No model files to remove.", style("ℹ").blue());
    }

    Ok(())
}

fn format_size(bytes: u64) -> String {
    if bytes >= 1_000_000_000 {
        format!("{:.1}GB", bytes as f64 / 1_000_000_000.0)
    } else if bytes >= 1_000_000 {
        format!("{:.1}MB", bytes as f64 / 1_000_000.0)
    } else if bytes >= 1_000 {
        format!("{:.1}KB", bytes as f64 / 1_000.0)
    } else {
        format!("{}B", bytes)
    }
}
