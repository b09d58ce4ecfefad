pub mod config;
pub mod mask;
pub mod models;
pub mod pdf;
pub mod poster;
pub mod remove_bg;

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use posterkit_core::PosterkitConfig;

/// Directory shared by downloaded models and the active model marker.
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("posterkit")
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("posterkit")
        .join("config.json")
}

/// Load the configuration used as defaults by the processing commands.
///
/// An explicit `--config` path must exist. Without one, the default config
/// file is used when present, otherwise built-in defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<PosterkitConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let default_path = default_config_path();
            if !default_path.exists() {
                return Ok(PosterkitConfig::default());
            }
            default_path
        }
    };

    debug!("Loading configuration from {}", path.display());
    PosterkitConfig::from_file(&path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}
