//! Configuration file for the posterkit tools.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PosterkitError, Result};
use crate::matte::{MatteModel, DEFAULT_INTRA_THREADS};
use crate::poster::SheetStyle;
use crate::print::PrintOptions;
use crate::units::{SheetSize, DEFAULT_DPI};

/// Main configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PosterkitConfig {
    /// Poster tiling configuration.
    pub poster: PosterConfig,

    /// Print-size PDF configuration.
    pub print: PrintConfig,

    /// Background removal configuration.
    pub matte: MatteConfig,
}

/// Poster tiling configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PosterConfig {
    /// Print resolution in dots per inch.
    pub dpi: u32,

    /// Sheet width in centimeters.
    pub sheet_width_cm: f64,

    /// Sheet height in centimeters.
    pub sheet_height_cm: f64,

    /// JPEG quality of embedded tiles (1 - 100).
    pub jpeg_quality: u8,

    /// Registration mark leg length in points.
    pub mark_length_pt: f32,

    /// Registration mark stroke width in points.
    pub mark_line_width_pt: f32,

    /// Row/column label font size in points.
    pub label_font_size_pt: f32,
}

impl Default for PosterConfig {
    fn default() -> Self {
        let style = SheetStyle::default();
        Self {
            dpi: DEFAULT_DPI,
            sheet_width_cm: SheetSize::A4.width_cm,
            sheet_height_cm: SheetSize::A4.height_cm,
            jpeg_quality: style.jpeg_quality,
            mark_length_pt: style.mark_length_pt,
            mark_line_width_pt: style.mark_line_width_pt,
            label_font_size_pt: style.label_font_size_pt,
        }
    }
}

impl PosterConfig {
    pub fn sheet(&self) -> SheetSize {
        SheetSize::new(self.sheet_width_cm, self.sheet_height_cm)
    }

    pub fn style(&self) -> SheetStyle {
        SheetStyle {
            jpeg_quality: self.jpeg_quality,
            mark_length_pt: self.mark_length_pt,
            mark_line_width_pt: self.mark_line_width_pt,
            label_font_size_pt: self.label_font_size_pt,
        }
    }
}

/// Print-size PDF configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintConfig {
    /// Printed length of the longer image side in centimeters.
    pub target_size_cm: f64,

    /// JPEG quality of the embedded image (1 - 100).
    pub jpeg_quality: u8,
}

impl Default for PrintConfig {
    fn default() -> Self {
        let options = PrintOptions::default();
        Self {
            target_size_cm: options.target_size_cm,
            jpeg_quality: options.jpeg_quality,
        }
    }
}

/// Background removal configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatteConfig {
    /// Segmentation model name.
    pub model: String,

    /// Directory with model files. Uses the shared data directory when unset.
    pub model_dir: Option<PathBuf>,

    /// Threads ONNX Runtime may use inside one operator.
    pub intra_threads: usize,
}

impl Default for MatteConfig {
    fn default() -> Self {
        Self {
            model: MatteModel::default().name().to_string(),
            model_dir: None,
            intra_threads: DEFAULT_INTRA_THREADS,
        }
    }
}

impl MatteConfig {
    pub fn model(&self) -> Result<MatteModel> {
        Ok(self.model.parse::<MatteModel>()?)
    }
}

impl PosterkitConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| PosterkitError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| PosterkitError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Print options with the poster sheet size.
    pub fn print_options(&self) -> PrintOptions {
        PrintOptions {
            target_size_cm: self.print.target_size_cm,
            sheet: self.poster.sheet(),
            jpeg_quality: self.print.jpeg_quality,
        }
    }
}
