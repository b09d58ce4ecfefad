//! Error types for the posterkit-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the posterkit library.
#[derive(Error, Debug)]
pub enum PosterkitError {
    /// The source file does not exist. Nothing has been written.
    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// Scaling, compositing, tiling or document rendering failed.
    #[error("processing error: {0}")]
    Processing(#[from] ProcessingError),

    /// Background removal failed.
    #[error("background removal error: {0}")]
    Matte(#[from] MatteError),

    /// Inference error from the inference layer.
    #[error("inference error: {0}")]
    Inference(#[from] posterkit_inference::InferenceError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while transforming images or writing documents.
#[derive(Error, Debug)]
pub enum ProcessingError {
    /// A physical size, resolution or pixel size is unusable.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Image decoding or encoding failed.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// The PDF document could not be assembled or serialized.
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// Image and mask have different sizes.
    #[error("image and mask sizes do not match: {image:?} vs {mask:?}")]
    MaskSizeMismatch { image: (u32, u32), mask: (u32, u32) },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to background removal.
#[derive(Error, Debug)]
pub enum MatteError {
    /// The segmentation model file is missing.
    #[error("model file not found: {}", .0.display())]
    ModelNotFound(PathBuf),

    /// The model name is not one of the known segmentation models.
    #[error("unknown model: {0}")]
    UnknownModel(String),

    /// The model returned no usable mask.
    #[error("unexpected model output: {0}")]
    UnexpectedOutput(String),
}

impl From<image::ImageError> for PosterkitError {
    fn from(err: image::ImageError) -> Self {
        PosterkitError::Processing(ProcessingError::Image(err))
    }
}

impl From<lopdf::Error> for PosterkitError {
    fn from(err: lopdf::Error) -> Self {
        PosterkitError::Processing(ProcessingError::Pdf(err))
    }
}

impl From<std::io::Error> for PosterkitError {
    fn from(err: std::io::Error) -> Self {
        PosterkitError::Processing(ProcessingError::Io(err))
    }
}

/// Result type for the posterkit library.
pub type Result<T> = std::result::Result<T, PosterkitError>;
